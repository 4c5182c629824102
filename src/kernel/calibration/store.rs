//! Optional SQLite-backed persistence for calibration curves (§6: "Persisted
//! state... optionally externalized"). Gated behind the `sqlite-calibration`
//! feature; without it, curves live only in the in-process `CurveRegistry`
//! and reset across restarts.
//!
//! Shares `SqliteMemoryStore`/`memory::schema`'s `Arc<Mutex<Connection>>` +
//! `with_conn` shape and an idempotent `initialize_schema` gate.

use crate::error::{Error, Result};
use crate::kernel::types::CalibrationCurve;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS calibration_bins (
            domain TEXT NOT NULL,
            bin INTEGER NOT NULL,
            accuracy REAL NOT NULL,
            sample_count INTEGER NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL,
            PRIMARY KEY (domain, bin)
        )",
        [],
    )?;
    Ok(())
}

/// A SQLite-backed store for `CalibrationCurve`s, one row per (domain, bin).
pub struct SqliteCalibrationStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCalibrationStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| Error::processing("calibration_store", e.to_string()))?;
        initialize_schema(&conn).map_err(|e| Error::processing("calibration_store", e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::processing("calibration_store", e.to_string()))?;
        initialize_schema(&conn).map_err(|e| Error::processing("calibration_store", e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::internal(format!("calibration store lock poisoned: {e}")))?;
        f(&conn).map_err(|e| Error::processing("calibration_store", e.to_string()))
    }

    pub fn save(&self, curve: &CalibrationCurve) -> Result<()> {
        self.with_conn(|conn| {
            for (bin, accuracy) in &curve.bins {
                let sample_count = curve.sample_counts.get(bin).copied().unwrap_or(0);
                conn.execute(
                    "INSERT INTO calibration_bins (domain, bin, accuracy, sample_count, last_updated)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(domain, bin) DO UPDATE SET
                        accuracy = excluded.accuracy,
                        sample_count = excluded.sample_count,
                        last_updated = excluded.last_updated",
                    params![
                        curve.domain,
                        *bin as i64,
                        accuracy,
                        sample_count,
                        curve.last_updated.to_rfc3339(),
                    ],
                )?;
            }
            Ok(())
        })
    }

    pub fn load(&self, domain: &str) -> Result<Option<CalibrationCurve>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT bin, accuracy, sample_count, last_updated
                 FROM calibration_bins WHERE domain = ?1",
            )?;
            let mut bins = HashMap::new();
            let mut sample_counts = HashMap::new();
            let mut last_updated = chrono::Utc::now();
            let mut found = false;

            let rows = stmt.query_map(params![domain], |row| {
                let bin: i64 = row.get(0)?;
                let accuracy: f64 = row.get(1)?;
                let sample_count: i64 = row.get(2)?;
                let updated: String = row.get(3)?;
                Ok((bin as u8, accuracy, sample_count as u32, updated))
            })?;

            for row in rows {
                let (bin, accuracy, sample_count, updated) = row?;
                bins.insert(bin, accuracy);
                sample_counts.insert(bin, sample_count);
                if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&updated) {
                    last_updated = dt.with_timezone(&chrono::Utc);
                }
                found = true;
            }

            if !found {
                return Ok(None);
            }

            Ok(Some(CalibrationCurve {
                domain: domain.to_string(),
                bins,
                sample_counts,
                last_updated,
            }))
        })
    }
}
