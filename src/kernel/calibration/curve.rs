//! In-memory calibration curve registry, keyed by domain (§4.5).
//!
//! Shares `SqliteMemoryStore`'s `Arc<Mutex<...>>` guarding pattern, scaled
//! down to a plain in-memory map since a curve is a handful of floats per
//! domain rather than a full graph store.

use crate::kernel::types::CalibrationCurve;
use std::collections::HashMap;
use std::sync::Mutex;

/// Holds one `CalibrationCurve` per domain, updated via an EMA as outcomes
/// are observed. Domains seen for the first time start at the identity
/// curve (stated confidence maps to itself).
pub struct CurveRegistry {
    curves: Mutex<HashMap<String, CalibrationCurve>>,
    ema_decay: f64,
}

impl CurveRegistry {
    pub fn new(ema_decay: f64) -> Self {
        Self {
            curves: Mutex::new(HashMap::new()),
            ema_decay,
        }
    }

    /// Current curve for `domain`, creating the identity curve if unseen.
    pub fn get_or_init(&self, domain: &str) -> CalibrationCurve {
        let mut curves = self.curves.lock().expect("calibration curve lock poisoned");
        curves
            .entry(domain.to_string())
            .or_insert_with(|| CalibrationCurve::identity(domain))
            .clone()
    }

    /// Seed or replace a domain's curve, e.g. after loading from persistence.
    pub fn put(&self, curve: CalibrationCurve) {
        let mut curves = self.curves.lock().expect("calibration curve lock poisoned");
        curves.insert(curve.domain.clone(), curve);
    }

    /// Fold one observation into the domain's curve: `bin_new = (1 - α) *
    /// bin_old + α * observed_accuracy` (§4.5 Curve update). `observed_accuracy`
    /// is a continuous value in `[0,1]`, not a pass/fail flag — feedback
    /// arrives as `(stated, observed_accuracy, domain)`.
    pub fn observe(&self, domain: &str, stated: f64, observed_accuracy: f64) {
        let mut curves = self.curves.lock().expect("calibration curve lock poisoned");
        let curve = curves
            .entry(domain.to_string())
            .or_insert_with(|| CalibrationCurve::identity(domain));

        let key = CalibrationCurve::bin_key(stated);
        let observed = observed_accuracy.clamp(0.0, 1.0);
        let prior = curve.bins.get(&key).copied().unwrap_or(stated);
        let updated = (1.0 - self.ema_decay) * prior + self.ema_decay * observed;
        curve.bins.insert(key, updated);
        *curve.sample_counts.entry(key).or_insert(0) += 1;
        curve.last_updated = chrono::Utc::now();
    }
}
