//! TTL entity cache (§4.8 Public contract): keyed by string, each entry
//! carries a TTL; a global max-entries cap; expired entries are reaped
//! lazily on read rather than by a background sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    inserted_at: Instant,
    last_touched: Instant,
}

/// A TTL-bounded, capacity-bounded cache of entity values (the output of
/// `kernel::perception::entities`, or any other short-lived keyed fact Act
/// wants to remember within an Execute phase).
pub struct EntityCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, CacheEntry>,
}

impl EntityCache {
    pub fn new(ttl_seconds: u64, max_entries: usize) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_seconds),
            max_entries,
            entries: HashMap::new(),
        }
    }

    fn reap_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, v| v.inserted_at.elapsed() < ttl);
    }

    /// Insert or refresh an entity. If at capacity after reaping, evicts the
    /// least-recently-touched entry to make room.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.reap_expired();
        if self.entries.len() >= self.max_entries {
            if let Some(oldest_key) = self
                .entries
                .iter()
                .min_by_key(|(_, v)| v.last_touched)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&oldest_key);
            }
        }
        let now = Instant::now();
        self.entries.insert(
            key.into(),
            CacheEntry {
                value: value.into(),
                inserted_at: now,
                last_touched: now,
            },
        );
    }

    /// Read an entity, reaping expired entries first (lazy expiry).
    pub fn get(&mut self, key: &str) -> Option<String> {
        self.reap_expired();
        let value = self.entries.get(key).map(|e| e.value.clone());
        if value.is_some() {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.last_touched = Instant::now();
            }
        }
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-scoring entities for a query: semantic (cosine over an embedder)
    /// when `embed` is supplied, else insertion-recency order (§4.8
    /// `read_context`).
    pub fn top_scoring(
        &mut self,
        query: Option<&str>,
        limit: usize,
        embed: Option<&dyn Fn(&str) -> Vec<f64>>,
    ) -> Vec<(String, String)> {
        self.reap_expired();
        let mut items: Vec<(&String, &CacheEntry)> = self.entries.iter().collect();

        match (query, embed) {
            (Some(q), Some(embed)) => {
                let qv = embed(q);
                items.sort_by(|(_, a), (_, b)| {
                    let sa = crate::kernel::load::drift::cosine_similarity(&qv, &embed(&a.value));
                    let sb = crate::kernel::load::drift::cosine_similarity(&qv, &embed(&b.value));
                    sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            _ => {
                items.sort_by(|(_, a), (_, b)| b.inserted_at.cmp(&a.inserted_at));
            }
        }

        items
            .into_iter()
            .take(limit)
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }
}
