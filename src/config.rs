//! Configuration surface for the cognitive kernel.
//!
//! `KernelConfig` aggregates every named option from the configuration
//! surface, each field defaulting to the literal value given there.
//! `IdentityConfig` carries the per-spawn overrides that are not
//! process-global (allowed/forbidden tools, ethical constraints, quality
//! bar) — those live on the identity constructed in Gate-In, not on the
//! shared `KernelConfig`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// A grounding/confidence quality bar: `(grounding_min, confidence_min)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBar {
    pub grounding_min: f64,
    pub confidence_min: f64,
}

impl Default for QualityBar {
    fn default() -> Self {
        Self {
            grounding_min: 0.8,
            confidence_min: 0.8,
        }
    }
}

/// Process-global configuration, aggregating §6's configuration surface.
///
/// Load order is: `KernelConfig::default()` → optional config file →
/// environment variable overrides (`KERNEL_<FIELD>`, uppercased) →
/// per-call `SpawnRequest` overrides applied by the caller after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Activation Router: pressure thresholds for pipeline downgrade.
    pub pressure_moderate_threshold: f64,
    pub pressure_high_threshold: f64,
    /// Activation Router: decision cache TTL in seconds.
    pub cache_ttl_seconds: u64,

    /// Cognitive Load Monitor: load aggregate weights.
    pub load_compute_weight: f64,
    pub load_time_weight: f64,
    pub load_breadth_weight: f64,
    /// Cognitive Load Monitor: loop detector window and repeat threshold.
    pub loop_window: usize,
    pub loop_repeat_threshold: usize,
    /// Cognitive Load Monitor: goal-drift threshold.
    pub goal_drift_threshold: f64,

    /// Hallucination Monitor: grading thresholds.
    pub grounded_threshold: f64,
    pub fabricated_threshold: f64,

    /// Noise Gate: default quality bar (overridable per-identity).
    pub grounding_floor: f64,
    pub confidence_floor: f64,
    /// Noise Gate: retry budget per trace.
    pub retry_budget: u32,

    /// Confidence Calibrator: EMA decay and overconfidence threshold.
    pub calibration_ema_decay: f64,
    pub overconfidence_threshold: f64,
    pub calibration_sample_window: usize,

    /// Short-Term Memory: ring buffer capacity and entity TTL.
    pub event_buffer_capacity: usize,
    pub entity_ttl_seconds: u64,
    pub entity_cache_max_entries: usize,

    /// Concurrency & resource model: phase wall-clock budgets (§5).
    pub gate_in_timeout_ms: u64,
    pub execute_cycle_timeout_ms: u64,
    pub gate_out_timeout_ms: u64,

    /// Decision history sliding window for loop/oscillation detection (§3 lifecycles).
    pub decision_history_window: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            pressure_moderate_threshold: 0.6,
            pressure_high_threshold: 0.8,
            cache_ttl_seconds: 60,

            load_compute_weight: 0.5,
            load_time_weight: 0.3,
            load_breadth_weight: 0.2,
            loop_window: 10,
            loop_repeat_threshold: 3,
            goal_drift_threshold: 0.5,

            grounded_threshold: 0.5,
            fabricated_threshold: 0.3,

            grounding_floor: 0.8,
            confidence_floor: 0.8,
            retry_budget: 2,

            calibration_ema_decay: 0.1,
            overconfidence_threshold: 0.15,
            calibration_sample_window: 100,

            event_buffer_capacity: 100,
            entity_ttl_seconds: 60,
            entity_cache_max_entries: 1000,

            gate_in_timeout_ms: 10_000,
            execute_cycle_timeout_ms: 60_000,
            gate_out_timeout_ms: 30_000,

            decision_history_window: 10,
        }
    }
}

impl KernelConfig {
    /// Default quality bar derived from this config's floors.
    pub fn default_quality_bar(&self) -> QualityBar {
        QualityBar {
            grounding_min: self.grounding_floor,
            confidence_min: self.confidence_floor,
        }
    }

    /// Apply `KERNEL_*` environment variable overrides on top of the current
    /// values. Unset or unparseable variables leave the field unchanged.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(v) = env_f64("KERNEL_PRESSURE_MODERATE_THRESHOLD") {
            self.pressure_moderate_threshold = v;
        }
        if let Some(v) = env_f64("KERNEL_PRESSURE_HIGH_THRESHOLD") {
            self.pressure_high_threshold = v;
        }
        if let Some(v) = env_u64("KERNEL_CACHE_TTL_SECONDS") {
            self.cache_ttl_seconds = v;
        }
        if let Some(v) = env_f64("KERNEL_GOAL_DRIFT_THRESHOLD") {
            self.goal_drift_threshold = v;
        }
        if let Some(v) = env_f64("KERNEL_GROUNDED_THRESHOLD") {
            self.grounded_threshold = v;
        }
        if let Some(v) = env_f64("KERNEL_FABRICATED_THRESHOLD") {
            self.fabricated_threshold = v;
        }
        if let Some(v) = env_f64("KERNEL_GROUNDING_FLOOR") {
            self.grounding_floor = v;
        }
        if let Some(v) = env_f64("KERNEL_CONFIDENCE_FLOOR") {
            self.confidence_floor = v;
        }
        if let Some(v) = env_u64("KERNEL_RETRY_BUDGET") {
            self.retry_budget = v as u32;
        }
        if let Some(v) = env_f64("KERNEL_CALIBRATION_EMA_DECAY") {
            self.calibration_ema_decay = v;
        }
        if let Some(v) = env_usize("KERNEL_EVENT_BUFFER_CAPACITY") {
            self.event_buffer_capacity = v;
        }
        if let Some(v) = env_u64("KERNEL_ENTITY_TTL_SECONDS") {
            self.entity_ttl_seconds = v;
        }
        self
    }
}

/// Per-spawn identity overrides (§4.1 step 1).
///
/// Not process-global: constructed fresh for each `SpawnRequest` and bound
/// to the identity for the lifetime of one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub tools_allowed: HashSet<String>,
    pub tools_forbidden: HashSet<String>,
    pub ethical_constraints: Vec<String>,
    pub quality_bar: QualityBar,
    /// Output sections the identity declares required (§4.6 COMPLETENESS
    /// dimension), e.g. `["summary", "next steps"]`. Empty means no
    /// completeness check runs.
    pub required_outputs: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            tools_allowed: HashSet::new(),
            tools_forbidden: HashSet::new(),
            ethical_constraints: Vec::new(),
            quality_bar: QualityBar::default(),
            required_outputs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_configuration_surface() {
        let cfg = KernelConfig::default();
        assert_eq!(cfg.pressure_moderate_threshold, 0.6);
        assert_eq!(cfg.pressure_high_threshold, 0.8);
        assert_eq!(cfg.cache_ttl_seconds, 60);
        assert_eq!(cfg.loop_window, 10);
        assert_eq!(cfg.loop_repeat_threshold, 3);
        assert_eq!(cfg.grounded_threshold, 0.5);
        assert_eq!(cfg.fabricated_threshold, 0.3);
        assert_eq!(cfg.retry_budget, 2);
        assert_eq!(cfg.calibration_ema_decay, 0.1);
    }

    #[test]
    fn env_override_roundtrip() {
        std::env::set_var("KERNEL_RETRY_BUDGET", "5");
        let cfg = KernelConfig::default().apply_env_overrides();
        assert_eq!(cfg.retry_budget, 5);
        std::env::remove_var("KERNEL_RETRY_BUDGET");
    }
}
