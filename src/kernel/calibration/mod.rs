//! Confidence Calibrator (§4.5): maps a stated confidence through the
//! domain's observed-accuracy curve, combines it with the grounding score,
//! and flags over/under-confidence.

pub mod curve;
#[cfg(feature = "sqlite-calibration")]
pub mod store;

use crate::kernel::types::CalibratedConfidence;
use curve::CurveRegistry;

/// Stateful: owns the per-domain curve registry across cycles (§4.1 step 5).
pub struct ConfidenceCalibrator {
    curves: CurveRegistry,
    overconfidence_threshold: f64,
}

impl ConfidenceCalibrator {
    pub fn new(ema_decay: f64, overconfidence_threshold: f64) -> Self {
        Self {
            curves: CurveRegistry::new(ema_decay),
            overconfidence_threshold,
        }
    }

    /// Calibrate a stated confidence for `domain` against the grounding
    /// score `g` from the Hallucination Monitor: `calibrated = min(curve(c0), g)`
    /// (§4.5 Combination rule — grounding can only pull confidence down).
    pub fn calibrate(&self, domain: &str, stated: f64, grounding_score: f64) -> CalibratedConfidence {
        let curve = self.curves.get_or_init(domain);
        let curve_mapped = curve.map(stated);
        let calibrated = curve_mapped.min(grounding_score);
        let correction_factor = if stated > 0.0 {
            calibrated / stated
        } else {
            1.0
        };

        CalibratedConfidence {
            stated,
            calibrated,
            correction_factor,
            is_overconfident: stated - calibrated > self.overconfidence_threshold,
            is_underconfident: calibrated - stated > self.overconfidence_threshold,
        }
    }

    /// Record an observed accuracy (`0.0..=1.0`) for a stated confidence in
    /// `domain` to update the domain's curve via EMA for future cycles.
    pub fn observe(&self, domain: &str, stated: f64, observed_accuracy: f64) {
        self.curves.observe(domain, stated, observed_accuracy);
    }
}
