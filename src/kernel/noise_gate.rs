//! Noise Gate (§4.6): applies the identity's quality bar to a candidate
//! output, annotates it when it passes, or rejects it with dimension-tagged
//! guidance and a decrementing per-trace retry budget.
//!
//! Shares `error.rs`'s enum-with-constructor-helpers idiom, applied here to
//! `RejectionDimension` (defined in `crate::error`, shared with the
//! `QualityError` taxonomy variant).

use crate::config::QualityBar;
use crate::error::RejectionDimension;
use crate::kernel::types::{
    CalibratedConfidence, FilteredOutput, GroundingReport, QualityMetadata, RejectedOutput,
    RetryGuidance,
};

/// Declares which output sections an identity requires present (§4.6
/// COMPLETENESS dimension). An empty set means no completeness check runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredOutputs {
    pub items: Vec<String>,
}

/// Contradiction pairs the hallucination monitor flagged as both-sides
/// claims (§4.6 CONSISTENCY dimension).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContradictionReport {
    pub contradictions: Vec<String>,
}

fn present_items<'a>(content: &str, required: &'a RequiredOutputs) -> Vec<&'a str> {
    required
        .items
        .iter()
        .filter(|item| !content.to_lowercase().contains(&item.to_lowercase()))
        .map(|s| s.as_str())
        .collect()
}

fn fabricated_guidance(report: &GroundingReport) -> String {
    match report
        .graded
        .iter()
        .enumerate()
        .find(|(_, g)| g.grade == crate::kernel::types::ClaimGrade::Fabricated)
    {
        Some((idx, g)) => format!(
            "Cite evidence for fabricated claim #{}: {}",
            idx + 1,
            g.claim.text
        ),
        None => "Cite evidence for fabricated claims.".to_string(),
    }
}

/// Per-trace retry budget (§4.6 Retry budget). Strictly decreasing; refused
/// at zero (data-model invariant 6). Cleared on the next top-level
/// `process()` call for the trace, i.e. a fresh `RetryBudget` per trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    remaining: u32,
}

impl RetryBudget {
    pub fn new(initial: u32) -> Self {
        Self { remaining: initial }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn has_budget(&self) -> bool {
        self.remaining > 0
    }

    /// Consume one unit of budget. Returns `false` (no-op) if already zero.
    pub fn consume(&mut self) -> bool {
        if self.remaining == 0 {
            false
        } else {
            self.remaining -= 1;
            true
        }
    }
}

/// The Gate-Out verdict: either a passing output or a rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum GateVerdict {
    Passed(FilteredOutput),
    Rejected(RejectedOutput),
}

/// Applies the quality bar and assembles dimension-tagged rejection guidance
/// (§4.6). Stateless: the retry budget it consumes is owned by the caller
/// (one per trace), per §5's scoped-resource policy.
pub struct NoiseGate;

impl NoiseGate {
    pub fn new() -> Self {
        Self
    }

    /// `apply(...)`: evaluate every dimension, and if any fail, consult
    /// `budget` to decide between a retryable and a terminal rejection.
    #[allow(clippy::too_many_arguments)]
    pub fn apply(
        &self,
        content: &str,
        cycles_used: u32,
        grounding: &GroundingReport,
        confidence: &CalibratedConfidence,
        bar: &QualityBar,
        contradictions: &ContradictionReport,
        required_outputs: &RequiredOutputs,
        budget: &mut RetryBudget,
    ) -> GateVerdict {
        let mut dimensions = Vec::new();

        if grounding.grounding_score < bar.grounding_min {
            dimensions.push(RejectionDimension::Grounding {
                score: grounding.grounding_score,
                floor: bar.grounding_min,
            });
        }
        if confidence.calibrated < bar.confidence_min {
            dimensions.push(RejectionDimension::Confidence {
                score: confidence.calibrated,
                floor: bar.confidence_min,
            });
        }
        if !contradictions.contradictions.is_empty() {
            dimensions.push(RejectionDimension::Consistency {
                contradictions: contradictions.contradictions.clone(),
            });
        }
        let missing = present_items(content, required_outputs);
        if !missing.is_empty() {
            dimensions.push(RejectionDimension::Completeness {
                missing: missing.into_iter().map(str::to_string).collect(),
            });
        }

        if dimensions.is_empty() {
            return GateVerdict::Passed(FilteredOutput {
                content: content.to_string(),
                metadata: QualityMetadata {
                    grounding_score: grounding.grounding_score,
                    calibrated_confidence: confidence.calibrated,
                    cycles_used,
                },
            });
        }

        let guidance = if budget.consume() {
            Some(self.synthesize_guidance(&dimensions, grounding))
        } else {
            None
        };

        GateVerdict::Rejected(RejectedOutput {
            reasons: dimensions,
            retry_guidance: guidance,
        })
    }

    fn synthesize_guidance(
        &self,
        dimensions: &[RejectionDimension],
        grounding: &GroundingReport,
    ) -> RetryGuidance {
        let mut feedback = Vec::new();
        for dim in dimensions {
            let line = match dim {
                RejectionDimension::Grounding { .. } => fabricated_guidance(grounding),
                RejectionDimension::Confidence { .. } => {
                    "Verify or hedge overconfident statements.".to_string()
                }
                RejectionDimension::Consistency { contradictions } => format!(
                    "Resolve internal contradictions: {}",
                    contradictions.join("; ")
                ),
                RejectionDimension::Completeness { missing } => {
                    format!("Include the missing required output(s): {}", missing.join(", "))
                }
            };
            feedback.push(line);
        }
        RetryGuidance {
            dimension_feedback: feedback,
        }
    }
}

impl Default for NoiseGate {
    fn default() -> Self {
        Self::new()
    }
}
