//! Hallucination Monitor (§4.4): extract atomic claims from a response and
//! grade each one against supplied evidence, producing a `GroundingReport`.
//!
//! Shares `epistemic::claims::ClaimExtractor`'s sentence splitting and
//! marker-based classification, and `epistemic::mod.rs`'s
//! `quick_hallucination_check` similarity-threshold grading texture.

pub mod claims;
pub mod contradiction;
pub mod grading;

pub use claims::{estimate_stated_confidence, ClaimExtractor};
pub use grading::Embedder;

use crate::kernel::types::{GroundingReport, Origin};

/// Stateless aside from extraction/grading config; a fresh monitor is cheap
/// to construct per cycle (§4.1 step 5, Gate-Out).
pub struct HallucinationMonitor {
    extractor: ClaimExtractor,
    grounded_threshold: f64,
    fabricated_threshold: f64,
}

impl HallucinationMonitor {
    pub fn new(grounded_threshold: f64, fabricated_threshold: f64) -> Self {
        Self {
            extractor: ClaimExtractor::new(),
            grounded_threshold,
            fabricated_threshold,
        }
    }

    pub fn with_min_claim_length(mut self, min_length: usize) -> Self {
        self.extractor = self.extractor.with_min_length(min_length);
        self
    }

    /// Extract claims from `response` and grade them against `evidence`.
    /// `embed`, when present, is used for cosine-similarity grading instead
    /// of the lexical fallback (§4.4 Failure semantics: never a no-op).
    pub fn analyze(
        &self,
        response: &str,
        evidence: &[Origin],
        embed: Option<Embedder<'_>>,
    ) -> GroundingReport {
        let claims = self.extractor.extract(response);
        grading::grade_all(
            &claims,
            evidence,
            embed,
            self.grounded_threshold,
            self.fabricated_threshold,
        )
    }

    /// Extract claims from `response` and flag any pair that asserts both
    /// sides of the same statement (§4.6 CONSISTENCY dimension).
    pub fn find_contradictions(&self, response: &str) -> Vec<String> {
        let claims = self.extractor.extract(response);
        contradiction::detect(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn origin(content: &str) -> Origin {
        Origin {
            content: content.to_string(),
            source_ref: "doc".to_string(),
            trust_score: 1.0,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn analyze_grades_claims_against_evidence() {
        let monitor = HallucinationMonitor::new(0.5, 0.3);
        let evidence = vec![origin("the service runs on port 8080 by default")];
        let report = monitor.analyze(
            "The service runs on port 8080. I think that's a sensible default.",
            &evidence,
            None,
        );
        assert_eq!(report.total_claims(), 2);
        assert!(report.grounded_count >= 1);
    }

    #[test]
    fn find_contradictions_flags_both_sides_claims() {
        let monitor = HallucinationMonitor::new(0.5, 0.3);
        let contradictions = monitor.find_contradictions(
            "The migration completed successfully. The migration did not complete successfully.",
        );
        assert_eq!(contradictions.len(), 1);
    }

    #[test]
    fn analyze_with_no_evidence_fabricates_factual_claims() {
        let monitor = HallucinationMonitor::new(0.5, 0.3);
        let report = monitor.analyze(
            "The 2024 Eurozone GDP growth rate was exactly 8 percent.",
            &[],
            None,
        );
        assert_eq!(report.fabricated_count, 1);
    }
}
