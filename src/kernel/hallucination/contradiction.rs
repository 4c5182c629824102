//! Contradiction detection (§4.6 CONSISTENCY dimension): flag claim pairs
//! that assert both sides of the same statement.
//!
//! Reuses `kernel::load::drift::lexical_similarity`'s token-Jaccard metric
//! (the same lexical fallback goal drift uses): two claims that share most
//! of their tokens once negation markers are stripped, but disagree on
//! negation itself, are the same underlying statement asserted both ways.

use crate::kernel::load::drift::lexical_similarity;
use crate::kernel::types::{Claim, ClaimCategory};

const NEGATION_MARKERS: &[&str] = &["not ", "n't", "never ", "no longer ", "cannot ", "can't "];
const OVERLAP_THRESHOLD: f64 = 0.6;

fn is_negated(text: &str) -> bool {
    let lower = format!("{} ", text.to_lowercase());
    NEGATION_MARKERS.iter().any(|m| lower.contains(m))
}

fn strip_negation(text: &str) -> String {
    let mut lower = format!("{} ", text.to_lowercase());
    for marker in NEGATION_MARKERS {
        lower = lower.replace(marker, " ");
    }
    lower
}

/// Find claim pairs that assert both sides of the same statement:
/// near-identical once negation is stripped, but disagree on negation
/// itself. Opinions are excluded — they cannot contradict a fact by
/// construction (§4.4 Grading: opinions are always `GROUNDED`).
pub fn detect(claims: &[Claim]) -> Vec<String> {
    let candidates: Vec<&Claim> = claims
        .iter()
        .filter(|c| c.category != ClaimCategory::Opinion)
        .collect();

    let mut contradictions = Vec::new();
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let a = candidates[i];
            let b = candidates[j];
            if is_negated(&a.text) == is_negated(&b.text) {
                continue;
            }
            let similarity = lexical_similarity(&strip_negation(&a.text), &strip_negation(&b.text));
            if similarity >= OVERLAP_THRESHOLD {
                contradictions.push(format!("\"{}\" vs \"{}\"", a.text, b.text));
            }
        }
    }
    contradictions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_negated_restatement_as_contradiction() {
        let claims = vec![
            Claim::new(
                "The deployment succeeded on the first attempt",
                ClaimCategory::Factual,
                (0, 10),
            ),
            Claim::new(
                "The deployment did not succeed on the first attempt",
                ClaimCategory::Factual,
                (0, 10),
            ),
        ];
        let found = detect(&claims);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn unrelated_claims_are_not_contradictions() {
        let claims = vec![
            Claim::new("The server listens on port 8080", ClaimCategory::Factual, (0, 10)),
            Claim::new("The invoice was sent on Tuesday", ClaimCategory::Factual, (0, 10)),
        ];
        assert!(detect(&claims).is_empty());
    }

    #[test]
    fn opinions_are_excluded_from_contradiction_checks() {
        let claims = vec![
            Claim::new("I think the rollout went well", ClaimCategory::Opinion, (0, 10)),
            Claim::new("I think the rollout did not go well", ClaimCategory::Opinion, (0, 10)),
        ];
        assert!(detect(&claims).is_empty());
    }
}
