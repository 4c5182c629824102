//! Claim grading (§4.4): grade each extracted claim against evidence.

use crate::kernel::load::drift::{cosine_similarity, lexical_similarity};
use crate::kernel::types::{Claim, ClaimCategory, ClaimGrade, GradedClaim, GroundingReport, Origin};

fn grade_from_similarity(similarity: f64, grounded_threshold: f64, fabricated_threshold: f64) -> ClaimGrade {
    if similarity >= grounded_threshold {
        ClaimGrade::Grounded
    } else if similarity < fabricated_threshold {
        ClaimGrade::Fabricated
    } else {
        ClaimGrade::Inferred
    }
}

fn weight(grade: ClaimGrade) -> f64 {
    match grade {
        ClaimGrade::Grounded => 1.0,
        ClaimGrade::Inferred => 0.5,
        ClaimGrade::Fabricated => 0.0,
    }
}

/// An embedder function: text -> vector. Absent, grading falls back to
/// token-Jaccard similarity against each `Origin.content`, per §4.4 Failure
/// semantics.
pub type Embedder<'a> = &'a dyn Fn(&str) -> Vec<f64>;

fn max_similarity(claim_text: &str, evidence: &[Origin], embed: Option<Embedder<'_>>) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }
    match embed {
        Some(embed) => {
            let claim_vec = embed(claim_text);
            evidence
                .iter()
                .map(|o| cosine_similarity(&claim_vec, &embed(&o.content)))
                .fold(0.0_f64, f64::max)
        }
        None => evidence
            .iter()
            .map(|o| lexical_similarity(claim_text, &o.content))
            .fold(0.0_f64, f64::max),
    }
}

/// Grade a single claim against the evidence set (§4.4 Grading).
pub fn grade_claim(
    claim: &Claim,
    evidence: &[Origin],
    embed: Option<Embedder<'_>>,
    factual_claims_so_far: &[Claim],
    grounded_threshold: f64,
    fabricated_threshold: f64,
) -> GradedClaim {
    match claim.category {
        ClaimCategory::Opinion => GradedClaim {
            claim: claim.clone(),
            grade: ClaimGrade::Grounded,
            similarity: 1.0,
            depends_on: Vec::new(),
        },
        ClaimCategory::Factual => {
            let similarity = max_similarity(&claim.text, evidence, embed);
            let grade = grade_from_similarity(similarity, grounded_threshold, fabricated_threshold);
            GradedClaim {
                claim: claim.clone(),
                grade,
                similarity,
                depends_on: Vec::new(),
            }
        }
        ClaimCategory::Reasoning => {
            let similarity = max_similarity(&claim.text, evidence, embed);
            // Relaxed threshold: -0.1 on both bounds, per §4.4.
            let grade = grade_from_similarity(
                similarity,
                grounded_threshold - 0.1,
                fabricated_threshold - 0.1,
            );
            let depends_on = factual_claims_so_far.iter().map(|c| c.id.clone()).collect();
            GradedClaim {
                claim: claim.clone(),
                grade,
                similarity,
                depends_on,
            }
        }
    }
}

/// Grade every claim in order, then aggregate into a `GroundingReport`.
pub fn grade_all(
    claims: &[Claim],
    evidence: &[Origin],
    embed: Option<Embedder<'_>>,
    grounded_threshold: f64,
    fabricated_threshold: f64,
) -> GroundingReport {
    let mut graded = Vec::with_capacity(claims.len());
    let mut factual_so_far = Vec::new();

    for claim in claims {
        let g = grade_claim(
            claim,
            evidence,
            embed,
            &factual_so_far,
            grounded_threshold,
            fabricated_threshold,
        );
        if claim.category == ClaimCategory::Factual {
            factual_so_far.push(claim.clone());
        }
        graded.push(g);
    }

    aggregate(graded)
}

/// `Σ weight(grade) × similarity / count`, bounded to [0,1] (§4.4 Grounding score).
pub fn aggregate(graded: Vec<GradedClaim>) -> GroundingReport {
    let grounded_count = graded.iter().filter(|g| g.grade == ClaimGrade::Grounded).count();
    let inferred_count = graded.iter().filter(|g| g.grade == ClaimGrade::Inferred).count();
    let fabricated_count = graded.iter().filter(|g| g.grade == ClaimGrade::Fabricated).count();

    let grounding_score = if graded.is_empty() {
        1.0
    } else {
        let sum: f64 = graded.iter().map(|g| weight(g.grade) * g.similarity).sum();
        (sum / graded.len() as f64).clamp(0.0, 1.0)
    };

    GroundingReport {
        graded,
        grounded_count,
        inferred_count,
        fabricated_count,
        grounding_score,
    }
}
