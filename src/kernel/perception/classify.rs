//! Three-layer classification (SPEC_FULL.md §C): linguistic / semantic
//! proximity / hybrid merge, producing a `ClassificationResult` consumed as
//! one input to the Activation Router's domain-specificity score (§4.2).
//! Semantic proximity without an embedder degrades to the same
//! lexical-overlap fallback goal-drift detection uses, for consistency
//! (Open Question resolution 3).

use crate::kernel::load::drift::lexical_similarity;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub domain: String,
    pub linguistic_score: f64,
    pub semantic_score: f64,
    pub hybrid_score: f64,
}

fn domain_keywords() -> HashMap<&'static str, &'static [&'static str]> {
    [
        ("finance", &["budget", "revenue", "gdp", "invoice", "payroll", "tax"][..]),
        ("legal", &["contract", "liability", "compliance", "clause", "statute"][..]),
        ("engineering", &["deploy", "server", "compile", "regression", "latency"][..]),
        ("support", &["reset", "password", "login", "account", "ticket"][..]),
    ]
    .into_iter()
    .collect()
}

fn linguistic_layer(text: &str, keywords: &[&str]) -> f64 {
    let lower = text.to_lowercase();
    let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
    (hits as f64 / keywords.len().max(1) as f64).min(1.0)
}

/// Semantic-proximity layer: cosine similarity against a domain exemplar
/// embedding when `embed` is available, else the lexical-overlap fallback
/// against a synthesized "bag of domain keywords" exemplar text.
fn semantic_layer(
    text: &str,
    keywords: &[&str],
    embed: Option<&dyn Fn(&str) -> Vec<f64>>,
) -> f64 {
    let exemplar = keywords.join(" ");
    match embed {
        Some(embed) => {
            let tv = embed(text);
            let ev = embed(&exemplar);
            crate::kernel::load::drift::cosine_similarity(&tv, &ev).max(0.0)
        }
        None => lexical_similarity(text, &exemplar),
    }
}

/// Classify `text` into the best-matching domain, scoring linguistic and
/// semantic layers and merging them into a hybrid score.
pub fn classify(text: &str, embed: Option<&dyn Fn(&str) -> Vec<f64>>) -> ClassificationResult {
    let table = domain_keywords();
    let mut best: Option<ClassificationResult> = None;

    for (domain, keywords) in table {
        let linguistic = linguistic_layer(text, keywords);
        let semantic = semantic_layer(text, keywords, embed);
        let hybrid = 0.5 * linguistic + 0.5 * semantic;
        let candidate = ClassificationResult {
            domain: domain.to_string(),
            linguistic_score: linguistic,
            semantic_score: semantic,
            hybrid_score: hybrid,
        };
        if best.as_ref().map(|b| candidate.hybrid_score > b.hybrid_score).unwrap_or(true) {
            best = Some(candidate);
        }
    }

    best.unwrap_or(ClassificationResult {
        domain: "general".to_string(),
        linguistic_score: 0.0,
        semantic_score: 0.0,
        hybrid_score: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finance_keywords_classify_as_finance() {
        let result = classify("What was the GDP growth and tax revenue this quarter?", None);
        assert_eq!(result.domain, "finance");
    }

    #[test]
    fn unrelated_text_yields_low_hybrid_score() {
        let result = classify("A completely unrelated sentence about gardening.", None);
        assert!(result.hybrid_score < 0.3);
    }
}
