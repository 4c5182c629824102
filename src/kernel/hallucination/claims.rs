//! Claim extraction (§4.4): split on sentence boundaries, classify each
//! sentence as FACTUAL, REASONING, or OPINION.
//!
//! Shares `epistemic::claims::ClaimExtractor`'s abbreviation-aware sentence
//! splitter (so "Dr. Smith arrived." doesn't split at "Dr.") and
//! marker-word classification approach, retargeted from a richer category
//! taxonomy (CodeBehavior/Numerical/Relational/...) down to this system's
//! three grading-relevant categories.

use crate::kernel::types::{Claim, ClaimCategory};
use regex::Regex;
use std::sync::LazyLock;

static ABBREVIATIONS: &[&str] = &["Dr.", "Mr.", "Mrs.", "Ms.", "e.g.", "i.e.", "etc.", "vs."];

static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+\s+").unwrap());

static OPINION_MARKERS: &[&str] = &["i think", "in my opinion", "i believe", "i feel"];
static REASONING_CONNECTORS: &[&str] = &["therefore", "thus", "so ", "hence", "because"];

static HEDGE_MARKERS: &[&str] = &[
    "might", "may ", "possibly", "perhaps", "could be", "it seems",
    "not sure", "unsure", "unclear", "i'm not certain", "i am not certain",
    "probably", "likely",
];
static ASSERTIVE_MARKERS: &[&str] = &[
    "definitely", "certainly", "clearly", "undoubtedly", "without a doubt",
    "i'm confident", "i am confident", "always", "guaranteed", "absolutely",
];

fn protect_abbreviations(text: &str) -> String {
    let mut protected = text.to_string();
    for abbr in ABBREVIATIONS {
        let marker = abbr.replace('.', "\u{0}");
        protected = protected.replace(abbr, &marker);
    }
    protected
}

fn restore_abbreviations(text: &str) -> String {
    text.replace('\u{0}', ".")
}

/// Split `text` into sentences, treating common abbreviations as non-breaking.
///
/// The `regex` crate has no lookaround support, so the boundary pattern
/// matches the punctuation-plus-whitespace run itself and the punctuation is
/// kept with the sentence that precedes it, rather than splitting on a
/// zero-width lookbehind/lookahead.
pub fn split_sentences(text: &str) -> Vec<String> {
    let protected = protect_abbreviations(text);
    let mut sentences = Vec::new();
    let mut last = 0usize;
    for m in SENTENCE_BOUNDARY.find_iter(&protected) {
        let punctuation_end = m.start() + m.as_str().trim_end().len();
        sentences.push(protected[last..punctuation_end].trim().to_string());
        last = m.end();
    }
    if last < protected.len() {
        sentences.push(protected[last..].trim().to_string());
    }
    sentences
        .into_iter()
        .map(|s| restore_abbreviations(&s))
        .filter(|s| !s.is_empty())
        .collect()
}

fn classify(sentence: &str) -> ClaimCategory {
    let lower = sentence.to_lowercase();
    if OPINION_MARKERS.iter().any(|m| lower.contains(m)) {
        ClaimCategory::Opinion
    } else if REASONING_CONNECTORS.iter().any(|m| lower.contains(m)) {
        ClaimCategory::Reasoning
    } else {
        ClaimCategory::Factual
    }
}

fn is_question(sentence: &str) -> bool {
    sentence.trim_end().ends_with('?')
}

/// Self-report a stated-confidence scalar for `response`, for feeding the
/// Confidence Calibrator (§4.5) without requiring the executor surface to
/// carry one explicitly. Starts from a neutral baseline and shifts with the
/// same hedge/assertive marker vocabulary `classify` uses for opinion
/// detection, rather than a fixed constant.
pub fn estimate_stated_confidence(response: &str) -> f64 {
    let lower = response.to_lowercase();
    let hedges = HEDGE_MARKERS.iter().filter(|m| lower.contains(*m)).count() as f64;
    let assertions = ASSERTIVE_MARKERS.iter().filter(|m| lower.contains(*m)).count() as f64;
    (0.85 + 0.04 * assertions - 0.1 * hedges).clamp(0.05, 0.99)
}

/// Extracts atomic claims from a response. Skips questions (nothing to
/// grade) and sentences shorter than `min_length` (greetings, fragments).
pub struct ClaimExtractor {
    pub min_length: usize,
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl ClaimExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn extract(&self, response: &str) -> Vec<Claim> {
        let mut offset = 0usize;
        let mut claims = Vec::new();
        for sentence in split_sentences(response) {
            let start = response[offset..]
                .find(sentence.as_str())
                .map(|p| offset + p)
                .unwrap_or(offset);
            let end = start + sentence.len();
            offset = end;

            if sentence.len() < self.min_length || is_question(&sentence) {
                continue;
            }

            let category = classify(&sentence);
            claims.push(Claim::new(sentence, category, (start, end)));
        }
        claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sentences_and_protects_abbreviations() {
        let sentences = split_sentences("Dr. Smith arrived. The report is due.");
        assert_eq!(sentences, vec!["Dr. Smith arrived.", "The report is due."]);
    }

    #[test]
    fn classifies_opinion_reasoning_and_factual() {
        let extractor = ClaimExtractor::new();
        let claims = extractor.extract(
            "I think the approach is reasonable. Therefore it should ship. The server listens on port 8080.",
        );
        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].category, ClaimCategory::Opinion);
        assert_eq!(claims[1].category, ClaimCategory::Reasoning);
        assert_eq!(claims[2].category, ClaimCategory::Factual);
    }

    #[test]
    fn skips_questions_and_short_fragments() {
        let extractor = ClaimExtractor::new();
        let claims = extractor.extract("Is this correct? Yes. The function returns an integer value.");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].text, "The function returns an integer value.");
    }

    #[test]
    fn hedged_response_yields_lower_stated_confidence_than_assertive() {
        let hedged = estimate_stated_confidence("It might possibly be correct, but I'm not certain.");
        let assertive = estimate_stated_confidence("This is definitely and certainly correct, absolutely.");
        assert!(hedged < assertive, "hedged={hedged} assertive={assertive}");
    }

    #[test]
    fn neutral_response_stays_near_baseline() {
        let neutral = estimate_stated_confidence("The server listens on port 8080.");
        assert!((neutral - 0.85).abs() < 1e-9);
    }

    #[test]
    fn stated_confidence_is_bounded() {
        let very_hedged = estimate_stated_confidence(
            "It might possibly perhaps be unclear, I'm not certain, it's probably likely unsure.",
        );
        assert!(very_hedged >= 0.05);
    }
}
