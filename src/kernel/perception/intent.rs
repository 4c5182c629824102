//! Intent/sentiment/urgency scoring (SPEC_FULL.md §C): keyword and
//! punctuation heuristics feeding `SignalTags.primary_intent` and
//! `SignalTags.urgency_band`.

use crate::kernel::types::UrgencyBand;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CognitiveLabels {
    pub intent: String,
    pub sentiment: Sentiment,
    pub urgency_band: UrgencyBand,
}

static ESCALATION_WORDS: &[&str] = &["urgent", "immediately", "asap", "critical", "right now", "emergency"];
static NEGATIVE_WORDS: &[&str] = &["broken", "fails", "failing", "error", "wrong", "angry", "terrible", "unacceptable"];
static POSITIVE_WORDS: &[&str] = &["thanks", "great", "works well", "appreciate", "love"];

static IMPERATIVE_VERBS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "reset", "fix", "show", "list", "create", "delete", "update", "explain", "summarize",
        "find", "dump", "write", "build", "run", "stop", "cancel",
    ]
});

fn first_word(text: &str) -> Option<String> {
    text.split_whitespace().next().map(|w| w.to_lowercase())
}

fn detect_intent(text: &str) -> String {
    let lower = text.to_lowercase();
    if let Some(word) = first_word(&lower) {
        if IMPERATIVE_VERBS.contains(&word.as_str()) {
            return format!("{word}_request");
        }
    }
    if lower.trim_end().ends_with('?') {
        return "question".to_string();
    }
    "statement".to_string()
}

fn detect_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let negative = NEGATIVE_WORDS.iter().any(|w| lower.contains(w));
    let positive = POSITIVE_WORDS.iter().any(|w| lower.contains(w));
    match (negative, positive) {
        (true, false) => Sentiment::Negative,
        (false, true) => Sentiment::Positive,
        _ => Sentiment::Neutral,
    }
}

fn detect_urgency(text: &str) -> UrgencyBand {
    let lower = text.to_lowercase();
    let escalation_hits = ESCALATION_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let exclamations = text.chars().filter(|c| *c == '!').count();

    if escalation_hits >= 2 || (escalation_hits >= 1 && exclamations >= 1) {
        UrgencyBand::Critical
    } else if escalation_hits >= 1 || exclamations >= 2 {
        UrgencyBand::High
    } else if exclamations >= 1 {
        UrgencyBand::Normal
    } else {
        UrgencyBand::Low
    }
}

/// Score `text` for intent, sentiment, and urgency (§4.1 step 3: "run
/// perception in parallel: intent/sentiment/urgency scorers").
pub fn score(text: &str) -> CognitiveLabels {
    CognitiveLabels {
        intent: detect_intent(text),
        sentiment: detect_sentiment(text),
        urgency_band: detect_urgency(text),
    }
}
