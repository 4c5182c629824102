//! Loop detection: SHA-256 fingerprinting of decision `action|reasoning`
//! pairs, matching §4.3's literal mandate to hash each decision.

use crate::kernel::types::Decision;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopResult {
    pub is_looping: bool,
    pub loop_length: usize,
}

fn fingerprint(decision: &Decision) -> String {
    let key = format!("{:?}|{}", decision.action, decision.reasoning);
    let digest = Sha256::digest(key.as_bytes());
    digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(12)
        .collect()
}

/// Fingerprint each decision in the last `window` entries; if any 12-char
/// fingerprint repeats `>= repeat_threshold` times, a loop is reported.
/// `loop_length` is the most common gap between successive occurrences of
/// the offending fingerprint — e.g. a decision that repeats every cycle has
/// `loop_length == 1`.
pub fn detect_loop(history: &[Decision], window: usize, repeat_threshold: usize) -> LoopResult {
    let start = history.len().saturating_sub(window);
    let recent = &history[start..];

    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, decision) in recent.iter().enumerate() {
        positions.entry(fingerprint(decision)).or_default().push(idx);
    }

    let offender = positions
        .iter()
        .filter(|(_, pos)| pos.len() >= repeat_threshold)
        .max_by_key(|(_, pos)| pos.len());

    match offender {
        Some((_, pos)) => {
            let gaps: Vec<usize> = pos.windows(2).map(|w| w[1] - w[0]).collect();
            let mut gap_counts: HashMap<usize, usize> = HashMap::new();
            for g in &gaps {
                *gap_counts.entry(*g).or_insert(0) += 1;
            }
            let loop_length = gap_counts
                .into_iter()
                .max_by_key(|(_, count)| *count)
                .map(|(gap, _)| gap)
                .unwrap_or(1);
            LoopResult {
                is_looping: true,
                loop_length,
            }
        }
        None => LoopResult {
            is_looping: false,
            loop_length: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::types::DecisionAction;

    fn decision(action: DecisionAction, reasoning: &str, idx: u32) -> Decision {
        Decision {
            cycle_index: idx,
            action,
            reasoning: reasoning.to_string(),
            target_nodes: vec![],
        }
    }

    #[test]
    fn repeated_identical_decisions_detected_within_three_cycles() {
        let history = vec![
            decision(DecisionAction::Continue, "same output", 0),
            decision(DecisionAction::Continue, "same output", 1),
            decision(DecisionAction::Continue, "same output", 2),
        ];
        let result = detect_loop(&history, 10, 3);
        assert!(result.is_looping);
        assert_eq!(result.loop_length, 1);
    }

    #[test]
    fn loop_length_is_zero_when_no_loop_detected() {
        let history = vec![
            decision(DecisionAction::Continue, "step one", 0),
            decision(DecisionAction::Continue, "step two", 1),
        ];
        let result = detect_loop(&history, 10, 3);
        assert_eq!(result.loop_length, 0);
    }

    #[test]
    fn varied_decisions_not_a_loop() {
        let history = vec![
            decision(DecisionAction::Continue, "step one", 0),
            decision(DecisionAction::Continue, "step two", 1),
            decision(DecisionAction::Continue, "step three", 2),
        ];
        let result = detect_loop(&history, 10, 3);
        assert!(!result.is_looping);
    }
}
