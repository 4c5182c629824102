//! Task decomposition (SPEC_FULL.md §C): break an objective into an ordered
//! list of subtask descriptions using heuristics over classified intent and
//! required skills/tools from `SignalTags`.

use crate::kernel::types::SignalTags;

#[derive(Debug, Clone, PartialEq)]
pub struct Subtask {
    pub description: String,
    /// Subtasks sharing the same `Some(group)` have no data dependency on
    /// each other and may run in parallel.
    pub parallel_group: Option<String>,
}

/// Decompose `objective` into subtasks. Trivial/simple objectives (no
/// required tools or skills) decompose to a single subtask; anything with
/// required tools gets one subtask per tool (same parallel group, since
/// tool calls against independent inputs don't share data dependencies),
/// followed by a synthesis subtask that depends on all of them.
pub fn decompose(objective: &str, tags: &SignalTags) -> Vec<Subtask> {
    if tags.required_tools.is_empty() && tags.required_skills.is_empty() {
        return vec![Subtask {
            description: objective.to_string(),
            parallel_group: None,
        }];
    }

    let mut subtasks: Vec<Subtask> = tags
        .required_tools
        .iter()
        .map(|tool| Subtask {
            description: format!("use {tool} to gather input for: {objective}"),
            parallel_group: Some("gather".to_string()),
        })
        .collect();

    subtasks.push(Subtask {
        description: format!("synthesize final answer for: {objective}"),
        parallel_group: None,
    });

    subtasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn no_required_tools_yields_single_subtask() {
        let tags = SignalTags::default();
        let subtasks = decompose("answer the question", &tags);
        assert_eq!(subtasks.len(), 1);
    }

    #[test]
    fn required_tools_yield_parallel_gather_plus_synthesis() {
        let mut tags = SignalTags::default();
        tags.required_tools = HashSet::from(["web_search".to_string(), "calculator".to_string()]);
        let subtasks = decompose("compare prices", &tags);
        assert_eq!(subtasks.len(), 3);
        assert_eq!(
            subtasks.iter().filter(|s| s.parallel_group.as_deref() == Some("gather")).count(),
            2
        );
    }
}
