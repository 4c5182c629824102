//! DAG state registry (§4.8 Public contract): register/update node status;
//! snapshot returns counts by status plus completion percentage.
//!
//! Wraps `kernel::types::DagState`, the data-model type invariant 3 is
//! defined against, adding the snapshot view the Short-Term Memory contract
//! names.

use crate::kernel::types::{DagState, NodeStatus};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DagSnapshot {
    pub counts: HashMap<NodeStatus, usize>,
    pub completion_percentage: f64,
}

/// Thin registry over one `DagState` for the current Execute phase.
#[derive(Debug, Clone, Default)]
pub struct DagStateRegistry {
    state: DagState,
}

impl DagStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node_id: &str) {
        if self.state.status.get(node_id).is_none() {
            self.state.set(node_id, NodeStatus::Pending);
        }
    }

    /// Update a node's status, enforcing the PENDING -> RUNNING ->
    /// (COMPLETED | FAILED) transition (invariant 3). Returns whether the
    /// transition was accepted.
    pub fn update(&mut self, node_id: &str, status: NodeStatus) -> bool {
        self.state.transition(node_id, status)
    }

    /// Force-set status, bypassing the transition check — used only when a
    /// REPLAN rebuilds the graph and resets node state.
    pub fn reset(&mut self, node_id: &str, status: NodeStatus) {
        self.state.set(node_id, status);
    }

    pub fn status(&self, node_id: &str) -> NodeStatus {
        self.state.get(node_id)
    }

    pub fn snapshot(&self) -> DagSnapshot {
        DagSnapshot {
            counts: self.state.counts(),
            completion_percentage: self.state.completion_percentage(),
        }
    }

    pub fn inner(&self) -> &DagState {
        &self.state
    }

    pub fn inner_mut(&mut self) -> &mut DagState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reports_counts_and_completion() {
        let mut reg = DagStateRegistry::new();
        reg.register("a");
        reg.register("b");
        reg.update("a", NodeStatus::Running);
        reg.update("a", NodeStatus::Completed);
        let snap = reg.snapshot();
        assert_eq!(snap.counts.get(&NodeStatus::Completed), Some(&1));
        assert_eq!(snap.counts.get(&NodeStatus::Pending), Some(&1));
        assert!((snap.completion_percentage - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_backward_transition_through_registry() {
        let mut reg = DagStateRegistry::new();
        reg.register("a");
        assert!(reg.update("a", NodeStatus::Running));
        assert!(reg.update("a", NodeStatus::Completed));
        assert!(!reg.update("a", NodeStatus::Running));
    }
}
