//! Graph synthesis on REPLAN (SPEC_FULL.md §C): merges the DAG's
//! completed-node outputs with a freshly decomposed tail rather than
//! discarding and rebuilding the whole graph, so work already done survives
//! a downgrade or goal revision.

use crate::kernel::types::{DagNode, EdgeKind, ExecutableDag, NodeStatus};

/// Merge a freshly assembled `tail` onto `existing`, keeping every node
/// `existing` already completed (and the edges between them) and wiring a
/// sequential edge from each of `existing`'s completed frontier nodes into
/// the tail's first nodes, so the new work picks up from where the old plan
/// left off.
pub fn merge_replan(existing: &ExecutableDag, tail: ExecutableDag) -> ExecutableDag {
    let completed: Vec<&DagNode> = existing
        .nodes
        .iter()
        .filter(|n| existing.state.get(&n.id) == NodeStatus::Completed)
        .collect();

    let mut nodes = completed.iter().map(|n| (*n).clone()).collect::<Vec<_>>();
    let mut edges: Vec<_> = existing
        .edges
        .iter()
        .filter(|e| {
            existing.state.get(&e.from) == NodeStatus::Completed
                && existing.state.get(&e.to) == NodeStatus::Completed
        })
        .cloned()
        .collect();

    // Re-namespace the tail's node ids so they never collide with the
    // surviving completed nodes from the old plan.
    let prefix = format!("replan{}_", uuid::Uuid::new_v4().simple());
    let remap = |id: &str| format!("{prefix}{id}");

    for node in &tail.nodes {
        nodes.push(DagNode {
            id: remap(&node.id),
            instruction: node.instruction.clone(),
            parallel_group: node.parallel_group.clone(),
        });
    }
    for edge in &tail.edges {
        edges.push(crate::kernel::types::DagEdge {
            from: remap(&edge.from),
            to: remap(&edge.to),
            kind: edge.kind,
        });
    }

    // Link every completed node to every tail root (a tail node with no
    // incoming tail edge) so the new work is sequenced after the old.
    let tail_roots: Vec<String> = tail
        .nodes
        .iter()
        .filter(|n| !tail.edges.iter().any(|e| e.to == n.id))
        .map(|n| remap(&n.id))
        .collect();
    for completed_node in &completed {
        for root in &tail_roots {
            edges.push(crate::kernel::types::DagEdge {
                from: completed_node.id.clone(),
                to: root.clone(),
                kind: EdgeKind::Sequential,
            });
        }
    }

    let mut merged = ExecutableDag::new(nodes, edges);
    for node in &completed {
        merged.state.set(&node.id, NodeStatus::Completed);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::planning::{assembler, decomposition::Subtask};

    #[test]
    fn completed_work_survives_replan_merge() {
        let subtasks = vec![Subtask { description: "a".into(), parallel_group: None }];
        let mut existing = assembler::assemble(&subtasks);
        existing.state.transition("n0", NodeStatus::Running);
        existing.state.transition("n0", NodeStatus::Completed);

        let tail_subtasks = vec![Subtask { description: "b".into(), parallel_group: None }];
        let tail = assembler::assemble(&tail_subtasks);

        let merged = merge_replan(&existing, tail);
        assert!(merged.nodes.iter().any(|n| n.id == "n0"));
        assert_eq!(merged.state.get("n0"), NodeStatus::Completed);
        assert_eq!(merged.nodes.len(), 2);
    }
}
