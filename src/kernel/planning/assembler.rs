//! DAG assembly (SPEC_FULL.md §C): turn a subtask list into `DagNode`s with
//! bound action instructions and sequential/data-dependency edges,
//! producing the `ExecutableDag` that `kernel::ooda` drives.

use crate::kernel::planning::decomposition::Subtask;
use crate::kernel::types::{DagEdge, DagNode, EdgeKind, ExecutableDag};

/// Assemble subtasks into an `ExecutableDag`. Subtasks sharing a parallel
/// group get no edge between them; the first subtask with no group (the
/// synthesis step) gets a sequential edge from every node in the preceding
/// group, so it only becomes frontier-eligible once they've all completed.
pub fn assemble(subtasks: &[Subtask]) -> ExecutableDag {
    let nodes: Vec<DagNode> = subtasks
        .iter()
        .enumerate()
        .map(|(i, s)| DagNode {
            id: format!("n{i}"),
            instruction: s.description.clone(),
            parallel_group: s.parallel_group.clone(),
        })
        .collect();

    let mut edges = Vec::new();
    let mut last_group_nodes: Vec<String> = Vec::new();
    let mut last_group_name: Option<String> = None;

    for (i, s) in subtasks.iter().enumerate() {
        match &s.parallel_group {
            Some(group) => {
                if last_group_name.as_deref() != Some(group.as_str()) {
                    last_group_nodes.clear();
                    last_group_name = Some(group.clone());
                }
                last_group_nodes.push(format!("n{i}"));
            }
            None => {
                for from in &last_group_nodes {
                    edges.push(DagEdge {
                        from: from.clone(),
                        to: format!("n{i}"),
                        kind: EdgeKind::Sequential,
                    });
                }
                last_group_nodes.clear();
                last_group_name = None;
            }
        }
    }

    ExecutableDag::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesis_node_depends_on_parallel_group() {
        let subtasks = vec![
            Subtask { description: "a".into(), parallel_group: Some("gather".into()) },
            Subtask { description: "b".into(), parallel_group: Some("gather".into()) },
            Subtask { description: "synth".into(), parallel_group: None },
        ];
        let dag = assemble(&subtasks);
        assert_eq!(dag.edges.len(), 2);
        assert!(dag.edges.iter().all(|e| e.to == "n2"));
        let frontier: Vec<_> = dag.frontier().iter().map(|n| n.id.clone()).collect();
        assert_eq!(frontier, vec!["n0".to_string(), "n1".to_string()]);
    }

    #[test]
    fn single_subtask_has_no_edges() {
        let subtasks = vec![Subtask { description: "solo".into(), parallel_group: None }];
        let dag = assemble(&subtasks);
        assert!(dag.edges.is_empty());
        assert_eq!(dag.frontier().len(), 1);
    }
}
