//! Planning submodules (SPEC_FULL.md §C): `spec.md` §4.1's Execute
//! procedure starts from "Build initial `ExecutableDAG` from the
//! objective" without specifying how nodes are produced; these modules
//! supply that.

pub mod assembler;
pub mod curiosity;
pub mod decomposition;
pub mod graph_synthesis;
pub mod what_if;

use crate::kernel::types::{ExecutableDag, SignalTags};

/// Build the initial `ExecutableDag` for an objective (§4.1 Execute
/// procedure, first step): decompose then assemble.
pub fn build_initial_dag(objective: &str, tags: &SignalTags) -> ExecutableDag {
    let subtasks = decomposition::decompose(objective, tags);
    assembler::assemble(&subtasks)
}

/// Rebuild the tail of a plan on REPLAN, preserving completed work (§4.1
/// Execute procedure, Decision::Replan case; Open Question resolution 2
/// governs when this runs relative to an in-flight parallel group).
pub fn replan(existing: &ExecutableDag, objective: &str, tags: &SignalTags) -> ExecutableDag {
    let tail = build_initial_dag(objective, tags);
    graph_synthesis::merge_replan(existing, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_initial_dag_for_simple_objective() {
        let tags = SignalTags::default();
        let dag = build_initial_dag("answer the question", &tags);
        assert_eq!(dag.nodes.len(), 1);
    }
}
