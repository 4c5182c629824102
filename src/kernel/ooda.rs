//! OODA Cycle Driver (§4.7): one Observe/Orient/Decide/Act step over the
//! current `ExecutableDag`.
//!
//! Grounded on the teacher's `trajectory.rs` step-driver shape (state in,
//! decision out) and `async_multitasking`'s parallel-dispatch convention
//! from `examples/original_source/kernel/async_multitasking`, adapted here
//! to `futures::future::join_all` over one DAG parallel group per cycle.

use crate::error::Result;
use crate::kernel::lifecycle::interrupts::{Interrupt, InterruptKind};
use crate::kernel::memory::{ContextSlice, Event, ShortTermMemory};
use crate::kernel::types::{Decision, DecisionAction, DagNode, ExecutableDag, NodeStatus};
use async_trait::async_trait;
use futures::future::join_all;

fn interrupt_kind_label(kind: &InterruptKind) -> &'static str {
    match kind {
        InterruptKind::Cancellation => "cancellation",
        InterruptKind::Deadline => "deadline",
        InterruptKind::PermissionDenied { .. } => "permission_denied",
    }
}

/// An interrupt sets `is_blocked` during Orient exactly like a blocking
/// event does (§4.7 Observe); this is the conversion at the Observe/memory
/// boundary.
fn interrupt_to_event(interrupt: Interrupt) -> Event {
    Event::blocking(interrupt_kind_label(&interrupt.kind), interrupt.reason)
}

/// The outcome of dispatching one node's bound action (§4.7 Act). A node
/// that declares a job id without a body is asynchronous: the driver marks
/// it RUNNING and yields control rather than blocking on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub node_id: String,
    pub output: Option<String>,
    pub async_job_id: Option<String>,
}

impl ActionResult {
    pub fn completed(node_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            output: Some(output.into()),
            async_job_id: None,
        }
    }

    pub fn pending(node_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            output: None,
            async_job_id: Some(job_id.into()),
        }
    }

    pub fn is_async(&self) -> bool {
        self.async_job_id.is_some()
    }
}

/// Dispatches one DAG node's bound action. The kernel never hardcodes what
/// a node *is* (tool call, inference call, sub-DAG); this is the seam a host
/// application or test fake fills in.
#[async_trait]
pub trait NodeExecutor: Send + Sync {
    async fn execute(&self, node: &DagNode, context: &ContextSlice) -> Result<ActionResult>;
}

/// Assembled in Orient: the current context slice plus whether any observed
/// event blocks progress this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedState {
    pub context: ContextSlice,
    pub objective: String,
    pub is_blocked: bool,
    pub block_reason: Option<String>,
}

/// One Observe/Orient/Decide/Act step, stateless aside from the memory and
/// DAG it is handed each call (§4.1 Execute procedure, step 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct OodaCycleDriver;

impl OodaCycleDriver {
    pub fn new() -> Self {
        Self
    }

    /// Observe: drain pending stream events and interrupts into short-term
    /// memory. O(events), never blocks.
    pub fn observe(
        &self,
        memory: &mut ShortTermMemory,
        stream_events: Vec<Event>,
        interrupts: Vec<Interrupt>,
    ) {
        let mut events = stream_events;
        events.extend(interrupts.into_iter().map(interrupt_to_event));
        memory.record_events(events);
    }

    /// Orient: read the context slice and determine whether any observed
    /// event blocks this cycle.
    pub fn orient(
        &self,
        memory: &mut ShortTermMemory,
        objective: &str,
        embed: Option<&dyn Fn(&str) -> Vec<f64>>,
    ) -> OrientedState {
        let context = memory.read_context(Some(objective), embed);
        let blocking_event = context.recent_events.iter().find(|e| e.is_blocking);
        OrientedState {
            is_blocked: blocking_event.is_some(),
            block_reason: blocking_event.and_then(|e| e.blocking_reason.clone()),
            objective: objective.to_string(),
            context,
        }
    }

    /// Decide: PARK if blocked; TERMINATE/REPLAN once the DAG has no
    /// frontier left; otherwise CONTINUE toward the next frontier.
    pub fn decide(
        &self,
        cycle_index: u32,
        oriented: &OrientedState,
        dag: &ExecutableDag,
        objective_satisfied: bool,
        replan_budget_remaining: u32,
    ) -> Decision {
        if oriented.is_blocked {
            return Decision {
                cycle_index,
                action: DecisionAction::Park,
                reasoning: oriented
                    .block_reason
                    .clone()
                    .unwrap_or_else(|| "blocked by an unlabeled event".to_string()),
                target_nodes: Vec::new(),
            };
        }

        if dag.nodes.is_empty() || dag.state.all_terminal() {
            return if objective_satisfied {
                Decision {
                    cycle_index,
                    action: DecisionAction::Terminate,
                    reasoning: "objective satisfied by current outputs".to_string(),
                    target_nodes: Vec::new(),
                }
            } else if replan_budget_remaining > 0 {
                Decision {
                    cycle_index,
                    action: DecisionAction::Replan,
                    reasoning: "objective unmet, replan budget remains".to_string(),
                    target_nodes: Vec::new(),
                }
            } else {
                Decision {
                    cycle_index,
                    action: DecisionAction::Terminate,
                    reasoning: "objective unmet but replan budget exhausted".to_string(),
                    target_nodes: Vec::new(),
                }
            };
        }

        let frontier = dag.frontier();
        Decision {
            cycle_index,
            action: DecisionAction::Continue,
            reasoning: format!("advancing {} frontier node(s)", frontier.len()),
            target_nodes: frontier.into_iter().map(|n| n.id.clone()).collect(),
        }
    }

    /// Act: dispatch every target node concurrently (§5 "parallel group"
    /// guarantee — completion order within the group is unobservable) and
    /// transition DAG state from the outcomes.
    pub async fn act(
        &self,
        dag: &mut ExecutableDag,
        targets: &[String],
        executor: &dyn NodeExecutor,
        context: &ContextSlice,
    ) -> Vec<ActionResult> {
        for id in targets {
            dag.state.transition(id, NodeStatus::Running);
        }

        let futures = targets.iter().filter_map(|id| {
            dag.nodes
                .iter()
                .find(|n| &n.id == id)
                .map(|node| executor.execute(node, context))
        });
        let outcomes = join_all(futures).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (id, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(result) => {
                    if !result.is_async() {
                        dag.state.transition(id, NodeStatus::Completed);
                    }
                    results.push(result);
                }
                Err(_) => {
                    dag.state.transition(id, NodeStatus::Failed);
                    results.push(ActionResult {
                        node_id: id.clone(),
                        output: None,
                        async_job_id: None,
                    });
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::types::{DagEdge, EdgeKind};

    struct EchoExecutor;

    #[async_trait]
    impl NodeExecutor for EchoExecutor {
        async fn execute(&self, node: &DagNode, _context: &ContextSlice) -> Result<ActionResult> {
            Ok(ActionResult::completed(&node.id, format!("did: {}", node.instruction)))
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl NodeExecutor for FailingExecutor {
        async fn execute(&self, node: &DagNode, _context: &ContextSlice) -> Result<ActionResult> {
            Err(crate::error::Error::processing("executor", format!("{} failed", node.id)))
        }
    }

    fn one_node_dag() -> ExecutableDag {
        ExecutableDag::new(
            vec![DagNode { id: "n1".into(), instruction: "answer".into(), parallel_group: None }],
            vec![],
        )
    }

    #[test]
    fn blocking_event_parks_the_cycle() {
        let mut memory = ShortTermMemory::new(10, 60, 10);
        memory.record_events([Event::blocking("permission_denied", "tool not allowed")]);
        let driver = OodaCycleDriver::new();
        let oriented = driver.orient(&mut memory, "answer the question", None);
        assert!(oriented.is_blocked);
        let decision = driver.decide(0, &oriented, &one_node_dag(), false, 1);
        assert_eq!(decision.action, DecisionAction::Park);
    }

    #[test]
    fn terminal_dag_with_satisfied_objective_terminates() {
        let mut memory = ShortTermMemory::new(10, 60, 10);
        let driver = OodaCycleDriver::new();
        let oriented = driver.orient(&mut memory, "answer", None);
        let mut dag = one_node_dag();
        dag.state.transition("n1", NodeStatus::Running);
        dag.state.transition("n1", NodeStatus::Completed);
        let decision = driver.decide(1, &oriented, &dag, true, 1);
        assert_eq!(decision.action, DecisionAction::Terminate);
    }

    #[test]
    fn terminal_dag_with_unmet_objective_and_budget_replans() {
        let mut memory = ShortTermMemory::new(10, 60, 10);
        let driver = OodaCycleDriver::new();
        let oriented = driver.orient(&mut memory, "answer", None);
        let mut dag = one_node_dag();
        dag.state.transition("n1", NodeStatus::Running);
        dag.state.transition("n1", NodeStatus::Completed);
        let decision = driver.decide(1, &oriented, &dag, false, 1);
        assert_eq!(decision.action, DecisionAction::Replan);
    }

    #[test]
    fn frontier_respects_sequential_edges_when_deciding_targets() {
        let mut memory = ShortTermMemory::new(10, 60, 10);
        let driver = OodaCycleDriver::new();
        let oriented = driver.orient(&mut memory, "answer", None);
        let dag = ExecutableDag::new(
            vec![
                DagNode { id: "a".into(), instruction: "do a".into(), parallel_group: None },
                DagNode { id: "b".into(), instruction: "do b".into(), parallel_group: None },
            ],
            vec![DagEdge { from: "a".into(), to: "b".into(), kind: EdgeKind::Sequential }],
        );
        let decision = driver.decide(0, &oriented, &dag, false, 1);
        assert_eq!(decision.action, DecisionAction::Continue);
        assert_eq!(decision.target_nodes, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn act_dispatches_targets_and_completes_nodes() {
        let driver = OodaCycleDriver::new();
        let mut dag = one_node_dag();
        let context = ContextSlice {
            recent_events: vec![],
            entities: vec![],
            pending_guidance: vec![],
        };
        let results = driver.act(&mut dag, &["n1".to_string()], &EchoExecutor, &context).await;
        assert_eq!(results.len(), 1);
        assert_eq!(dag.state.get("n1"), NodeStatus::Completed);
    }

    #[tokio::test]
    async fn act_marks_failed_executor_outcome_as_failed() {
        let driver = OodaCycleDriver::new();
        let mut dag = one_node_dag();
        let context = ContextSlice {
            recent_events: vec![],
            entities: vec![],
            pending_guidance: vec![],
        };
        driver.act(&mut dag, &["n1".to_string()], &FailingExecutor, &context).await;
        assert_eq!(dag.state.get("n1"), NodeStatus::Failed);
    }
}
