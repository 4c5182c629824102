//! Loop-detection integration test (spec.md §8 scenario 3): when Act keeps
//! producing the same decision cycle after cycle, the Cognitive Load
//! Monitor must recommend ESCALATE within a handful of cycles — exercised
//! here by feeding the OODA driver's own decisions into the load monitor,
//! the same way the orchestrator's Execute loop does each cycle.

use cognitive_kernel::kernel::load::{CognitiveLoadMonitor, CycleInputs, LoadAction};
use cognitive_kernel::kernel::ooda::OodaCycleDriver;
use cognitive_kernel::kernel::types::{CycleTelemetry, DagEdge, DagNode, ExecutableDag};
use cognitive_kernel::{Decision, KernelConfig};

fn telemetry(cycle: u32, modules: usize) -> CycleTelemetry {
    CycleTelemetry {
        cycle_index: cycle,
        tokens_consumed: 100 * (cycle as u64 + 1),
        wall_time_ms: 100,
        expected_wall_time_ms: 1000,
        active_module_count: modules,
    }
}

#[test]
fn repeated_continue_decisions_trip_escalate_within_three_cycles() {
    let cfg = KernelConfig::default();
    let driver = OodaCycleDriver::new();
    let monitor = CognitiveLoadMonitor::new();

    // A DAG whose frontier never advances: a single node that Act's outcome
    // never marks terminal (the fixture driving `decide` below never
    // transitions it), so `decide` keeps emitting CONTINUE on the same node.
    let dag = ExecutableDag::new(
        vec![DagNode {
            id: "n1".into(),
            instruction: "answer".into(),
            parallel_group: None,
        }],
        Vec::<DagEdge>::new(),
    );

    let mut history: Vec<Decision> = Vec::new();
    let mut escalated_at = None;

    for cycle in 0..3u32 {
        let decision = driver.decide(cycle, &default_oriented(), &dag, false, 3);
        history.push(decision);

        let inputs = CycleInputs {
            telemetry: telemetry(cycle, 2),
            total_token_budget: 100_000,
            max_modules_in_pipeline: 7,
            decision_history: &history,
            energy_exhausted: false,
        };
        let verdict = monitor.recommend(&inputs, None, &cfg);
        if verdict.action == LoadAction::Escalate {
            assert!(verdict.loop_result.is_looping);
            assert_eq!(verdict.loop_result.loop_length, 1);
            escalated_at = Some(cycle);
            break;
        }
    }

    assert!(escalated_at.is_some(), "expected ESCALATE within 3 cycles of identical decisions");
}

fn default_oriented() -> cognitive_kernel::kernel::ooda::OrientedState {
    cognitive_kernel::kernel::ooda::OrientedState {
        context: cognitive_kernel::kernel::memory::ContextSlice {
            recent_events: vec![],
            entities: vec![],
            pending_guidance: vec![],
        },
        objective: "answer".to_string(),
        is_blocked: false,
        block_reason: None,
    }
}
