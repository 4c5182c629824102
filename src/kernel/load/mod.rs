//! Cognitive Load Monitor (§4.3): between cycles, measures load and detects
//! runaway behavior, recommending a graduated response.

pub mod drift;
pub mod loop_detect;
pub mod oscillation;

use crate::config::KernelConfig;
use crate::kernel::types::{CognitiveLoad, CycleTelemetry, Decision};
use loop_detect::LoopResult;
use oscillation::OscillationResult;

/// Graduated response (§4.3 recommendation table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    Continue,
    Simplify,
    Escalate,
    Abort,
}

#[derive(Debug, Clone, Copy)]
pub struct CycleInputs<'a> {
    pub telemetry: CycleTelemetry,
    pub total_token_budget: u64,
    pub max_modules_in_pipeline: usize,
    pub decision_history: &'a [Decision],
    pub energy_exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct LoadVerdict {
    pub load: CognitiveLoad,
    pub loop_result: LoopResult,
    pub oscillation: OscillationResult,
    pub stalled: bool,
    pub action: LoadAction,
}

/// Compute the three load scalars and their weighted aggregate (§4.3 Measurements).
pub fn measure(inputs: &CycleInputs, cfg: &KernelConfig) -> CognitiveLoad {
    let compute_load = if inputs.total_token_budget == 0 {
        0.0
    } else {
        (inputs.telemetry.tokens_consumed as f64 / inputs.total_token_budget as f64).min(1.0)
    };
    let time_load = if inputs.telemetry.expected_wall_time_ms == 0 {
        0.0
    } else {
        (inputs.telemetry.wall_time_ms as f64 / inputs.telemetry.expected_wall_time_ms as f64).min(2.0)
    };
    let breadth_load = if inputs.max_modules_in_pipeline == 0 {
        0.0
    } else {
        (inputs.telemetry.active_module_count as f64 / inputs.max_modules_in_pipeline as f64).min(1.0)
    };

    let aggregate = cfg.load_compute_weight * compute_load.min(1.0)
        + cfg.load_time_weight * time_load.min(1.0)
        + cfg.load_breadth_weight * breadth_load.min(1.0);

    CognitiveLoad {
        compute_load,
        time_load,
        breadth_load,
        aggregate: aggregate.clamp(0.0, 1.0),
    }
}

/// `true` when `cycle_duration > 2 x expected_duration` (§4.3 Stall).
pub fn is_stalled(telemetry: &CycleTelemetry) -> bool {
    telemetry.expected_wall_time_ms > 0
        && telemetry.wall_time_ms > 2 * telemetry.expected_wall_time_ms
}

/// The Cognitive Load Monitor. Stateless aside from config; all inputs for a
/// single verdict are passed in per cycle (§4.1 step 3).
pub struct CognitiveLoadMonitor;

impl CognitiveLoadMonitor {
    pub fn new() -> Self {
        Self
    }

    /// Produce one verdict for the current cycle. Never fails the cycle: a
    /// detector that cannot run treats its condition as absent (§4.3 Failure
    /// semantics) rather than propagating an error.
    pub fn recommend(
        &self,
        inputs: &CycleInputs,
        drift: Option<drift::DriftResult>,
        cfg: &KernelConfig,
    ) -> LoadVerdict {
        let load = measure(inputs, cfg);
        let stalled = is_stalled(&inputs.telemetry);
        let loop_result = loop_detect::detect_loop(
            inputs.decision_history,
            cfg.loop_window,
            cfg.loop_repeat_threshold,
        );
        let oscillation = oscillation::detect_oscillation(inputs.decision_history);

        let high_magnitude_drift = drift.map(|d| d.drift > 0.5).unwrap_or(false);

        let action = if load.aggregate > 0.95 || inputs.energy_exhausted {
            LoadAction::Abort
        } else if loop_result.is_looping || oscillation.is_oscillating || high_magnitude_drift {
            LoadAction::Escalate
        } else if stalled || load.aggregate > 0.8 {
            LoadAction::Simplify
        } else {
            LoadAction::Continue
        };

        LoadVerdict {
            load,
            loop_result,
            oscillation,
            stalled,
            action,
        }
    }
}

impl Default for CognitiveLoadMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::types::{Decision, DecisionAction};

    fn telemetry(tokens: u64, wall_ms: u64, expected_ms: u64, modules: usize) -> CycleTelemetry {
        CycleTelemetry {
            cycle_index: 0,
            tokens_consumed: tokens,
            wall_time_ms: wall_ms,
            expected_wall_time_ms: expected_ms,
            active_module_count: modules,
        }
    }

    #[test]
    fn high_aggregate_load_aborts() {
        let cfg = KernelConfig::default();
        let inputs = CycleInputs {
            telemetry: telemetry(99_000, 1000, 1000, 4),
            total_token_budget: 100_000,
            max_modules_in_pipeline: 4,
            decision_history: &[],
            energy_exhausted: false,
        };
        let monitor = CognitiveLoadMonitor::new();
        let verdict = monitor.recommend(&inputs, None, &cfg);
        assert_eq!(verdict.action, LoadAction::Abort);
    }

    #[test]
    fn stall_recommends_simplify() {
        let cfg = KernelConfig::default();
        let inputs = CycleInputs {
            telemetry: telemetry(1000, 5000, 1000, 2),
            total_token_budget: 100_000,
            max_modules_in_pipeline: 4,
            decision_history: &[],
            energy_exhausted: false,
        };
        let monitor = CognitiveLoadMonitor::new();
        let verdict = monitor.recommend(&inputs, None, &cfg);
        assert!(verdict.stalled);
        assert_eq!(verdict.action, LoadAction::Simplify);
    }

    #[test]
    fn loop_confirmed_escalates() {
        let cfg = KernelConfig::default();
        let history = vec![
            Decision { cycle_index: 0, action: DecisionAction::Continue, reasoning: "same".into(), target_nodes: vec![] },
            Decision { cycle_index: 1, action: DecisionAction::Continue, reasoning: "same".into(), target_nodes: vec![] },
            Decision { cycle_index: 2, action: DecisionAction::Continue, reasoning: "same".into(), target_nodes: vec![] },
        ];
        let inputs = CycleInputs {
            telemetry: telemetry(1000, 500, 1000, 2),
            total_token_budget: 100_000,
            max_modules_in_pipeline: 4,
            decision_history: &history,
            energy_exhausted: false,
        };
        let monitor = CognitiveLoadMonitor::new();
        let verdict = monitor.recommend(&inputs, None, &cfg);
        assert!(verdict.loop_result.is_looping);
        assert_eq!(verdict.loop_result.loop_length, 1);
        assert_eq!(verdict.action, LoadAction::Escalate);
    }

    #[test]
    fn nominal_cycle_continues() {
        let cfg = KernelConfig::default();
        let inputs = CycleInputs {
            telemetry: telemetry(1000, 500, 1000, 2),
            total_token_budget: 100_000,
            max_modules_in_pipeline: 4,
            decision_history: &[],
            energy_exhausted: false,
        };
        let monitor = CognitiveLoadMonitor::new();
        let verdict = monitor.recommend(&inputs, None, &cfg);
        assert_eq!(verdict.action, LoadAction::Continue);
    }
}
