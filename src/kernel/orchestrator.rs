//! Apex Orchestrator (§4.1): the single entry point. Runs Gate-In ->
//! Execute -> Gate-Out and owns the controlled cycle loop.
//!
//! A single `process`-style method delegating to named phase functions,
//! with decision-history bookkeeping carried across cycles the same way a
//! step-driver accumulates its own history, retargeted from an RLM
//! recursion loop to the three-phase pipeline this kernel implements.

use crate::collaborators::Collaborators;
use crate::config::KernelConfig;
use crate::error::Error;
use crate::kernel::activation::ActivationRouter;
use crate::kernel::calibration::ConfidenceCalibrator;
use crate::kernel::hallucination::HallucinationMonitor;
use crate::kernel::lifecycle::{SpawnRequest, TraceLifecycle};
use crate::kernel::load::{self, CognitiveLoadMonitor, CycleInputs, LoadAction};
use crate::kernel::memory::ShortTermMemory;
use crate::kernel::noise_gate::{ContradictionReport, GateVerdict, NoiseGate, RequiredOutputs, RetryBudget};
use crate::kernel::ooda::{NodeExecutor, OodaCycleDriver};
use crate::kernel::perception::{self, modality::RawInput};
use crate::kernel::planning;
use crate::kernel::types::{
    CalibratedConfidence, ComplexityLevel, CycleTelemetry, Decision, DecisionAction, FilteredOutput,
    GroundingReport, Origin, RejectedOutput,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Coarse processing tier chosen from complexity in Gate-In (§4.1 step 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    Fast,
    Standard,
    Deep,
}

fn mode_for(complexity: ComplexityLevel) -> ProcessingMode {
    match complexity {
        ComplexityLevel::Trivial | ComplexityLevel::Simple => ProcessingMode::Fast,
        ComplexityLevel::Moderate => ProcessingMode::Standard,
        ComplexityLevel::Complex | ComplexityLevel::Critical => ProcessingMode::Deep,
    }
}

/// Where a trace ended up. `process()` always returns a result in one of
/// these phases; no phase propagates an exception past the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverPhase {
    GateIn,
    Execute,
    GateOut,
    Escalated,
    Aborted,
}

/// The full result of one `process()` call (§4.1 Contract).
#[derive(Debug, Clone)]
pub struct ObserverResult {
    pub mode: ProcessingMode,
    pub final_phase: ObserverPhase,
    pub total_cycles: u32,
    pub total_duration_ms: u64,
    pub filtered_output: Option<FilteredOutput>,
    pub grounding_report: Option<GroundingReport>,
    pub calibrated_confidence: Option<CalibratedConfidence>,
    pub partial_output: Option<String>,
    pub rejected_output: Option<RejectedOutput>,
    pub termination_reason: String,
    /// Component failure diagnostics (§7 propagation policy): never causes
    /// `process()` to panic or return `Err`, only annotates the result.
    pub diagnostics: Vec<String>,
}

impl ObserverResult {
    fn escalated(mode: ProcessingMode, reason: impl Into<String>, diagnostics: Vec<String>) -> Self {
        Self {
            mode,
            final_phase: ObserverPhase::Escalated,
            total_cycles: 0,
            total_duration_ms: 0,
            filtered_output: None,
            grounding_report: None,
            calibrated_confidence: None,
            partial_output: None,
            rejected_output: None,
            termination_reason: reason.into(),
            diagnostics,
        }
    }
}

/// A node executor that always synthesizes output via the configured
/// inference kit. Good enough as the default dispatch strategy: a node's
/// `instruction` field is handed to `InferenceKit::complete` verbatim.
struct InferenceNodeExecutor {
    inference: Arc<dyn crate::collaborators::InferenceKit>,
}

#[async_trait::async_trait]
impl NodeExecutor for InferenceNodeExecutor {
    async fn execute(
        &self,
        node: &crate::kernel::types::DagNode,
        context: &crate::kernel::memory::ContextSlice,
    ) -> crate::error::Result<crate::kernel::ooda::ActionResult> {
        let history: Vec<String> = context
            .recent_events
            .iter()
            .map(|e| format!("{}: {}", e.kind, e.payload))
            .collect();
        let output = self.inference.complete(&node.instruction, &history).await?;
        Ok(crate::kernel::ooda::ActionResult::completed(&node.id, output))
    }
}

/// The maximum module count across every pipeline template (§4.2's CRITICAL
/// template), used as the Cognitive Load Monitor's breadth-load denominator.
const MAX_MODULES_IN_ANY_PIPELINE: usize = 7;

/// A bounded number of REPLAN re-entries per trace, distinct from the
/// Gate-Out retry budget: this guards against an objective that can never
/// be satisfied by the current plan rather than against quality rejection.
const DEFAULT_REPLAN_BUDGET: u32 = 3;

pub struct ApexOrchestrator {
    config: KernelConfig,
    activation: ActivationRouter,
    load_monitor: CognitiveLoadMonitor,
    hallucination: HallucinationMonitor,
    calibrator: ConfidenceCalibrator,
    noise_gate: NoiseGate,
    ooda: OodaCycleDriver,
    collaborators: Collaborators,
}

impl ApexOrchestrator {
    pub fn new(config: KernelConfig, collaborators: Collaborators) -> Self {
        Self {
            activation: ActivationRouter::new(&config),
            load_monitor: CognitiveLoadMonitor::new(),
            hallucination: HallucinationMonitor::new(config.grounded_threshold, config.fabricated_threshold),
            calibrator: ConfidenceCalibrator::new(config.calibration_ema_decay, config.overconfidence_threshold),
            noise_gate: NoiseGate::new(),
            ooda: OodaCycleDriver::new(),
            config,
            collaborators,
        }
    }

    /// The single entry point (§4.1 Contract): Gate-In -> Execute -> Gate-Out.
    pub async fn process(
        &self,
        raw_input: RawInput,
        spawn: SpawnRequest,
        evidence: Vec<Origin>,
    ) -> ObserverResult {
        let started = Instant::now();
        let mut diagnostics = Vec::new();

        let mut lifecycle = TraceLifecycle::begin(
            &spawn,
            &self.config,
            Duration::from_millis(
                self.config.gate_in_timeout_ms + self.config.execute_cycle_timeout_ms * 16 + self.config.gate_out_timeout_ms,
            ),
            1.0,
        );

        // --- Gate-In ---
        let perception = perception::perceive(
            &raw_input,
            chrono::Utc::now(),
            spawn.required_skills.clone(),
            spawn.required_tools.clone(),
            None,
        );
        let mut tags = perception.tags;

        if let Err(err) = crate::kernel::lifecycle::enforce_tool_policy(&tags, &lifecycle.identity) {
            return ObserverResult::escalated(
                ProcessingMode::Fast,
                err.to_string(),
                vec![err.to_string()],
            );
        }

        let assessment = crate::kernel::lifecycle::assess_capability(&tags, &lifecycle.identity);
        if assessment.should_escalate() {
            let reason = format!(
                "capability gap severity {:.2} exceeds escalation threshold",
                assessment.gap.as_ref().map(|g| g.severity).unwrap_or(1.0)
            );
            diagnostics.push(reason.clone());
            return ObserverResult::escalated(ProcessingMode::Fast, reason, diagnostics);
        }

        let (complexity, activation_map) = self.activation.route(
            &tags,
            assessment.gap.as_ref(),
            &lifecycle.identity.config.tools_allowed,
            0.0,
            &self.config,
        );
        tags.complexity_band = complexity;
        let mode = mode_for(complexity);
        let mut pipeline = crate::kernel::activation::select_pipeline(complexity, 0.0, &self.config);
        let mut activation_map = activation_map;

        // --- Execute ---
        let mut dag = planning::build_initial_dag(&spawn.objective, &tags);
        let mut memory = ShortTermMemory::new(
            self.config.event_buffer_capacity,
            self.config.entity_ttl_seconds,
            self.config.entity_cache_max_entries,
        );
        let mut decision_history: Vec<Decision> = Vec::new();
        let mut recent_outputs: Vec<String> = Vec::new();
        let mut candidate_output: Option<String> = None;
        let mut cumulative_tokens: u64 = 0;
        let mut cycles_used: u32 = 0;
        let mut replan_budget_remaining = DEFAULT_REPLAN_BUDGET;
        let mut pressure = 0.0_f64;
        let mut termination_reason = String::new();
        let mut final_phase = ObserverPhase::Execute;

        let executor = InferenceNodeExecutor {
            inference: self.collaborators.inference.clone(),
        };

        'execute: for cycle in 0..pipeline.max_cycles {
            cycles_used = cycle + 1;
            let cycle_started = Instant::now();

            let stream_events = self.collaborators.events.poll(32).await.unwrap_or_else(|err| {
                diagnostics.push(format!("event stream poll failed: {err}"));
                Vec::new()
            });
            let interrupts = lifecycle.interrupts.drain();

            if interrupts.iter().any(|i| i.is_cancellation()) {
                termination_reason = "CANCELLED".to_string();
                final_phase = ObserverPhase::Aborted;
                break 'execute;
            }

            self.ooda.observe(&mut memory, stream_events, interrupts);
            let oriented = self.ooda.orient(&mut memory, &spawn.objective, None);
            let objective_satisfied = candidate_output.is_some();
            let decision = self.ooda.decide(cycle, &oriented, &dag, objective_satisfied, replan_budget_remaining);

            match decision.action {
                DecisionAction::Park => {
                    decision_history.push(decision.clone());
                    termination_reason = decision.reasoning.clone();
                    final_phase = ObserverPhase::Execute;
                    break 'execute;
                }
                DecisionAction::Terminate => {
                    decision_history.push(decision.clone());
                    termination_reason = decision.reasoning.clone();
                    break 'execute;
                }
                DecisionAction::Replan => {
                    dag = planning::replan(&dag, &spawn.objective, &tags);
                    replan_budget_remaining = replan_budget_remaining.saturating_sub(1);
                    decision_history.push(decision.clone());
                    continue 'execute;
                }
                DecisionAction::Continue | DecisionAction::Simplify | DecisionAction::Escalate => {
                    let results = self.ooda.act(&mut dag, &decision.target_nodes, &executor, &oriented.context).await;
                    for result in &results {
                        if let Some(output) = &result.output {
                            cumulative_tokens += (output.len() as u64 / 4).max(1);
                            recent_outputs.push(output.clone());
                            candidate_output = Some(output.clone());
                            memory.record_events([crate::kernel::memory::Event::new("tool_result", output.clone())]);
                        }
                    }
                    decision_history.push(decision.clone());
                }
            }

            if decision_history.len() > self.config.decision_history_window {
                let overflow = decision_history.len() - self.config.decision_history_window;
                decision_history.drain(0..overflow);
            }

            if dag.state.all_terminal() && candidate_output.is_some() {
                termination_reason = "objective satisfied by current outputs".to_string();
                break 'execute;
            }

            let wall_time_ms = cycle_started.elapsed().as_millis() as u64;
            let active_module_count = activation_map
                .modules
                .values()
                .filter(|m| **m == crate::kernel::types::ModuleActivation::Active)
                .count();
            let telemetry = CycleTelemetry {
                cycle_index: cycle,
                tokens_consumed: cumulative_tokens,
                wall_time_ms,
                expected_wall_time_ms: self.config.execute_cycle_timeout_ms / 10,
                active_module_count,
            };

            let drift = load::drift::detect_drift(&spawn.objective, &recent_outputs, None, self.config.goal_drift_threshold);
            let inputs = CycleInputs {
                telemetry,
                total_token_budget: pipeline.token_budget,
                max_modules_in_pipeline: MAX_MODULES_IN_ANY_PIPELINE,
                decision_history: &decision_history,
                energy_exhausted: lifecycle.energy.energy_exhausted(),
            };
            let verdict = self.load_monitor.recommend(&inputs, Some(drift), &self.config);

            match verdict.action {
                LoadAction::Continue => {}
                LoadAction::Simplify => {
                    pressure = verdict.load.aggregate;
                    pipeline = crate::kernel::activation::select_pipeline(complexity, pressure, &self.config);
                    activation_map = crate::kernel::activation::apply_tool_availability(
                        &pipeline,
                        &lifecycle.identity.config.tools_allowed,
                        &tags.required_tools,
                    );
                    info!(pressure, "cognitive load monitor recommended SIMPLIFY");
                }
                LoadAction::Escalate => {
                    termination_reason = "cognitive load monitor recommended ESCALATE".to_string();
                    final_phase = ObserverPhase::Escalated;
                    break 'execute;
                }
                LoadAction::Abort => {
                    termination_reason = "cognitive load monitor recommended ABORT".to_string();
                    final_phase = ObserverPhase::Aborted;
                    break 'execute;
                }
            }
        }

        if final_phase == ObserverPhase::Escalated || final_phase == ObserverPhase::Aborted {
            return ObserverResult {
                mode,
                final_phase,
                total_cycles: cycles_used,
                total_duration_ms: started.elapsed().as_millis() as u64,
                filtered_output: None,
                grounding_report: None,
                calibrated_confidence: None,
                partial_output: candidate_output,
                rejected_output: None,
                termination_reason,
                diagnostics,
            };
        }

        let Some(output) = candidate_output else {
            return ObserverResult {
                mode,
                final_phase: ObserverPhase::Execute,
                total_cycles: cycles_used,
                total_duration_ms: started.elapsed().as_millis() as u64,
                filtered_output: None,
                grounding_report: None,
                calibrated_confidence: None,
                partial_output: None,
                rejected_output: None,
                termination_reason: if termination_reason.is_empty() {
                    "execute phase produced no output".to_string()
                } else {
                    termination_reason
                },
                diagnostics,
            };
        };

        // --- Gate-Out ---
        let mut retry_budget = RetryBudget::new(self.config.retry_budget);
        let mut gate_out_content = output;

        loop {
            let grounding = self.hallucination.analyze(&gate_out_content, &evidence, None);
            let stated_confidence = crate::kernel::hallucination::estimate_stated_confidence(&gate_out_content);
            let calibrated = self.calibrator.calibrate(&tags.domain, stated_confidence, grounding.grounding_score);
            let contradictions = ContradictionReport {
                contradictions: self.hallucination.find_contradictions(&gate_out_content),
            };
            let required_outputs = RequiredOutputs {
                items: lifecycle.identity.config.required_outputs.clone(),
            };

            let verdict = self.noise_gate.apply(
                &gate_out_content,
                cycles_used,
                &grounding,
                &calibrated,
                &lifecycle.identity.config.quality_bar,
                &contradictions,
                &required_outputs,
                &mut retry_budget,
            );

            match verdict {
                GateVerdict::Passed(filtered) => {
                    return ObserverResult {
                        mode,
                        final_phase: ObserverPhase::GateOut,
                        total_cycles: cycles_used,
                        total_duration_ms: started.elapsed().as_millis() as u64,
                        filtered_output: Some(filtered),
                        grounding_report: Some(grounding),
                        calibrated_confidence: Some(calibrated),
                        partial_output: None,
                        rejected_output: None,
                        termination_reason: "passed quality gate".to_string(),
                        diagnostics,
                    };
                }
                GateVerdict::Rejected(rejected) => {
                    if let Some(guidance) = rejected.retry_guidance.clone() {
                        memory.push_guidance(guidance);
                        warn!(cycles_used, "gate-out rejected output, re-entering execute with guidance");
                        match self
                            .collaborators
                            .inference
                            .complete(&spawn.objective, &memory.read_context(None, None).pending_guidance)
                            .await
                        {
                            Ok(revised) => {
                                gate_out_content = revised;
                                continue;
                            }
                            Err(err) => {
                                diagnostics.push(format!("retry completion failed: {err}"));
                                return ObserverResult {
                                    mode,
                                    final_phase: ObserverPhase::GateOut,
                                    total_cycles: cycles_used,
                                    total_duration_ms: started.elapsed().as_millis() as u64,
                                    filtered_output: None,
                                    grounding_report: Some(grounding),
                                    calibrated_confidence: Some(calibrated),
                                    partial_output: Some(gate_out_content),
                                    rejected_output: Some(rejected),
                                    termination_reason: "retry completion failed".to_string(),
                                    diagnostics,
                                };
                            }
                        }
                    }

                    return ObserverResult {
                        mode,
                        final_phase: ObserverPhase::GateOut,
                        total_cycles: cycles_used,
                        total_duration_ms: started.elapsed().as_millis() as u64,
                        filtered_output: None,
                        grounding_report: Some(grounding),
                        calibrated_confidence: Some(calibrated),
                        partial_output: None,
                        rejected_output: Some(rejected),
                        termination_reason: "retry budget exhausted".to_string(),
                        diagnostics,
                    };
                }
            }
        }
    }
}

impl From<Error> for ObserverResult {
    /// Any error that escapes a component boundary and reaches the
    /// orchestrator maps to ESCALATED with a diagnostic (§7 propagation
    /// policy): the orchestrator is the only place an `Error` is converted
    /// back into user-visible state rather than propagated with `?`.
    fn from(err: Error) -> Self {
        ObserverResult::escalated(ProcessingMode::Fast, err.to_string(), vec![err.to_string()])
    }
}
