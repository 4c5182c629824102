//! Shared data model for the cognitive kernel (§3).
//!
//! These are the entities every component reads or writes; they are
//! described here by meaning and invariant rather than grouped by which
//! component happens to produce them, since several (e.g. `Decision`,
//! `ExecutableDAG`) are written by one component and read by several others.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Strictly ordered complexity band, used for downgrade arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplexityLevel {
    Trivial,
    Simple,
    Moderate,
    Complex,
    Critical,
}

impl ComplexityLevel {
    const ORDER: [ComplexityLevel; 5] = [
        ComplexityLevel::Trivial,
        ComplexityLevel::Simple,
        ComplexityLevel::Moderate,
        ComplexityLevel::Complex,
        ComplexityLevel::Critical,
    ];

    /// Downgrade by `steps` levels, clamped at `Trivial`.
    pub fn downgrade(self, steps: usize) -> Self {
        let idx = Self::ORDER.iter().position(|l| *l == self).unwrap_or(0);
        Self::ORDER[idx.saturating_sub(steps)]
    }
}

/// Urgency band carried on `SignalTags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyBand {
    Low,
    Normal,
    High,
    Critical,
}

/// The perception summary of an input, produced once in Gate-In.
///
/// Immutable once produced (data-model invariant 7): retry guidance from a
/// rejected Gate-Out pass is never written back here; it is appended to
/// working memory instead (see Open Question resolution 1 in `DESIGN.md`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTags {
    pub domain: String,
    pub urgency_band: UrgencyBand,
    pub complexity_band: ComplexityLevel,
    pub primary_intent: String,
    pub required_skills: HashSet<String>,
    pub required_tools: HashSet<String>,
    pub content_keywords: Vec<String>,
}

impl Default for SignalTags {
    fn default() -> Self {
        Self {
            domain: "general".to_string(),
            urgency_band: UrgencyBand::Normal,
            complexity_band: ComplexityLevel::Simple,
            primary_intent: String::new(),
            required_skills: HashSet::new(),
            required_tools: HashSet::new(),
            content_keywords: Vec::new(),
        }
    }
}

/// The capability gap payload, re-exported from `error` since it is also
/// the payload of a `CapabilityError`.
pub use crate::error::CapabilityGap;

/// Whether the current identity can handle the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityAssessment {
    pub confidence: f64,
    pub gap: Option<CapabilityGap>,
}

impl CapabilityAssessment {
    pub fn capable(confidence: f64) -> Self {
        Self {
            confidence: confidence.clamp(0.0, 1.0),
            gap: None,
        }
    }

    pub fn with_gap(gap: CapabilityGap) -> Self {
        Self {
            confidence: 1.0 - gap.severity,
            gap: Some(gap),
        }
    }

    /// §4.1 step 4: short-circuit condition.
    pub fn should_escalate(&self) -> bool {
        match &self.gap {
            Some(gap) => gap.severity >= 0.8 || !gap.constraint_violations.is_empty(),
            None => false,
        }
    }
}

/// Whether a module is active, gated (dormant but revivable), or disabled
/// for the current pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleActivation {
    Active,
    Gated,
    Disabled,
}

/// The chosen pipeline's state, produced in Gate-In and read-only during Execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationMap {
    pub modules: HashMap<String, ModuleActivation>,
    pub required_tools: HashSet<String>,
}

impl ActivationMap {
    pub fn is_active(&self, module: &str) -> bool {
        matches!(self.modules.get(module), Some(ModuleActivation::Active))
    }
}

/// For a given complexity, which modules run and at what budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub complexity: ComplexityLevel,
    pub active_modules: Vec<String>,
    pub gated_modules: Vec<String>,
    pub max_cycles: u32,
    pub token_budget: u64,
}

/// Per-cycle measurements, one per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleTelemetry {
    pub cycle_index: u32,
    pub tokens_consumed: u64,
    pub wall_time_ms: u64,
    pub expected_wall_time_ms: u64,
    pub active_module_count: usize,
}

/// Compute/time/breadth load scalars plus a weighted aggregate (all in [0,1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveLoad {
    pub compute_load: f64,
    pub time_load: f64,
    pub breadth_load: f64,
    pub aggregate: f64,
}

/// One OODA verdict per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionAction {
    Continue,
    Replan,
    Park,
    Terminate,
    Escalate,
    Simplify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub cycle_index: u32,
    pub action: DecisionAction,
    pub reasoning: String,
    pub target_nodes: Vec<String>,
}

/// Per-node status in the executable graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Dependency kind between two DAG nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Sequential,
    Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagNode {
    pub id: String,
    pub instruction: String,
    pub parallel_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DagEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Mutable per-node status tracking for one `ExecutableDAG`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagState {
    pub status: HashMap<String, NodeStatus>,
}

impl DagState {
    pub fn set(&mut self, node: &str, status: NodeStatus) {
        self.status.insert(node.to_string(), status);
    }

    pub fn get(&self, node: &str) -> NodeStatus {
        self.status.get(node).copied().unwrap_or(NodeStatus::Pending)
    }

    /// §3 invariant 3: PENDING → RUNNING → (COMPLETED | FAILED); no backward
    /// transition without a REPLAN rebuilding the graph.
    pub fn transition(&mut self, node: &str, next: NodeStatus) -> bool {
        let current = self.get(node);
        let allowed = matches!(
            (current, next),
            (NodeStatus::Pending, NodeStatus::Running)
                | (NodeStatus::Running, NodeStatus::Completed)
                | (NodeStatus::Running, NodeStatus::Failed)
        );
        if allowed {
            self.set(node, next);
        }
        allowed
    }

    pub fn counts(&self) -> HashMap<NodeStatus, usize> {
        let mut counts = HashMap::new();
        for status in self.status.values() {
            *counts.entry(*status).or_insert(0) += 1;
        }
        counts
    }

    pub fn completion_percentage(&self) -> f64 {
        if self.status.is_empty() {
            return 0.0;
        }
        let completed = self
            .status
            .values()
            .filter(|s| **s == NodeStatus::Completed)
            .count();
        completed as f64 / self.status.len() as f64
    }

    pub fn all_terminal(&self) -> bool {
        !self.status.is_empty()
            && self
                .status
                .values()
                .all(|s| matches!(s, NodeStatus::Completed | NodeStatus::Failed))
    }
}

/// The current plan. Created once per Gate-In unless REPLAN triggers a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutableDag {
    pub nodes: Vec<DagNode>,
    pub edges: Vec<DagEdge>,
    pub state: DagState,
}

impl ExecutableDag {
    pub fn new(nodes: Vec<DagNode>, edges: Vec<DagEdge>) -> Self {
        let mut state = DagState::default();
        for node in &nodes {
            state.set(&node.id, NodeStatus::Pending);
        }
        Self { nodes, edges, state }
    }

    /// Nodes with no unmet sequential predecessor, grouped by parallel group.
    pub fn frontier(&self) -> Vec<&DagNode> {
        self.nodes
            .iter()
            .filter(|n| self.state.get(&n.id) == NodeStatus::Pending)
            .filter(|n| {
                self.edges
                    .iter()
                    .filter(|e| e.to == n.id && e.kind == EdgeKind::Sequential)
                    .all(|e| self.state.get(&e.from) == NodeStatus::Completed)
            })
            .collect()
    }
}

/// A single evidence record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub content: String,
    pub source_ref: String,
    pub trust_score: f64,
    pub metadata: HashMap<String, String>,
}

/// An atomic assertion extracted from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimCategory {
    Factual,
    Reasoning,
    Opinion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub text: String,
    pub category: ClaimCategory,
    pub span: (usize, usize),
}

impl Claim {
    pub fn new(text: impl Into<String>, category: ClaimCategory, span: (usize, usize)) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            category,
            span,
        }
    }
}

/// Grade assigned per claim based on similarity to evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimGrade {
    Grounded,
    Inferred,
    Fabricated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedClaim {
    pub claim: Claim,
    pub grade: ClaimGrade,
    pub similarity: f64,
    pub depends_on: Vec<String>,
}

/// Aggregate over claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingReport {
    pub graded: Vec<GradedClaim>,
    pub grounded_count: usize,
    pub inferred_count: usize,
    pub fabricated_count: usize,
    pub grounding_score: f64,
}

impl GroundingReport {
    pub fn total_claims(&self) -> usize {
        self.grounded_count + self.inferred_count + self.fabricated_count
    }
}

/// A piecewise map from stated-confidence bin to observed-accuracy, keyed by domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCurve {
    pub domain: String,
    /// Bin lower bound (0.0, 0.1, .. 0.9) -> observed accuracy.
    pub bins: HashMap<u8, f64>,
    pub sample_counts: HashMap<u8, u32>,
    pub last_updated: chrono::DateTime<chrono::Utc>,
}

impl CalibrationCurve {
    /// Bin key for a stated confidence in [0,1]: floor to the nearest tenth, 0-9.
    pub fn bin_key(stated: f64) -> u8 {
        ((stated.clamp(0.0, 0.999) * 10.0).floor()) as u8
    }

    pub fn identity(domain: impl Into<String>) -> Self {
        let mut bins = HashMap::new();
        for b in 0..10u8 {
            bins.insert(b, (b as f64 + 0.5) / 10.0);
        }
        Self {
            domain: domain.into(),
            bins,
            sample_counts: HashMap::new(),
            last_updated: chrono::Utc::now(),
        }
    }

    pub fn map(&self, stated: f64) -> f64 {
        let key = Self::bin_key(stated);
        self.bins.get(&key).copied().unwrap_or(stated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedConfidence {
    pub stated: f64,
    pub calibrated: f64,
    pub correction_factor: f64,
    pub is_overconfident: bool,
    pub is_underconfident: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetadata {
    pub grounding_score: f64,
    pub calibrated_confidence: f64,
    pub cycles_used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredOutput {
    pub content: String,
    pub metadata: QualityMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryGuidance {
    pub dimension_feedback: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedOutput {
    pub reasons: Vec<crate::error::RejectionDimension>,
    pub retry_guidance: Option<RetryGuidance>,
}

/// `{status, signals, metrics}` envelope every component returns internally
/// (§7 propagation policy). Exceptions are converted into `Err` at the
/// component boundary before they reach this envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub value: Option<T>,
    pub signals: Vec<String>,
    pub metrics: HashMap<String, f64>,
}

impl<T> Envelope<T> {
    pub fn ok(value: T) -> Self {
        Self {
            ok: true,
            value: Some(value),
            signals: Vec::new(),
            metrics: HashMap::new(),
        }
    }

    pub fn failed(signal: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            signals: vec![signal.into()],
            metrics: HashMap::new(),
        }
    }

    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signals.push(signal.into());
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }
}
