//! Error taxonomy for the cognitive kernel.
//!
//! Every component returns a result envelope internally (see `kernel::Envelope`);
//! this `Error` type is what escapes that envelope when a component's failure
//! needs to be surfaced structurally rather than folded into a diagnostic.
//! No component is allowed to let a panic or a bare `Err` cross `process()` —
//! the orchestrator converts any `Error` it sees into an `ObserverResult` with
//! `final_phase: ESCALATED` and a diagnostic trail.

use thiserror::Error;

/// Result type alias used throughout the kernel.
pub type Result<T> = std::result::Result<T, Error>;

/// Resource kinds tracked by the lifecycle/energy budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Tokens,
    Cycles,
    CostUsd,
    WallClock,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tokens => write!(f, "tokens"),
            Self::Cycles => write!(f, "cycles"),
            Self::CostUsd => write!(f, "cost_usd"),
            Self::WallClock => write!(f, "wall_clock"),
        }
    }
}

/// A single rejection dimension from the noise gate (§4.6).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionDimension {
    Grounding { score: f64, floor: f64 },
    Confidence { score: f64, floor: f64 },
    Consistency { contradictions: Vec<String> },
    Completeness { missing: Vec<String> },
}

/// The capability gap that short-circuits Gate-In to ESCALATED.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CapabilityGap {
    pub severity: f64,
    pub missing_skills: Vec<String>,
    pub missing_knowledge: Vec<String>,
    pub missing_tools: Vec<String>,
    pub constraint_violations: Vec<String>,
}

/// Errors that can occur inside the cognitive kernel.
///
/// Each variant corresponds to one taxonomy kind named in the component
/// design's error-handling section: capability, policy, processing,
/// resource, evidence, and quality errors, plus an internal catch-all for
/// invariant violations that should never surface from a correct build.
#[derive(Error, Debug)]
pub enum Error {
    /// Identity cannot handle the signal. Terminal; maps to `ObserverPhase::Escalated`.
    #[error("capability gap (severity {:.2})", .gap.severity)]
    Capability { gap: CapabilityGap },

    /// A constraint was violated (forbidden tool, ethical rule). Terminal.
    #[error("policy violation: {violation}")]
    Policy {
        violation: String,
        tool: Option<String>,
    },

    /// A component's internal computation failed. Non-terminal unless repeated.
    #[error("processing error in {component}: {detail}")]
    Processing {
        component: &'static str,
        detail: String,
    },

    /// A resource budget was exhausted. Triggers a CLM ABORT recommendation.
    #[error("resource exhausted: {kind} (consumed {consumed}/{budget})")]
    Resource {
        kind: ResourceKind,
        budget: u64,
        consumed: u64,
    },

    /// Evidence retrieval failed. Downgrades grounding scores; never terminal.
    #[error("evidence retrieval failed for '{query}': {detail}")]
    Evidence { query: String, detail: String },

    /// Gate-Out rejected the output. Non-terminal while retry budget remains.
    #[error("quality gate rejected output on {} dimension(s)", .dimensions.len())]
    Quality { dimensions: Vec<RejectionDimension> },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catch-all for invariant violations surfaced during development.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn capability(gap: CapabilityGap) -> Self {
        Self::Capability { gap }
    }

    pub fn policy(violation: impl Into<String>, tool: Option<String>) -> Self {
        Self::Policy {
            violation: violation.into(),
            tool,
        }
    }

    pub fn processing(component: &'static str, detail: impl Into<String>) -> Self {
        Self::Processing {
            component,
            detail: detail.into(),
        }
    }

    pub fn resource(kind: ResourceKind, budget: u64, consumed: u64) -> Self {
        Self::Resource {
            kind,
            budget,
            consumed,
        }
    }

    pub fn evidence(query: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Evidence {
            query: query.into(),
            detail: detail.into(),
        }
    }

    pub fn quality(dimensions: Vec<RejectionDimension>) -> Self {
        Self::Quality { dimensions }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Whether this error is terminal for the current trace (no retry path).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Capability { .. } | Self::Policy { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_and_policy_are_terminal() {
        let gap = CapabilityGap {
            severity: 0.9,
            missing_skills: vec!["forecasting".into()],
            missing_knowledge: vec![],
            missing_tools: vec![],
            constraint_violations: vec![],
        };
        assert!(Error::capability(gap).is_terminal());
        assert!(Error::policy("forbidden tool", Some("payroll_read".into())).is_terminal());
    }

    #[test]
    fn evidence_and_quality_are_not_terminal() {
        assert!(!Error::evidence("gdp growth", "retriever timed out").is_terminal());
        assert!(!Error::quality(vec![RejectionDimension::Grounding {
            score: 0.2,
            floor: 0.8
        }])
        .is_terminal());
    }
}
