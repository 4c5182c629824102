//! Identity / self-model (SPEC_FULL.md §D): owns `SpawnRequest` -> identity
//! construction (§4.1 step 1). This is where data-model invariant 1
//! (`ActivationMap.required_tools` subset of allowed, never forbidden) and
//! the `PolicyError` terminal path (§7, §8 scenario 2) are enforced, and
//! where `CapabilityAssessment`/`CapabilityGap` are computed.

use crate::config::{IdentityConfig, QualityBar};
use crate::error::{CapabilityGap, Error, Result};
use crate::kernel::types::{CapabilityAssessment, SignalTags};
use std::collections::HashSet;

/// What a spawn request asks the kernel to become for one trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub role: String,
    pub objective: String,
    /// Skills/tools the caller already knows this objective requires —
    /// perception folds these into `SignalTags` verbatim rather than
    /// inferring them from text (`kernel::perception`'s own contract).
    pub required_skills: HashSet<String>,
    pub required_tools: HashSet<String>,
    /// What the identity itself is capable of, independent of policy.
    pub known_skills: HashSet<String>,
    pub known_tools: HashSet<String>,
    pub tools_allowed: HashSet<String>,
    pub tools_forbidden: HashSet<String>,
    pub ethical_constraints: Vec<String>,
    pub quality_bar: Option<QualityBar>,
    /// Output sections the caller declares required (§4.6 COMPLETENESS
    /// dimension), carried onto `IdentityConfig` verbatim.
    pub required_outputs: Vec<String>,
}

impl SpawnRequest {
    pub fn new(role: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            objective: objective.into(),
            required_skills: HashSet::new(),
            required_tools: HashSet::new(),
            known_skills: HashSet::new(),
            known_tools: HashSet::new(),
            tools_allowed: HashSet::new(),
            tools_forbidden: HashSet::new(),
            ethical_constraints: Vec::new(),
            quality_bar: None,
            required_outputs: Vec::new(),
        }
    }

    pub fn with_tools_allowed(mut self, tools: impl IntoIterator<Item = String>) -> Self {
        self.tools_allowed = tools.into_iter().collect();
        self
    }

    pub fn with_tools_forbidden(mut self, tools: impl IntoIterator<Item = String>) -> Self {
        self.tools_forbidden = tools.into_iter().collect();
        self
    }
}

/// The constructed identity for one trace: cognitive profile plus the
/// per-spawn constraint overrides (§4.1 step 1).
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub role: String,
    pub known_skills: HashSet<String>,
    pub known_tools: HashSet<String>,
    pub config: IdentityConfig,
}

/// Construct the identity for this trace from the spawn request, applying
/// the process-global default quality bar unless the request overrides it.
pub fn construct_identity(spawn: &SpawnRequest, default_bar: QualityBar) -> Identity {
    Identity {
        role: spawn.role.clone(),
        known_skills: spawn.known_skills.clone(),
        known_tools: spawn.known_tools.clone(),
        config: IdentityConfig {
            tools_allowed: spawn.tools_allowed.clone(),
            tools_forbidden: spawn.tools_forbidden.clone(),
            ethical_constraints: spawn.ethical_constraints.clone(),
            quality_bar: spawn.quality_bar.unwrap_or(default_bar),
            required_outputs: spawn.required_outputs.clone(),
        },
    }
}

/// Enforce invariant 1: a forbidden tool in `tags.required_tools` is a
/// terminal `PolicyError`, checked before anything else in Gate-In (§8
/// scenario 2: "Dump all admin salaries" with `tools_forbidden={payroll_read}`).
pub fn enforce_tool_policy(tags: &SignalTags, identity: &Identity) -> Result<()> {
    for tool in &tags.required_tools {
        if identity.config.tools_forbidden.contains(tool) {
            return Err(Error::policy(
                format!("tool_forbidden:{tool}"),
                Some(tool.clone()),
            ));
        }
    }
    Ok(())
}

/// Check the identity's installed `ethical_constraints` (§4.1 step 1)
/// against what Gate-In perceived about the signal. Each constraint is a
/// topic/keyword the identity must refuse to act on (e.g. `"payroll"`,
/// `"medical_diagnosis"`); a violation is a case-insensitive match against
/// the signal's domain, primary intent, or extracted content keywords —
/// the same surface `enforce_tool_policy` reads off `SignalTags`, since
/// ethical constraints police *topics* the way tool policy polices *tools*.
fn check_ethical_constraints(tags: &SignalTags, identity: &Identity) -> Vec<String> {
    if identity.config.ethical_constraints.is_empty() {
        return Vec::new();
    }
    let haystack = format!(
        "{} {} {}",
        tags.domain,
        tags.primary_intent,
        tags.content_keywords.join(" ")
    )
    .to_lowercase();

    identity
        .config
        .ethical_constraints
        .iter()
        .filter(|constraint| !constraint.is_empty() && haystack.contains(&constraint.to_lowercase()))
        .cloned()
        .collect()
}

/// Assess whether `identity` can handle `tags` (§4.1 step 4). A tool or
/// skill the identity doesn't know about (not merely "not allowed" — truly
/// absent from `known_skills`/`known_tools`) contributes to the gap
/// severity; severity crossing 0.8, or any policy violation, short-circuits
/// Gate-In to ESCALATED. An ethical-constraint match always short-circuits
/// regardless of severity (`CapabilityAssessment::should_escalate`), since a
/// constraint violation is not a matter of degree.
pub fn assess_capability(tags: &SignalTags, identity: &Identity) -> CapabilityAssessment {
    let missing_skills: Vec<String> = tags
        .required_skills
        .difference(&identity.known_skills)
        .cloned()
        .collect();
    let missing_tools: Vec<String> = tags
        .required_tools
        .iter()
        .filter(|t| !identity.known_tools.contains(*t) && !identity.config.tools_allowed.contains(*t))
        .cloned()
        .collect();
    let constraint_violations = check_ethical_constraints(tags, identity);

    let total_required = tags.required_skills.len() + tags.required_tools.len();
    let total_missing = missing_skills.len() + missing_tools.len();

    if total_missing == 0 && constraint_violations.is_empty() {
        return CapabilityAssessment::capable(1.0);
    }

    let severity = if !constraint_violations.is_empty() {
        1.0
    } else if total_required == 0 {
        0.0
    } else {
        total_missing as f64 / total_required as f64
    };

    CapabilityAssessment::with_gap(CapabilityGap {
        severity,
        missing_skills,
        missing_knowledge: Vec::new(),
        missing_tools,
        constraint_violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_with(allowed: &[&str], forbidden: &[&str]) -> Identity {
        Identity {
            role: "employee".to_string(),
            known_skills: HashSet::new(),
            known_tools: allowed.iter().map(|s| s.to_string()).collect(),
            config: IdentityConfig {
                tools_allowed: allowed.iter().map(|s| s.to_string()).collect(),
                tools_forbidden: forbidden.iter().map(|s| s.to_string()).collect(),
                ethical_constraints: vec![],
                quality_bar: QualityBar::default(),
                required_outputs: vec![],
            },
        }
    }

    #[test]
    fn forbidden_required_tool_is_a_policy_error() {
        let identity = identity_with(&[], &["payroll_read"]);
        let mut tags = SignalTags::default();
        tags.required_tools = HashSet::from(["payroll_read".to_string()]);
        let err = enforce_tool_policy(&tags, &identity).unwrap_err();
        assert!(err.is_terminal());
        assert_eq!(err.to_string(), "policy violation: tool_forbidden:payroll_read");
    }

    #[test]
    fn fully_capable_identity_has_no_gap() {
        let identity = identity_with(&["web_search"], &[]);
        let mut tags = SignalTags::default();
        tags.required_tools = HashSet::from(["web_search".to_string()]);
        let assessment = assess_capability(&tags, &identity);
        assert!(assessment.gap.is_none());
        assert_eq!(assessment.confidence, 1.0);
    }

    #[test]
    fn missing_everything_escalates() {
        let identity = identity_with(&[], &[]);
        let mut tags = SignalTags::default();
        tags.required_skills = HashSet::from(["forecasting".to_string()]);
        tags.required_tools = HashSet::from(["spreadsheet".to_string()]);
        let assessment = assess_capability(&tags, &identity);
        assert!(assessment.should_escalate());
    }

    #[test]
    fn ethical_constraint_match_escalates_even_with_full_capability() {
        let mut identity = identity_with(&["web_search"], &[]);
        identity.config.ethical_constraints = vec!["payroll".to_string()];
        let mut tags = SignalTags::default();
        tags.domain = "payroll".to_string();
        tags.required_tools = HashSet::from(["web_search".to_string()]);

        let assessment = assess_capability(&tags, &identity);
        assert!(assessment.should_escalate());
        let gap = assessment.gap.expect("constraint match must produce a gap");
        assert_eq!(gap.constraint_violations, vec!["payroll".to_string()]);
    }

    #[test]
    fn unrelated_ethical_constraint_does_not_escalate() {
        let mut identity = identity_with(&["web_search"], &[]);
        identity.config.ethical_constraints = vec!["self_harm".to_string()];
        let mut tags = SignalTags::default();
        tags.domain = "general".to_string();
        tags.required_tools = HashSet::from(["web_search".to_string()]);

        let assessment = assess_capability(&tags, &identity);
        assert!(!assessment.should_escalate());
        assert!(assessment.gap.is_none());
    }
}
