//! What-if counterfactual check (SPEC_FULL.md §C): an optional offline
//! simulation run before an Act dispatch that would mutate external state
//! (file write, tool call with side effects). Additive safety supplement
//! with no counterpart in `spec.md`'s component list — never overrides a
//! Gate-In `PolicyError`, only adds a second, narrower check at Act time.

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeBranch {
    pub description: String,
    pub likelihood: f64,
    pub reversible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictDecision {
    Approve,
    Reject,
    Modify,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhatIfResult {
    pub branches: Vec<OutcomeBranch>,
    pub decision: VerdictDecision,
    pub safeguard: Option<String>,
    pub reject_reason: Option<String>,
}

/// Mutating instructions this check looks for; a node whose instruction
/// text contains none of these is never evaluated (§C: only side-effecting
/// dispatches get this check).
const MUTATING_VERBS: &[&str] = &["write", "delete", "deploy", "send", "execute", "drop", "overwrite"];

fn is_mutating(instruction: &str) -> bool {
    let lower = instruction.to_lowercase();
    MUTATING_VERBS.iter().any(|v| lower.contains(v))
}

/// Simulate outcome branches for `instruction` and render a verdict. A
/// branch with high likelihood and `reversible: false` triggers REJECT;
/// moderate-risk irreversible branches trigger MODIFY (append a safeguard
/// instruction rather than blocking outright).
pub fn evaluate(instruction: &str) -> Option<WhatIfResult> {
    if !is_mutating(instruction) {
        return None;
    }

    let lower = instruction.to_lowercase();
    let destructive = ["delete", "drop", "overwrite"].iter().any(|v| lower.contains(v));

    let branches = vec![
        OutcomeBranch {
            description: format!("{instruction} succeeds as intended"),
            likelihood: if destructive { 0.6 } else { 0.85 },
            reversible: !destructive,
        },
        OutcomeBranch {
            description: format!("{instruction} has an unintended side effect"),
            likelihood: if destructive { 0.4 } else { 0.15 },
            reversible: false,
        },
    ];

    let high_risk_irreversible = branches
        .iter()
        .any(|b| !b.reversible && b.likelihood >= 0.35);

    let decision = if destructive && high_risk_irreversible {
        VerdictDecision::Reject
    } else if high_risk_irreversible {
        VerdictDecision::Modify
    } else {
        VerdictDecision::Approve
    };

    let (safeguard, reject_reason) = match decision {
        VerdictDecision::Modify => (
            Some("take a reversible snapshot before executing".to_string()),
            None,
        ),
        VerdictDecision::Reject => (
            None,
            Some(format!("irreversible high-likelihood side effect for: {instruction}")),
        ),
        VerdictDecision::Approve => (None, None),
    };

    Some(WhatIfResult {
        branches,
        decision,
        safeguard,
        reject_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_mutating_instruction_is_not_evaluated() {
        assert!(evaluate("summarize the report").is_none());
    }

    #[test]
    fn destructive_instruction_rejects() {
        let result = evaluate("delete the production database").unwrap();
        assert_eq!(result.decision, VerdictDecision::Reject);
        assert!(result.reject_reason.is_some());
    }

    #[test]
    fn reversible_write_approves() {
        let result = evaluate("write a draft summary to scratch.txt").unwrap();
        assert_eq!(result.decision, VerdictDecision::Approve);
    }
}
