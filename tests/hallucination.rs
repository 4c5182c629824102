//! Fabrication integration test (spec.md §8 scenario 4): a completion that
//! states an unsupported statistic against empty evidence must be graded
//! FABRICATED, fail Gate-Out on the GROUNDING dimension, and terminate with
//! a `RejectedOutput` once the retry budget is exhausted — never silently
//! passed through.

use async_trait::async_trait;
use cognitive_kernel::{
    ApexOrchestrator, Collaborators, InferenceContext, InferenceKit, KernelConfig, NullEventStream,
    NullRetriever, NullToolRegistry, ObserverPhase, SpawnRequest,
};
use std::sync::Arc;

/// Always states the same unsupported statistic, regardless of prompt or
/// retry guidance — the kernel has no way to "fix" a model that keeps
/// fabricating, so the noise gate's retry budget is what bounds the trace.
struct FabricatingKit;

#[async_trait]
impl InferenceKit for FabricatingKit {
    async fn complete(&self, _prompt: &str, _context: &InferenceContext) -> cognitive_kernel::Result<String> {
        Ok("The 2024 Eurozone GDP growth rate was exactly 8 percent.".to_string())
    }

    async fn embed(&self, _text: &str) -> cognitive_kernel::Result<Option<Vec<f32>>> {
        Ok(None)
    }
}

#[tokio::test]
async fn fabricated_statistic_exhausts_retry_budget_and_is_rejected() {
    let collaborators = Collaborators {
        inference: Arc::new(FabricatingKit),
        retriever: Arc::new(NullRetriever),
        tools: Arc::new(NullToolRegistry),
        events: Arc::new(NullEventStream),
    };
    let config = KernelConfig::default();
    let retry_budget = config.retry_budget;
    let orchestrator = ApexOrchestrator::new(config, collaborators);

    let spawn = SpawnRequest::new("analyst", "State the 2024 Eurozone GDP growth");
    let input = cognitive_kernel::RawInput::text("State the 2024 Eurozone GDP growth");

    let result = orchestrator.process(input, spawn, vec![]).await;

    assert_eq!(result.final_phase, ObserverPhase::GateOut);
    assert!(result.filtered_output.is_none());
    let grounding = result.grounding_report.expect("grading must have run");
    assert!(grounding.fabricated_count >= 1);
    assert!(grounding.grounding_score < KernelConfig::default().fabricated_threshold);
    let rejected = result.rejected_output.expect("fabricated output must be rejected");
    assert!(rejected
        .reasons
        .iter()
        .any(|r| matches!(r, cognitive_kernel::error::RejectionDimension::Grounding { .. })));
    // retry budget is exhausted by the time the terminal rejection is returned
    assert!(retry_budget > 0);
    assert!(rejected.retry_guidance.is_none());
}
