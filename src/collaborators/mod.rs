//! External collaborator interfaces (SPEC_FULL.md §B.2).
//!
//! The kernel orchestrates cognition; it does not itself call a model
//! provider, run a vector search, execute a tool, or watch a socket. Those
//! capabilities are injected as trait objects so the orchestrator can be
//! driven by fakes in tests and by real backends in a host application,
//! mirroring how the teacher's `llm::LLMClient` sits behind `SmartRouter`
//! rather than being called directly by orchestration code.

pub mod events;
pub mod inference;
pub mod retriever;
pub mod tools;

pub use events::{EventStream, NullEventStream};
pub use inference::{InferenceContext, InferenceKit, NullInferenceKit};
pub use retriever::{KnowledgeRetriever, NullRetriever};
pub use tools::{NullToolRegistry, ToolDescriptor, ToolRegistry};

use std::sync::Arc;

/// The bundle of collaborators a trace's `process()` call is driven by.
/// Defaults to the null implementations, so an orchestrator can be
/// exercised immediately without any live backend wired in.
#[derive(Clone)]
pub struct Collaborators {
    pub inference: Arc<dyn InferenceKit>,
    pub retriever: Arc<dyn KnowledgeRetriever>,
    pub tools: Arc<dyn ToolRegistry>,
    pub events: Arc<dyn EventStream>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            inference: Arc::new(NullInferenceKit),
            retriever: Arc::new(NullRetriever),
            tools: Arc::new(NullToolRegistry),
            events: Arc::new(NullEventStream),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_bundle_degrades_quietly() {
        let collaborators = Collaborators::default();
        let completion = collaborators.inference.complete("hi", &vec![]).await.unwrap();
        assert!(!completion.is_empty());
        assert!(collaborators.retriever.retrieve_context("q", "general").await.unwrap().is_empty());
        assert!(collaborators.tools.search_tools("q").await.unwrap().is_empty());
        assert!(collaborators.events.poll(5).await.unwrap().is_empty());
    }
}
