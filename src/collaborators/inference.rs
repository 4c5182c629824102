//! Inference kit (SPEC_FULL.md §B.2): the kernel never talks to a model
//! provider directly — it asks an injected `InferenceKit` for a completion
//! or an embedding and treats the result as untrusted evidence like any
//! other collaborator response. Grounded on the teacher's `llm::LLMClient`
//! trait boundary, narrowed to the two operations the pipeline needs.

use crate::error::Result;
use async_trait::async_trait;

/// A single prior turn or supporting fact handed to `complete` as context.
pub type InferenceContext = Vec<String>;

/// The generative and embedding surface the kernel calls into during
/// Execute (completions) and goal-drift scoring (embeddings, Open Question
/// resolution 3: an optional replacement for the lexical-Jaccard fallback).
#[async_trait]
pub trait InferenceKit: Send + Sync {
    /// Produce a completion for `prompt` given `context`.
    async fn complete(&self, prompt: &str, context: &InferenceContext) -> Result<String>;

    /// Embed `text` into a dense vector, or `Ok(None)` if this kit has no
    /// embedding model configured (goal-drift falls back to lexical-Jaccard).
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>>;
}

/// A deterministic kit with no live model behind it: `complete` echoes the
/// prompt as a diagnostic stand-in, `embed` always declines. Used as the
/// default when no collaborator is wired in, and in tests where behavior
/// must be reproducible without network access.
#[derive(Debug, Clone, Default)]
pub struct NullInferenceKit;

#[async_trait]
impl InferenceKit for NullInferenceKit {
    async fn complete(&self, prompt: &str, _context: &InferenceContext) -> Result<String> {
        Ok(format!("[no inference kit configured] {prompt}"))
    }

    async fn embed(&self, _text: &str) -> Result<Option<Vec<f32>>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_kit_echoes_prompt_and_declines_embedding() {
        let kit = NullInferenceKit;
        let completion = kit.complete("summarize this", &vec![]).await.unwrap();
        assert!(completion.contains("summarize this"));
        assert_eq!(kit.embed("anything").await.unwrap(), None);
    }
}
