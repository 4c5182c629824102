//! Knowledge retriever (SPEC_FULL.md §B.2): supplies the `Origin` evidence
//! records the Hallucination Monitor grades claims against, and answers the
//! curiosity engine's exploration queries. A failed or empty retrieval is
//! never fatal — it degrades grounding scores like any other `EvidenceError`
//! (§4.4 Non-goal: the kernel does not retry a flaky retriever itself).

use crate::error::Result;
use crate::kernel::types::Origin;
use async_trait::async_trait;
use tracing::warn;

/// External evidence lookup, used both to ground an Execute-phase output
/// and to resolve curiosity-engine exploration queries.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Retrieve evidence relevant to `query`, within `domain`.
    async fn retrieve_context(&self, query: &str, domain: &str) -> Result<Vec<Origin>>;

    /// Raw unranked search, used by the curiosity engine when a structured
    /// retrieval turns up nothing.
    async fn search_raw(&self, query: &str) -> Result<Vec<String>>;
}

/// A retriever with no backing index: every call returns empty evidence.
/// Grounding always falls to zero against this kit, which is the expected
/// degrade path when no retriever collaborator is configured.
#[derive(Debug, Clone, Default)]
pub struct NullRetriever;

#[async_trait]
impl KnowledgeRetriever for NullRetriever {
    async fn retrieve_context(&self, query: &str, domain: &str) -> Result<Vec<Origin>> {
        warn!(query, domain, "no knowledge retriever configured, returning no evidence");
        Ok(Vec::new())
    }

    async fn search_raw(&self, _query: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_retriever_returns_empty_evidence() {
        let retriever = NullRetriever;
        let evidence = retriever.retrieve_context("gdp growth", "finance").await.unwrap();
        assert!(evidence.is_empty());
    }
}
