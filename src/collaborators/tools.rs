//! Tool registry (SPEC_FULL.md §B.2): resolves the tool names an
//! `ActivationMap`/DAG node names into something executable. The kernel
//! never invokes a tool directly; it asks the registry to search and hands
//! execution off to the caller's own dispatch, consistent with the
//! `tools_allowed`/`tools_forbidden` boundary enforced in `kernel::lifecycle`.

use crate::error::Result;
use async_trait::async_trait;

/// A tool the registry knows how to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Search for tools matching `query` (e.g. a required-skill name from
    /// `SignalTags`). An empty result means "treat as missing" — the
    /// curiosity engine's `ToolSearch` strategy degrades the same way.
    async fn search_tools(&self, query: &str) -> Result<Vec<ToolDescriptor>>;
}

/// A registry with no tools behind it: every search is empty.
#[derive(Debug, Clone, Default)]
pub struct NullToolRegistry;

#[async_trait]
impl ToolRegistry for NullToolRegistry {
    async fn search_tools(&self, _query: &str) -> Result<Vec<ToolDescriptor>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_registry_finds_nothing() {
        let registry = NullToolRegistry;
        assert!(registry.search_tools("web_search").await.unwrap().is_empty());
    }
}
