//! Curiosity / gap detection (SPEC_FULL.md §C): when `SignalTags` or a DAG
//! node declares a required field Gate-In couldn't populate, emit a
//! `KnowledgeGap` and an `ExplorationQuery`. The kernel never executes the
//! exploration itself — it hands the query to a collaborator, and a failed
//! or empty response degrades exactly like any other `EvidenceError`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationStrategy {
    Rag,
    Web,
    LocalMemory,
    ToolSearch,
    Interactive,
    Hypothetical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeGap {
    pub field: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationQuery {
    pub gap: KnowledgeGap,
    pub query_text: String,
    pub strategy: ExplorationStrategy,
}

fn strategy_for(field: &str) -> ExplorationStrategy {
    match field {
        f if f.contains("tool") => ExplorationStrategy::ToolSearch,
        f if f.contains("location") || f.contains("time") => ExplorationStrategy::Interactive,
        f if f.contains("recent") || f.contains("news") || f.contains("current") => {
            ExplorationStrategy::Web
        }
        f if f.contains("policy") || f.contains("fact") || f.contains("history") => {
            ExplorationStrategy::Rag
        }
        _ => ExplorationStrategy::LocalMemory,
    }
}

/// Detect gaps among `required_fields` not present in `populated_fields`,
/// and build an exploration query for each.
pub fn detect_gaps(required_fields: &[String], populated_fields: &[String]) -> Vec<ExplorationQuery> {
    required_fields
        .iter()
        .filter(|f| !populated_fields.contains(f))
        .map(|field| {
            let gap = KnowledgeGap {
                field: field.clone(),
                reason: format!("'{field}' required but not populated during Gate-In"),
            };
            let strategy = strategy_for(field);
            ExplorationQuery {
                query_text: format!("resolve missing field: {field}"),
                strategy,
                gap,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_yields_exploration_query() {
        let queries = detect_gaps(
            &["web_search_tool".to_string(), "location".to_string()],
            &["location".to_string()],
        );
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].strategy, ExplorationStrategy::ToolSearch);
    }

    #[test]
    fn no_gap_when_all_fields_populated() {
        let queries = detect_gaps(&["a".to_string()], &["a".to_string()]);
        assert!(queries.is_empty());
    }
}
