//! Short-Term Memory (§4.8): ephemeral RAM for one Execute phase.
//!
//! Keeps the familiar mod.rs/types.rs/store.rs file-split, adapted from a
//! sqlite-backed node graph to a pure in-memory ring + TTL map, since §3/§4.8
//! mandate ephemeral, non-persisted state (Non-goal d: no durable
//! persistence of epoch memory).
//!
//! Concurrency: a single Execute phase holds exclusive ownership of one
//! `ShortTermMemory`; there is no cross-phase sharing (§4.8 Concurrency).

pub mod dag_state;
pub mod entities;
pub mod events;

pub use dag_state::{DagSnapshot, DagStateRegistry};
pub use entities::EntityCache;
pub use events::{Event, EventRing};

use crate::kernel::types::RetryGuidance;

/// The context slice `read_context` hands to Orient: recent events plus the
/// top-scoring cached entities, and any retry guidance appended to working
/// memory (Open Question resolution 1: guidance never mutates `SignalTags`,
/// only this working-memory slice).
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSlice {
    pub recent_events: Vec<Event>,
    pub entities: Vec<(String, String)>,
    pub pending_guidance: Vec<String>,
}

/// One Execute phase's ephemeral memory: event ring, entity TTL cache, DAG
/// state registry, and the working-memory guidance queue.
pub struct ShortTermMemory {
    events: EventRing,
    entities: EntityCache,
    dag: DagStateRegistry,
    guidance: Vec<String>,
    context_k: usize,
}

impl ShortTermMemory {
    pub fn new(event_capacity: usize, entity_ttl_seconds: u64, entity_max_entries: usize) -> Self {
        Self {
            events: EventRing::new(event_capacity),
            entities: EntityCache::new(entity_ttl_seconds, entity_max_entries),
            dag: DagStateRegistry::new(),
            guidance: Vec::new(),
            context_k: 10,
        }
    }

    pub fn with_context_window(mut self, k: usize) -> Self {
        self.context_k = k;
        self
    }

    /// Observe: append pending events. O(events), never blocks.
    pub fn record_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.push_all(events);
    }

    pub fn remember_entity(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entities.put(key, value);
    }

    pub fn dag(&mut self) -> &mut DagStateRegistry {
        &mut self.dag
    }

    /// Retry guidance is appended here, never onto `SignalTags` (Open
    /// Question resolution 1, §9).
    pub fn push_guidance(&mut self, guidance: RetryGuidance) {
        self.guidance.extend(guidance.dimension_feedback);
    }

    /// `read_context(query?)` (§4.8 Public contract).
    pub fn read_context(
        &mut self,
        query: Option<&str>,
        embed: Option<&dyn Fn(&str) -> Vec<f64>>,
    ) -> ContextSlice {
        let recent_events = self
            .events
            .last(self.context_k)
            .into_iter()
            .cloned()
            .collect();
        let entities = self.entities.top_scoring(query, self.context_k, embed);
        ContextSlice {
            recent_events,
            entities,
            pending_guidance: self.guidance.clone(),
        }
    }

    pub fn dag_snapshot(&self) -> DagSnapshot {
        self.dag.snapshot()
    }
}
