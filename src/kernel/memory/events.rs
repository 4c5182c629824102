//! Event ring buffer (§4.8 Public contract): capacity `M`, push evicts oldest.
//!
//! Adapted from a sqlite-backed node store to a pure in-memory ring since
//! Short-Term Memory is ephemeral per §3 lifecycles (Non-goal d: no durable
//! epoch-memory persistence).

use std::collections::VecDeque;

/// One observation fed into the OODA driver's Observe step: a tool result,
/// an interrupt, or a wait-handle completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: String,
    pub payload: String,
    pub is_blocking: bool,
    pub blocking_reason: Option<String>,
}

impl Event {
    pub fn new(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
            is_blocking: false,
            blocking_reason: None,
        }
    }

    pub fn blocking(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: String::new(),
            is_blocking: true,
            blocking_reason: Some(reason.into()),
        }
    }
}

/// Fixed-capacity ring buffer of recent events. Pushing past capacity
/// evicts the oldest entry rather than growing (§4.8: "push evicts oldest").
#[derive(Debug, Clone)]
pub struct EventRing {
    capacity: usize,
    events: VecDeque<Event>,
}

impl EventRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn push_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for e in events {
            self.push(e);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The last `k` events, oldest first.
    pub fn last(&self, k: usize) -> Vec<&Event> {
        let start = self.events.len().saturating_sub(k);
        self.events.iter().skip(start).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_past_capacity_evicts_oldest() {
        let mut ring = EventRing::new(2);
        ring.push(Event::new("a", "1"));
        ring.push(Event::new("b", "2"));
        ring.push(Event::new("c", "3"));
        let remaining: Vec<_> = ring.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(remaining, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn last_k_respects_buffer_size() {
        let mut ring = EventRing::new(5);
        ring.push(Event::new("a", "1"));
        ring.push(Event::new("b", "2"));
        assert_eq!(ring.last(10).len(), 2);
        assert_eq!(ring.last(1)[0].kind, "b");
    }
}
