//! Event stream (SPEC_FULL.md §B.2): the pull interface the OODA driver's
//! Observe step polls for tool results, async-job completions, and
//! caller-raised interrupts, ahead of anything already queued in
//! `kernel::lifecycle::InterruptQueue`.

use crate::error::Result;
use crate::kernel::memory::events::Event;
use async_trait::async_trait;

#[async_trait]
pub trait EventStream: Send + Sync {
    /// Drain up to `max` pending events without blocking. An empty result
    /// means Observe has nothing new this cycle, not that the stream failed.
    async fn poll(&self, max: usize) -> Result<Vec<Event>>;
}

/// A stream with nothing behind it: every poll returns empty.
#[derive(Debug, Clone, Default)]
pub struct NullEventStream;

#[async_trait]
impl EventStream for NullEventStream {
    async fn poll(&self, _max: usize) -> Result<Vec<Event>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_stream_polls_empty() {
        let stream = NullEventStream;
        assert!(stream.poll(10).await.unwrap().is_empty());
    }
}
