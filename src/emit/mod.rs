//! Outbound batching.
//!
//! [`Batch`] is the capacity-bounded buffer the producer fills record by
//! record. It is flushed when full or when the input is exhausted, then reset
//! for the next window.

use crate::errors::QueueError;
use crate::ingest::OutboundEntry;

#[derive(Debug)]
pub struct Batch {
    entries: Vec<OutboundEntry>,
    capacity: usize,
}

impl Batch {
    /// A zero capacity could never flush.
    pub fn with_capacity(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::Config("batch capacity must be at least 1".into()));
        }
        Ok(Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Callers must flush once [`Batch::is_full`] holds; pushing past capacity
    /// is a logic error.
    pub fn push(&mut self, entry: OutboundEntry) {
        debug_assert!(self.entries.len() < self.capacity, "batch overflow");
        self.entries.push(entry);
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Flush when full or when the last input element has been pushed. Both
    /// conditions together still mean one flush.
    pub fn should_flush(&self, is_last: bool) -> bool {
        !self.entries.is_empty() && (self.is_full() || is_last)
    }

    pub fn entries(&self) -> &[OutboundEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
