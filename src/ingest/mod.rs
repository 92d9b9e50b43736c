//! Queue abstraction
//!
//! Overview
//! --------
//! Capability set the jobs need from the external queue service. The AWS SQS
//! adapter lives in [`crate::sqs`]; tests drive the jobs with in-memory fakes.
//!
//! Every method is one logical network operation. Implementations keep no
//! state besides their client handle.

use std::fmt;

use crate::errors::QueueError;

/// Largest number of entries the queue service accepts per batch call.
pub const MAX_BATCH_ENTRIES: usize = 10;

/// Longest delivery delay the queue service accepts, in seconds.
pub const MAX_DELAY_SECONDS: i32 = 900;

/// Resolved queue handle (the queue URL for SQS). Opaque to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueAddress(String);

impl QueueAddress {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A delivered message plus the handle needed to acknowledge it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
}

impl Notification {
    pub fn receipt(&self) -> Receipt {
        Receipt {
            message_id: self.message_id.clone(),
            receipt_handle: self.receipt_handle.clone(),
        }
    }
}

/// One entry of a delete-batch acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub message_id: String,
    pub receipt_handle: String,
}

/// One entry of a send-batch request. `id` must be unique within the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEntry {
    pub id: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    pub id: String,
    pub code: String,
    pub message: Option<String>,
    pub sender_fault: bool,
}

/// Per-entry results of a batch call that succeeded at the call level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub successful: Vec<String>,
    pub failed: Vec<EntryFailure>,
}

impl BatchOutcome {
    pub fn all_succeeded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            successful: ids.into_iter().map(Into::into).collect(),
            failed: Vec::new(),
        }
    }

    pub fn merge(&mut self, other: BatchOutcome) {
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[async_trait::async_trait]
pub trait QueueClient: Send + Sync {
    /// Look up the address for a logical queue name.
    async fn resolve_queue_address(&self, name: &str) -> Result<QueueAddress, QueueError>;

    /// Send one message; returns the service-assigned message id.
    async fn send(&self, address: &QueueAddress, body: &str) -> Result<String, QueueError>;

    /// Send one message that becomes visible after `delay_seconds`.
    async fn send_with_delay(
        &self,
        address: &QueueAddress,
        body: &str,
        delay_seconds: i32,
    ) -> Result<String, QueueError>;

    async fn send_batch(
        &self,
        address: &QueueAddress,
        entries: &[OutboundEntry],
    ) -> Result<BatchOutcome, QueueError>;

    async fn receive(&self, address: &QueueAddress) -> Result<Vec<Notification>, QueueError>;

    /// Acknowledge consumed notifications so the service drops them.
    async fn delete_batch(
        &self,
        address: &QueueAddress,
        receipts: &[Receipt],
    ) -> Result<BatchOutcome, QueueError>;
}

/// Reject delays the service would refuse, before any network call.
pub fn validate_delay(delay_seconds: i32) -> Result<(), QueueError> {
    if (0..=MAX_DELAY_SECONDS).contains(&delay_seconds) {
        Ok(())
    } else {
        Err(QueueError::InvalidRequest(format!(
            "delay of {delay_seconds}s is outside 0..={MAX_DELAY_SECONDS}"
        )))
    }
}
