//! In-memory `QueueClient` that records every call for assertions.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqs_batch_pipeline::errors::QueueError;
use sqs_batch_pipeline::ingest::{
    validate_delay, BatchOutcome, EntryFailure, Notification, OutboundEntry, QueueAddress,
    QueueClient, Receipt, MAX_BATCH_ENTRIES,
};

pub const QUEUE_NAME: &str = "cron-jobs";
pub const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/000000000000/cron-jobs";

#[derive(Clone, Default)]
pub struct FakeQueue {
    pub resolves: Arc<Mutex<usize>>,
    pub sent_batches: Arc<Mutex<Vec<Vec<OutboundEntry>>>>,
    // (body, delay)
    pub singles: Arc<Mutex<Vec<(String, Option<i32>)>>>,
    pub deletes: Arc<Mutex<Vec<Vec<Receipt>>>>,
    pub inbox: Arc<Mutex<VecDeque<Notification>>>,
    /// Fail the Nth send_batch call (1-based) with a transport error.
    pub fail_send_on: Option<usize>,
    pub fail_delete: Option<fn() -> QueueError>,
    /// Entry ids the service "rejects" individually.
    pub reject_ids: HashSet<String>,
    pub unknown_queue: bool,
}

impl FakeQueue {
    pub fn address() -> QueueAddress {
        QueueAddress::new(QUEUE_URL)
    }

    pub fn resolve_count(&self) -> usize {
        *self.resolves.lock().unwrap()
    }

    pub fn batches(&self) -> Vec<Vec<OutboundEntry>> {
        self.sent_batches.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<Vec<Receipt>> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn with_inbox(self, notifications: Vec<Notification>) -> Self {
        *self.inbox.lock().unwrap() = notifications.into();
        self
    }

    fn outcome<'a>(&self, ids: impl Iterator<Item = &'a String>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for id in ids {
            if self.reject_ids.contains(id) {
                outcome.failed.push(EntryFailure {
                    id: id.clone(),
                    code: "InvalidParameterValue".into(),
                    message: Some("rejected by fake".into()),
                    sender_fault: true,
                });
            } else {
                outcome.successful.push(id.clone());
            }
        }
        outcome
    }
}

#[async_trait]
impl QueueClient for FakeQueue {
    async fn resolve_queue_address(&self, name: &str) -> Result<QueueAddress, QueueError> {
        *self.resolves.lock().unwrap() += 1;
        if self.unknown_queue || name != QUEUE_NAME {
            return Err(QueueError::NotFound(name.to_string()));
        }
        Ok(Self::address())
    }

    async fn send(&self, address: &QueueAddress, body: &str) -> Result<String, QueueError> {
        assert_eq!(address.as_str(), QUEUE_URL);
        let mut singles = self.singles.lock().unwrap();
        singles.push((body.to_string(), None));
        Ok(format!("msg-{}", singles.len()))
    }

    async fn send_with_delay(
        &self,
        address: &QueueAddress,
        body: &str,
        delay_seconds: i32,
    ) -> Result<String, QueueError> {
        assert_eq!(address.as_str(), QUEUE_URL);
        validate_delay(delay_seconds)?;
        let mut singles = self.singles.lock().unwrap();
        singles.push((body.to_string(), Some(delay_seconds)));
        Ok(format!("msg-{}", singles.len()))
    }

    async fn send_batch(
        &self,
        address: &QueueAddress,
        entries: &[OutboundEntry],
    ) -> Result<BatchOutcome, QueueError> {
        assert_eq!(address.as_str(), QUEUE_URL);
        let mut batches = self.sent_batches.lock().unwrap();
        if self.fail_send_on == Some(batches.len() + 1) {
            return Err(QueueError::Transport("connection reset".into()));
        }
        batches.push(entries.to_vec());
        Ok(self.outcome(entries.iter().map(|e| &e.id)))
    }

    async fn receive(&self, address: &QueueAddress) -> Result<Vec<Notification>, QueueError> {
        assert_eq!(address.as_str(), QUEUE_URL);
        let mut inbox = self.inbox.lock().unwrap();
        let n = inbox.len().min(MAX_BATCH_ENTRIES);
        Ok(inbox.drain(..n).collect())
    }

    async fn delete_batch(
        &self,
        address: &QueueAddress,
        receipts: &[Receipt],
    ) -> Result<BatchOutcome, QueueError> {
        assert_eq!(address.as_str(), QUEUE_URL);
        if let Some(make_err) = self.fail_delete {
            return Err(make_err());
        }
        self.deletes.lock().unwrap().push(receipts.to_vec());
        Ok(self.outcome(receipts.iter().map(|r| &r.message_id)))
    }
}

pub fn notification(id: usize, body: &str) -> Notification {
    Notification {
        message_id: format!("m-{id}"),
        receipt_handle: format!("rh-{id}"),
        body: body.to_string(),
    }
}
