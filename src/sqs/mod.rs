//! AWS SQS implementation of [`QueueClient`].
//!
//! SDK errors are rendered with their full context and mapped into
//! [`QueueError`] here. Batch operations accept any number of entries and are
//! split into service calls of at most [`MAX_BATCH_ENTRIES`]; each call is
//! attempted once.

use aws_config::BehaviorVersion;
use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use aws_sdk_sqs::types::{
    BatchResultErrorEntry, DeleteMessageBatchRequestEntry, Message, SendMessageBatchRequestEntry,
};
use aws_sdk_sqs::Client;
use tracing::debug;

use crate::config::Config;
use crate::errors::QueueError;
use crate::ingest::{
    validate_delay, BatchOutcome, EntryFailure, Notification, OutboundEntry, QueueAddress,
    QueueClient, Receipt, MAX_BATCH_ENTRIES,
};

/// Build an SQS client for the configured region, honoring an endpoint
/// override (ElasticMQ, LocalStack).
pub async fn create_sqs_client(cfg: &Config) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(cfg.aws_region.clone()));
    if let Some(endpoint) = &cfg.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    Client::new(&loader.load().await)
}

#[derive(Clone)]
pub struct SqsQueue {
    client: Client,
    receive_max_messages: i32,
    receive_wait_secs: i32,
}

impl SqsQueue {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            receive_max_messages: MAX_BATCH_ENTRIES as i32,
            receive_wait_secs: 0,
        }
    }

    pub async fn from_config(cfg: &Config) -> Self {
        Self::new(create_sqs_client(cfg).await)
            .with_receive(cfg.receive_max_messages, cfg.receive_wait_secs)
    }

    /// Per-call receive limits; a non-zero wait enables long polling.
    pub fn with_receive(mut self, max_messages: i32, wait_secs: i32) -> Self {
        self.receive_max_messages = max_messages;
        self.receive_wait_secs = wait_secs;
        self
    }

    async fn send_message(
        &self,
        address: &QueueAddress,
        body: &str,
        delay_seconds: Option<i32>,
    ) -> Result<String, QueueError> {
        let out = self
            .client
            .send_message()
            .queue_url(address.as_str())
            .message_body(body)
            .set_delay_seconds(delay_seconds)
            .send()
            .await
            .map_err(transport)?;
        Ok(out.message_id().unwrap_or_default().to_string())
    }
}

#[async_trait::async_trait]
impl QueueClient for SqsQueue {
    async fn resolve_queue_address(&self, name: &str) -> Result<QueueAddress, QueueError> {
        let out = self
            .client
            .get_queue_url()
            .queue_name(name)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(se) if se.is_queue_does_not_exist() => QueueError::NotFound(name.to_string()),
                _ => transport(e),
            })?;

        match out.queue_url() {
            Some(url) if !url.is_empty() => Ok(QueueAddress::new(url)),
            _ => Err(QueueError::NotFound(name.to_string())),
        }
    }

    async fn send(&self, address: &QueueAddress, body: &str) -> Result<String, QueueError> {
        self.send_message(address, body, None).await
    }

    async fn send_with_delay(
        &self,
        address: &QueueAddress,
        body: &str,
        delay_seconds: i32,
    ) -> Result<String, QueueError> {
        validate_delay(delay_seconds)?;
        self.send_message(address, body, Some(delay_seconds)).await
    }

    async fn send_batch(
        &self,
        address: &QueueAddress,
        entries: &[OutboundEntry],
    ) -> Result<BatchOutcome, QueueError> {
        let mut outcome = BatchOutcome::default();
        for chunk in entries.chunks(MAX_BATCH_ENTRIES) {
            let request = chunk
                .iter()
                .map(|e| {
                    SendMessageBatchRequestEntry::builder()
                        .id(&e.id)
                        .message_body(&e.body)
                        .build()
                        .map_err(|err| QueueError::InvalidRequest(err.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let out = self
                .client
                .send_message_batch()
                .queue_url(address.as_str())
                .set_entries(Some(request))
                .send()
                .await
                .map_err(transport)?;

            debug!(
                entries = chunk.len(),
                failed = out.failed().len(),
                "send_message_batch call finished"
            );
            outcome.merge(BatchOutcome {
                successful: out.successful().iter().map(|s| s.id().to_string()).collect(),
                failed: out.failed().iter().map(entry_failure).collect(),
            });
        }
        Ok(outcome)
    }

    async fn receive(&self, address: &QueueAddress) -> Result<Vec<Notification>, QueueError> {
        let out = self
            .client
            .receive_message()
            .queue_url(address.as_str())
            .max_number_of_messages(self.receive_max_messages)
            .wait_time_seconds(self.receive_wait_secs)
            .send()
            .await
            .map_err(transport)?;
        Ok(out.messages().iter().map(notification_from_message).collect())
    }

    async fn delete_batch(
        &self,
        address: &QueueAddress,
        receipts: &[Receipt],
    ) -> Result<BatchOutcome, QueueError> {
        let mut outcome = BatchOutcome::default();
        for chunk in receipts.chunks(MAX_BATCH_ENTRIES) {
            let request = chunk
                .iter()
                .map(|r| {
                    DeleteMessageBatchRequestEntry::builder()
                        .id(&r.message_id)
                        .receipt_handle(&r.receipt_handle)
                        .build()
                        .map_err(|err| QueueError::InvalidRequest(err.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let out = self
                .client
                .delete_message_batch()
                .queue_url(address.as_str())
                .set_entries(Some(request))
                .send()
                .await
                .map_err(|e| QueueError::Acknowledgment(DisplayErrorContext(&e).to_string()))?;

            outcome.merge(BatchOutcome {
                successful: out.successful().iter().map(|s| s.id().to_string()).collect(),
                failed: out.failed().iter().map(entry_failure).collect(),
            });
        }
        Ok(outcome)
    }
}

/// Notifications carried by a Lambda SQS trigger event. Missing fields become
/// empty strings.
pub fn notifications_from_event(event: SqsEvent) -> Vec<Notification> {
    event.records.into_iter().map(notification_from_record).collect()
}

fn notification_from_record(record: SqsMessage) -> Notification {
    Notification {
        message_id: record.message_id.unwrap_or_default(),
        receipt_handle: record.receipt_handle.unwrap_or_default(),
        body: record.body.unwrap_or_default(),
    }
}

fn notification_from_message(msg: &Message) -> Notification {
    Notification {
        message_id: msg.message_id().unwrap_or_default().to_string(),
        receipt_handle: msg.receipt_handle().unwrap_or_default().to_string(),
        body: msg.body().unwrap_or_default().to_string(),
    }
}

fn entry_failure(e: &BatchResultErrorEntry) -> EntryFailure {
    EntryFailure {
        id: e.id().to_string(),
        code: e.code().to_string(),
        message: e.message().map(str::to_string),
        sender_fault: e.sender_fault(),
    }
}

fn transport<E, R>(e: SdkError<E, R>) -> QueueError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    QueueError::Transport(DisplayErrorContext(&e).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambda_records_become_notifications() {
        let mut first = SqsMessage::default();
        first.message_id = Some("m-1".into());
        first.receipt_handle = Some("rh-1".into());
        first.body = Some(r#"{"type":"cronjob","id":1,"value":"Value number 1"}"#.into());

        let mut event = SqsEvent::default();
        event.records = vec![first, SqsMessage::default()];

        let got = notifications_from_event(event);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].message_id, "m-1");
        assert_eq!(got[0].receipt_handle, "rh-1");
        assert!(got[0].body.contains("cronjob"));
        assert_eq!(got[1], Notification::default());
    }

    #[test]
    fn sdk_messages_become_notifications() {
        let msg = Message::builder()
            .message_id("m-2")
            .receipt_handle("rh-2")
            .body("{}")
            .build();
        let n = notification_from_message(&msg);
        assert_eq!(n.message_id, "m-2");
        assert_eq!(n.receipt_handle, "rh-2");
        assert_eq!(n.body, "{}");
    }
}
