//! Queue-triggered consumer: decode, dispatch, acknowledge in one batch.

use tracing::{debug, error, info, instrument, warn};

use crate::errors::QueueError;
use crate::ingest::{Notification, QueueClient, Receipt};
use crate::transform::decode::decode_envelope;
use crate::types::Inbound;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Notifications that hit a known processing branch.
    pub processed: usize,
    /// Notifications with an unknown or missing discriminator.
    pub ignored: usize,
    /// Receipts included in the delete batch.
    pub acknowledged: usize,
}

/// Handle one delivery. Any undecodable body fails the whole delivery before
/// anything is acknowledged. Every decoded notification is acknowledged,
/// whichever branch it took, with a single delete-batch call.
#[instrument(skip_all, fields(queue = %queue_name, count = notifications.len()))]
pub async fn handle<Q: QueueClient>(
    queue: &Q,
    queue_name: &str,
    notifications: &[Notification],
) -> Result<ConsumerReport, QueueError> {
    if notifications.is_empty() {
        info!("no message in queue");
        return Ok(ConsumerReport::default());
    }

    let mut report = ConsumerReport::default();
    let mut receipts: Vec<Receipt> = Vec::with_capacity(notifications.len());

    for n in notifications {
        let inbound = decode_envelope(&n.body).map_err(|e| {
            error!(message_id = %n.message_id, err = %e, "failed to decode notification body");
            e
        })?;

        if dispatch(&n.message_id, &inbound) {
            report.processed += 1;
        } else {
            report.ignored += 1;
        }
        receipts.push(n.receipt());
    }

    let address = queue.resolve_queue_address(queue_name).await?;
    let outcome = queue.delete_batch(&address, &receipts).await.map_err(|e| {
        error!(err = %e, "failed to delete message batch");
        match e {
            QueueError::Acknowledgment(_) => e,
            other => QueueError::Acknowledgment(other.to_string()),
        }
    })?;

    // Not retried; the queue's redelivery policy owns these.
    for f in &outcome.failed {
        warn!(message_id = %f.id, code = %f.code, "message not acknowledged");
    }

    report.acknowledged = receipts.len();
    info!(
        processed = report.processed,
        ignored = report.ignored,
        acknowledged = report.acknowledged,
        "consumer run finished"
    );
    Ok(report)
}

/// Returns whether a processing branch ran.
fn dispatch(message_id: &str, inbound: &Inbound) -> bool {
    match inbound {
        Inbound::CronJob { id, value } => {
            process_cronjob(message_id, *id, value.as_deref());
            true
        }
        Inbound::Unknown { kind } => {
            debug!(message_id, kind = ?kind, "no handler for message kind");
            false
        }
    }
}

// Placeholder branch. `id`/`value` must be validated here once real work
// is attached.
fn process_cronjob(message_id: &str, id: Option<i64>, value: Option<&str>) {
    debug!(message_id, id = ?id, value = ?value, "processing cronjob message");
}
