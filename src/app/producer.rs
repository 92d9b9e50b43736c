//! Scheduled producer: synthetic dataset → envelopes → bounded batches.

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::emit::Batch;
use crate::errors::QueueError;
use crate::ingest::{QueueAddress, QueueClient};
use crate::transform::encode::encode_record_entry;
use crate::types::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    pub records: usize,
    pub flushes: usize,
    /// Entries the service rejected individually. Reported only.
    pub rejected: usize,
}

/// Records `{id: i, value: "Value number i"}` for i in `0..count`.
pub fn generate_records(count: usize) -> Vec<Record> {
    (0..count as i64).map(Record::synthetic).collect()
}

/// One scheduled run: generate, resolve the queue once, publish.
#[instrument(skip_all, fields(queue = %cfg.queue_name))]
pub async fn run<Q: QueueClient>(queue: &Q, cfg: &Config) -> Result<ProducerReport, QueueError> {
    let records = generate_records(cfg.dataset_size);
    let address = queue.resolve_queue_address(&cfg.queue_name).await?;
    let report = publish_records(queue, &address, &records, cfg.batch_max).await?;
    info!(
        records = report.records,
        flushes = report.flushes,
        rejected = report.rejected,
        "producer run finished"
    );
    Ok(report)
}

/// Fill a batch in record order and flush it when it is full or the last
/// record was added. Stops at the first encode or send error; batches already
/// sent stay sent.
pub async fn publish_records<Q: QueueClient>(
    queue: &Q,
    address: &QueueAddress,
    records: &[Record],
    batch_max: usize,
) -> Result<ProducerReport, QueueError> {
    let mut batch = Batch::with_capacity(batch_max)?;
    let mut report = ProducerReport {
        records: records.len(),
        ..ProducerReport::default()
    };

    let last = records.len().saturating_sub(1);
    for (i, record) in records.iter().enumerate() {
        batch.push(encode_record_entry(record)?);

        if batch.should_flush(i == last) {
            let outcome = queue.send_batch(address, batch.entries()).await?;
            report.flushes += 1;
            debug!(flush = report.flushes, entries = batch.len(), "batch flushed");

            if outcome.has_failures() {
                report.rejected += outcome.failed.len();
                for f in &outcome.failed {
                    warn!(entry = %f.id, code = %f.code, sender_fault = f.sender_fault, "batch entry rejected");
                }
            }
            batch.reset();
        }
    }

    Ok(report)
}
