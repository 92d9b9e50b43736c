//! Envelope encoding (JSON)
//!
//! Overview
//! --------
//! Serializes outbound envelopes into the message body sent to the queue.
//! The structured envelope is encoded exactly once; bodies are never wrapped
//! in a second JSON string layer.

use crate::{
    errors::QueueError,
    ingest::OutboundEntry,
    types::{Envelope, Record},
};

pub fn encode_envelope(envelope: &Envelope) -> Result<String, QueueError> {
    serde_json::to_string(envelope).map_err(|e| QueueError::Serialization(e.to_string()))
}

/// Batch entry for one record. The entry id is the record id, which is
/// unique within any batch built from one dataset.
pub fn encode_record_entry(record: &Record) -> Result<OutboundEntry, QueueError> {
    let body = encode_envelope(&Envelope::cronjob(record))?;
    Ok(OutboundEntry {
        id: record.id.to_string(),
        body,
    })
}
