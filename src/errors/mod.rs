//! Error types for sqs-batch-pipeline
//!
//! Overview
//! --------
//! Canonical error enumeration shared by the queue adapter, the envelope
//! codec, and both jobs. Third-party errors (AWS SDK, serde_json) are mapped
//! into these variants at module boundaries and never leak past them.
//!
//! Propagation
//! -----------
//! - Every variant aborts the current invocation; nothing here is retried.
//! - The Lambda surface wraps the error in [`JobFailure`], whose Display is
//!   the `ERROR: ...` string returned to the platform.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// Network, auth, or service-side failure talking to the queue.
    #[error("Queue transport error: {0}")]
    Transport(String),

    /// The logical queue name did not resolve to an address.
    #[error("Queue not found: {0}")]
    NotFound(String),

    /// An outbound envelope could not be serialized.
    #[error("Envelope serialization error: {0}")]
    Serialization(String),

    /// An inbound notification body was not a well-formed envelope.
    #[error("Envelope deserialization error: {0}")]
    Deserialization(String),

    /// The delete-batch acknowledgment call failed as a whole.
    #[error("Acknowledgment failed: {0}")]
    Acknowledgment(String),

    /// Request rejected locally before reaching the service.
    #[error("Invalid queue request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Invocation-level failure reported back to the Lambda runtime.
#[derive(Error, Debug)]
#[error("ERROR: {0}")]
pub struct JobFailure(#[from] pub QueueError);
