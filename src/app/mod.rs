//! Job runtime: the producer and consumer passes plus the outcome mapping
//! shared by every entrypoint.

pub mod consumer;
pub mod producer;

use crate::errors::{JobFailure, QueueError};

/// Status string returned to the platform on success.
pub const STATUS_OK: &str = "OK";

/// Collapse a job result into the invocation outcome: `"OK"` or a
/// [`JobFailure`] rendered as `ERROR: ...`.
pub fn into_outcome<T>(result: Result<T, QueueError>) -> Result<&'static str, JobFailure> {
    match result {
        Ok(_) => Ok(STATUS_OK),
        Err(e) => {
            tracing::error!(err = %e, "invocation failed");
            Err(JobFailure::from(e))
        }
    }
}
