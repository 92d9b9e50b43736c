use crate::{errors::QueueError, types::Inbound};

pub fn decode_envelope(body: &str) -> Result<Inbound, QueueError> {
    serde_json::from_str(body).map_err(|e| QueueError::Deserialization(e.to_string()))
}
