//! Record and envelope model shared by the producer and the consumer.
//!
//! Outbound messages are a typed [`Envelope`]; inbound bodies decode straight
//! into the closed [`Inbound`] enumeration, with an explicit unknown variant
//! for discriminators this crate does not handle.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Discriminator written by the scheduled producer.
pub const CRONJOB_KIND: &str = "cronjob";

/// One synthetic row produced per scheduled run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub value: String,
}

impl Record {
    pub fn synthetic(id: i64) -> Self {
        Self {
            id,
            value: format!("Value number {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeKind {
    CronJob,
    Unknown(String),
}

impl EnvelopeKind {
    /// Case-insensitive match against the known discriminators.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(CRONJOB_KIND) {
            EnvelopeKind::CronJob
        } else {
            EnvelopeKind::Unknown(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EnvelopeKind::CronJob => CRONJOB_KIND,
            EnvelopeKind::Unknown(raw) => raw,
        }
    }
}

impl Serialize for EnvelopeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Wire form: `{"type": "...", "id": 0, "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub id: i64,
    pub value: String,
}

impl Envelope {
    pub fn cronjob(record: &Record) -> Self {
        Self {
            kind: EnvelopeKind::CronJob,
            id: record.id,
            value: record.value.clone(),
        }
    }
}

/// Decoded notification body.
///
/// Any JSON object is accepted. `id` and `value` are carried as-is and not
/// validated; a missing or non-string `type` lands in `Unknown`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub enum Inbound {
    CronJob {
        id: Option<i64>,
        value: Option<String>,
    },
    Unknown {
        kind: Option<String>,
    },
}

impl From<Map<String, Value>> for Inbound {
    fn from(mut fields: Map<String, Value>) -> Self {
        let kind = fields
            .get("type")
            .and_then(Value::as_str)
            .map(EnvelopeKind::parse);

        match kind {
            Some(EnvelopeKind::CronJob) => Inbound::CronJob {
                id: fields.get("id").and_then(Value::as_i64),
                value: match fields.remove("value") {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                },
            },
            Some(EnvelopeKind::Unknown(raw)) => Inbound::Unknown { kind: Some(raw) },
            None => Inbound::Unknown { kind: None },
        }
    }
}
