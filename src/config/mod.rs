use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::QueueError;
use crate::ingest::MAX_BATCH_ENTRIES;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_DATASET_SIZE: usize = 100;
const MAX_RECEIVE_WAIT_SECS: i32 = 20;
const IDLE_POLL_PAUSE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct Config {
    pub queue_name: String,
    pub aws_region: String,
    /// Endpoint override for local queue emulators.
    pub endpoint_url: Option<String>,
    pub batch_max: usize,
    pub dataset_size: usize,
    pub receive_max_messages: i32,
    pub receive_wait_secs: i32,
    pub drain_until_empty: bool,
}

pub fn load_config() -> Result<Config, QueueError> {
    dotenv().ok();
    Config::from_lookup(|key| env::var(key).ok())
}

impl Config {
    /// Build from any key lookup; `load_config` feeds it the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QueueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let queue_name = lookup("SQS_QUEUE_NAME")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| QueueError::Config("SQS_QUEUE_NAME is not set".into()))?;
        let aws_region = lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.into());
        let endpoint_url = lookup("SQS_ENDPOINT_URL").filter(|v| !v.trim().is_empty());

        let batch_max = parse_or(&lookup, "SQS_BATCH_MAX", MAX_BATCH_ENTRIES)?;
        if !(1..=MAX_BATCH_ENTRIES).contains(&batch_max) {
            return Err(QueueError::Config(format!(
                "SQS_BATCH_MAX must be within 1..={MAX_BATCH_ENTRIES}, got {batch_max}"
            )));
        }

        let dataset_size = parse_or(&lookup, "CRONJOB_DATASET_SIZE", DEFAULT_DATASET_SIZE)?;

        let receive_max_messages =
            parse_or(&lookup, "SQS_RECEIVE_MAX_MESSAGES", MAX_BATCH_ENTRIES as i32)?;
        if !(1..=MAX_BATCH_ENTRIES as i32).contains(&receive_max_messages) {
            return Err(QueueError::Config(format!(
                "SQS_RECEIVE_MAX_MESSAGES must be within 1..={MAX_BATCH_ENTRIES}, got {receive_max_messages}"
            )));
        }

        let receive_wait_secs = parse_or(&lookup, "SQS_RECEIVE_WAIT_SECS", 0)?;
        if !(0..=MAX_RECEIVE_WAIT_SECS).contains(&receive_wait_secs) {
            return Err(QueueError::Config(format!(
                "SQS_RECEIVE_WAIT_SECS must be within 0..={MAX_RECEIVE_WAIT_SECS}, got {receive_wait_secs}"
            )));
        }

        let drain_until_empty = parse_or(&lookup, "DRAIN_UNTIL_EMPTY", true)?;

        Ok(Config {
            queue_name,
            aws_region,
            endpoint_url,
            batch_max,
            dataset_size,
            receive_max_messages,
            receive_wait_secs,
            drain_until_empty,
        })
    }

    /// Pause after an empty receive. Long polling already waits inside the
    /// call; short polling needs a pause or an idle queue is hammered.
    pub fn idle_pause(&self) -> Option<Duration> {
        (self.receive_wait_secs == 0).then_some(IDLE_POLL_PAUSE)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, QueueError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| QueueError::Config(format!("{key}={raw:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup_from(&[("SQS_QUEUE_NAME", "jobs")])).unwrap();
        assert_eq!(cfg.queue_name, "jobs");
        assert_eq!(cfg.aws_region, "us-east-1");
        assert_eq!(cfg.batch_max, 10);
        assert_eq!(cfg.dataset_size, 100);
        assert_eq!(cfg.receive_max_messages, 10);
        assert_eq!(cfg.receive_wait_secs, 0);
        assert!(cfg.drain_until_empty);
        assert!(cfg.endpoint_url.is_none());
    }

    #[test]
    fn queue_name_is_required() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, QueueError::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("SQS_QUEUE_NAME", "  ")])).unwrap_err();
        assert!(matches!(err, QueueError::Config(_)));
    }

    #[test]
    fn batch_max_over_service_limit_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("SQS_QUEUE_NAME", "jobs"),
            ("SQS_BATCH_MAX", "11"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SQS_BATCH_MAX"));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("SQS_QUEUE_NAME", "jobs"),
            ("AWS_REGION", "eu-west-1"),
            ("SQS_ENDPOINT_URL", "http://localhost:9324"),
            ("SQS_BATCH_MAX", "3"),
            ("CRONJOB_DATASET_SIZE", "7"),
            ("SQS_RECEIVE_WAIT_SECS", "20"),
            ("DRAIN_UNTIL_EMPTY", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.aws_region, "eu-west-1");
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://localhost:9324"));
        assert_eq!(cfg.batch_max, 3);
        assert_eq!(cfg.dataset_size, 7);
        assert_eq!(cfg.receive_wait_secs, 20);
        assert!(!cfg.drain_until_empty);
    }

    #[test]
    fn short_polling_pauses_when_idle() {
        let short = Config::from_lookup(lookup_from(&[("SQS_QUEUE_NAME", "jobs")])).unwrap();
        assert_eq!(short.idle_pause(), Some(Duration::from_millis(200)));

        let long = Config::from_lookup(lookup_from(&[
            ("SQS_QUEUE_NAME", "jobs"),
            ("SQS_RECEIVE_WAIT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(long.idle_pause(), None);
    }

    #[test]
    fn garbage_number_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[
            ("SQS_QUEUE_NAME", "jobs"),
            ("CRONJOB_DATASET_SIZE", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CRONJOB_DATASET_SIZE"));
    }
}
