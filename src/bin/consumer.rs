//! sqs-batch-pipeline: queue-triggered consumer entrypoint
//!
//! Receives the SQS trigger event, runs one consumer pass over its records,
//! and acknowledges them with a single delete batch. Returns `"OK"` or fails
//! with `ERROR: ...`; on failure the queue redelivers per its own policy.

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use tracing::info;

use sqs_batch_pipeline::app::consumer::{self, ConsumerReport};
use sqs_batch_pipeline::app::into_outcome;
use sqs_batch_pipeline::config::load_config;
use sqs_batch_pipeline::errors::QueueError;
use sqs_batch_pipeline::ingest::Notification;
use sqs_batch_pipeline::sqs::{notifications_from_event, SqsQueue};
use sqs_batch_pipeline::util::logging::init_logging;

async fn handler(event: LambdaEvent<SqsEvent>) -> Result<&'static str, Error> {
    let (payload, context) = event.into_parts();
    let notifications = notifications_from_event(payload);
    info!(request_id = %context.request_id, count = notifications.len(), "consumer invoked");
    Ok(into_outcome(run_once(&notifications).await)?)
}

async fn run_once(notifications: &[Notification]) -> Result<ConsumerReport, QueueError> {
    let cfg = load_config()?;
    let queue = SqsQueue::from_config(&cfg).await;
    consumer::handle(&queue, &cfg.queue_name, notifications).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    lambda_runtime::run(service_fn(handler)).await
}
