//! sqs-batch-pipeline: scheduled producer entrypoint
//!
//! Invoked by a time-based scheduler with no meaningful payload. Each
//! invocation loads configuration, builds a fresh SQS client, and runs one
//! producer pass. Returns `"OK"` or fails with `ERROR: ...`.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use sqs_batch_pipeline::app::producer::{self, ProducerReport};
use sqs_batch_pipeline::app::into_outcome;
use sqs_batch_pipeline::config::load_config;
use sqs_batch_pipeline::errors::QueueError;
use sqs_batch_pipeline::sqs::SqsQueue;
use sqs_batch_pipeline::util::logging::init_logging;

async fn handler(event: LambdaEvent<Value>) -> Result<&'static str, Error> {
    info!(request_id = %event.context.request_id, "producer invoked");
    Ok(into_outcome(run_once().await)?)
}

async fn run_once() -> Result<ProducerReport, QueueError> {
    let cfg = load_config()?;
    let queue = SqsQueue::from_config(&cfg).await;
    producer::run(&queue, &cfg).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();
    lambda_runtime::run(service_fn(handler)).await
}
