//! sqs-batch-pipeline: polling drain worker
//!
//! Runs the consumer pass outside Lambda: receive a batch, decode, dispatch,
//! acknowledge, repeat. Stops on Ctrl-C, or on the first empty receive when
//! `DRAIN_UNTIL_EMPTY` is set (the default).
//!
//! Error Model
//! -----------
//! - Configuration and queue resolution failures are fatal.
//! - Per-batch failures are logged; the loop pauses briefly and continues.

use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use sqs_batch_pipeline::app::consumer;
use sqs_batch_pipeline::config::{load_config, Config};
use sqs_batch_pipeline::ingest::{QueueAddress, QueueClient};
use sqs_batch_pipeline::sqs::SqsQueue;
use sqs_batch_pipeline::util::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    info!("drain starting");

    let cfg = load_config().context("failed to load config")?;
    let queue = SqsQueue::from_config(&cfg).await;
    let address = queue
        .resolve_queue_address(&cfg.queue_name)
        .await
        .context("failed to resolve queue")?;

    tokio::select! {
        _ = run_loop(&queue, &address, &cfg) => {},
        _ = signal::ctrl_c() => {
            info!("shutdown requested");
        }
    }

    Ok(())
}

async fn run_loop(queue: &SqsQueue, address: &QueueAddress, cfg: &Config) {
    let mut acknowledged = 0usize;
    loop {
        let batch = match queue.receive(address).await {
            Ok(v) => v,
            Err(e) => {
                error!(err = %e, "receive failed");
                tokio::time::sleep(Duration::from_millis(200)).await;
                continue;
            }
        };

        if batch.is_empty() {
            if cfg.drain_until_empty {
                info!(acknowledged, "queue drained");
                return;
            }
            if let Some(pause) = cfg.idle_pause() {
                tokio::time::sleep(pause).await;
            }
            continue;
        }

        match consumer::handle(queue, &cfg.queue_name, &batch).await {
            Ok(report) => acknowledged += report.acknowledged,
            Err(e) => {
                error!(count = batch.len(), err = %e, "batch failed");
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }
    }
}
