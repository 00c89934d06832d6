//! Polls a queue every five seconds and prints each payload.
//!
//! ```bash
//! SQS_WORKER_QUEUE_URL=https://sqs.eu-central-1.amazonaws.com/123456789012/test-queue-one \
//! AWS_REGION=eu-central-1 RUST_LOG=info cargo run --example poll
//! ```

use sqs_worker::worker::{PollingWorker, WorkerConfig, handler_fn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = WorkerConfig::from_env()?;

    let worker = PollingWorker::connect(
        config,
        handler_fn(|payload: String| async move {
            println!("{payload}");
            Ok(())
        }),
    )
    .await?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    worker.start_polling_with_shutdown(shutdown_rx).await;
    Ok(())
}
