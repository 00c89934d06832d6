//! # SQS Worker
//!
//! A long-running worker that polls an AWS SQS queue one message at a time,
//! hands each payload to a handler and deletes the message once the handler
//! succeeds.
//!
//! ## Features
//!
//! - Fixed-interval polling with tokio, one message in flight at a time
//! - Delete only after the handler returned `Ok`; failures fall back to SQS redelivery
//! - Receive, handler and delete failures are logged and never stop the loop
//! - Cooperative shutdown between poll cycles
//! - Pluggable [`QueueClient`](queue::QueueClient) and [`LogSink`](log::LogSink)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_worker::worker::{PollingWorker, WorkerConfig, handler_fn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WorkerConfig::from_env()?;
//!
//!     let worker = PollingWorker::connect(
//!         config,
//!         handler_fn(|payload: String| async move {
//!             println!("Processing message: {}", payload);
//!             Ok(())
//!         }),
//!     )
//!     .await?;
//!
//!     let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         let _ = shutdown_tx.send(());
//!     });
//!
//!     worker.start_polling_with_shutdown(shutdown_rx).await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;
pub mod log;
pub mod queue;
pub mod worker;
