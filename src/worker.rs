use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::client::create_sqs_client_for_region;
use crate::errors::SqsWorkerError;
use crate::log::{LogSink, TracingLogSink, WorkerEvent};
use crate::queue::{QueueClient, SqsQueueClient};

pub mod config;
mod handler;

pub use config::WorkerConfig;
pub use handler::{FnHandler, MessageHandler, SharedFnHandler, handler_fn, handler_fn_with_shared};

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No message was visible.
    Empty,
    /// The receive call failed; nothing was processed.
    ReceiveFailed,
    /// The handler returned an error; the message was not deleted.
    HandlerFailed,
    /// The handler succeeded and the message was deleted.
    Processed,
    /// The handler succeeded but the delete failed, so the message will be
    /// delivered again.
    DeleteFailed,
}

/// Polls a queue one message at a time.
///
/// Each cycle waits out the poll interval, receives at most one message,
/// runs the handler on its payload and deletes the message only after the
/// handler returned `Ok`. At most one message is in flight per worker.
///
/// Failures never stop the loop. A message that is not deleted, whether
/// because the handler failed or the delete call did, becomes visible again
/// after its visibility timeout and is redelivered.
pub struct PollingWorker<Q, H> {
    queue_client: Q,
    handler: H,
    config: WorkerConfig,
    log_sink: Arc<dyn LogSink>,
}

impl<H> PollingWorker<SqsQueueClient, H>
where
    H: MessageHandler,
{
    /// Establishes an SQS session for `config` and builds a worker on it.
    ///
    /// # Errors
    ///
    /// Returns [`SqsWorkerError::SessionError`] when the session cannot be
    /// established and [`SqsWorkerError::InvalidConfig`] when a timing setting
    /// is out of range. Both are logged.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use sqs_worker::worker::{PollingWorker, WorkerConfig, handler_fn};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), sqs_worker::errors::SqsWorkerError> {
    ///     let config = WorkerConfig::new(
    ///         "https://sqs.eu-central-1.amazonaws.com/123456789012/jobs",
    ///         "eu-central-1",
    ///     )
    ///     .with_poll_interval(Duration::from_secs(5));
    ///
    ///     let worker = PollingWorker::connect(
    ///         config,
    ///         handler_fn(|payload: String| async move {
    ///             println!("{payload}");
    ///             Ok(())
    ///         }),
    ///     )
    ///     .await?;
    ///
    ///     worker.start_polling().await;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: WorkerConfig, handler: H) -> Result<Self, SqsWorkerError> {
        let sqs_client =
            create_sqs_client_for_region(&config.region, config.endpoint_url.as_deref())
                .await
                .inspect_err(|e| {
                    tracing::error!(region = %config.region, error = %e, "failed to create session")
                })?;

        let queue_client = SqsQueueClient::new(sqs_client, &config)
            .inspect_err(|e| tracing::error!(error = %e, "rejected worker configuration"))?;

        Ok(PollingWorker::new(queue_client, handler, config))
    }
}

impl<Q, H> PollingWorker<Q, H>
where
    Q: QueueClient,
    H: MessageHandler,
{
    /// Builds a worker on any [`QueueClient`]. Events go to [`TracingLogSink`]
    /// until [`with_log_sink`](Self::with_log_sink) replaces it.
    pub fn new(queue_client: Q, handler: H, config: WorkerConfig) -> Self {
        PollingWorker {
            queue_client,
            handler,
            config,
            log_sink: Arc::new(TracingLogSink),
        }
    }

    pub fn with_log_sink(mut self, log_sink: impl LogSink + 'static) -> Self {
        self.log_sink = Arc::new(log_sink);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn queue_client(&self) -> &Q {
        &self.queue_client
    }

    /// Polls forever. Never returns.
    pub async fn start_polling(&self) {
        self.run_until(futures::future::pending()).await
    }

    /// Polls until `shutdown` receives a value or its sender is dropped.
    pub async fn start_polling_with_shutdown(&self, shutdown: oneshot::Receiver<()>) {
        self.run_until(async {
            let _ = shutdown.await;
        })
        .await
    }

    /// Polls until `shutdown` completes.
    ///
    /// Shutdown is only observed while idling between cycles, so a message
    /// that has been received is always handled and deleted (or left for
    /// redelivery) before this returns.
    pub async fn run_until<S>(&self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    self.log_sink.log(WorkerEvent::ShutdownRequested);
                    return;
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            self.poll_once().await;
        }
    }

    /// Runs one receive, handle, delete cycle without waiting first.
    pub async fn poll_once(&self) -> PollOutcome {
        let message = match self.queue_client.receive_one().await {
            Ok(Some(message)) => message,
            Ok(None) => return PollOutcome::Empty,
            Err(error) => {
                self.log_sink.log(WorkerEvent::ReceiveFailed(&error));
                return PollOutcome::ReceiveFailed;
            }
        };

        self.log_sink.log(WorkerEvent::MessageReceived(&message));

        if let Err(error) = self.handler.handle(message.body.clone()).await {
            self.log_sink.log(WorkerEvent::HandlerFailed {
                message: &message,
                error: &error,
            });
            return PollOutcome::HandlerFailed;
        }

        match self.queue_client.delete(&message.receipt_handle).await {
            Ok(()) => {
                self.log_sink.log(WorkerEvent::MessageDeleted(&message));
                PollOutcome::Processed
            }
            Err(error) => {
                self.log_sink.log(WorkerEvent::DeleteFailed {
                    message: &message,
                    error: &error,
                });
                PollOutcome::DeleteFailed
            }
        }
    }

    /// Enqueues `payload` on the worker's queue and returns its message id.
    ///
    /// Independent of the polling loop; errors are returned, not logged.
    pub async fn send_message(&self, payload: &str) -> Result<String, SqsWorkerError> {
        self.queue_client.send(payload).await
    }
}
