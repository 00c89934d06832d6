//! Observable worker events and the sink they are reported to.

use crate::errors::SqsWorkerError;
use crate::queue::Message;

/// Something the polling loop wants reported.
#[derive(Debug)]
pub enum WorkerEvent<'a> {
    MessageReceived(&'a Message),
    ReceiveFailed(&'a SqsWorkerError),
    /// The message is left on the queue for redelivery.
    HandlerFailed {
        message: &'a Message,
        error: &'a SqsWorkerError,
    },
    MessageDeleted(&'a Message),
    /// The message will be redelivered after its visibility timeout.
    DeleteFailed {
        message: &'a Message,
        error: &'a SqsWorkerError,
    },
    ShutdownRequested,
}

/// Destination for [`WorkerEvent`]s.
pub trait LogSink: Send + Sync {
    fn log(&self, event: WorkerEvent<'_>);
}

/// Reports events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, event: WorkerEvent<'_>) {
        match event {
            WorkerEvent::MessageReceived(message) => tracing::info!(
                message_id = message.message_id.as_deref().unwrap_or("unknown"),
                body = %message.body,
                "message received"
            ),
            WorkerEvent::ReceiveFailed(error) => {
                tracing::error!(error = %error, "receiving message failed")
            }
            WorkerEvent::HandlerFailed { message, error } => tracing::warn!(
                message_id = message.message_id.as_deref().unwrap_or("unknown"),
                error = %error,
                "handler failed, message left for redelivery"
            ),
            WorkerEvent::MessageDeleted(message) => tracing::debug!(
                message_id = message.message_id.as_deref().unwrap_or("unknown"),
                "message deleted"
            ),
            WorkerEvent::DeleteFailed { message, error } => tracing::error!(
                message_id = message.message_id.as_deref().unwrap_or("unknown"),
                error = %error,
                "deleting message failed, it will be redelivered"
            ),
            WorkerEvent::ShutdownRequested => tracing::info!("shutdown requested, polling stopped"),
        }
    }
}
