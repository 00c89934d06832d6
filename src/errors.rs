use thiserror::Error;

/// Error types for SQS worker operations.
///
/// Receiving an empty queue is not an error: [`QueueClient::receive_one`]
/// returns `Ok(None)` for that case.
///
/// [`QueueClient::receive_one`]: crate::queue::QueueClient::receive_one
#[derive(Debug, Error)]
pub enum SqsWorkerError {
    /// The queue session could not be established.
    ///
    /// This happens when the region cannot be resolved or the AWS
    /// configuration is unusable. The worker is never built in this case.
    #[error("failed to establish SQS session: {0}")]
    SessionError(String),

    /// A tunable is outside the range the queue service accepts.
    #[error("invalid worker configuration: {0}")]
    InvalidConfig(String),

    /// The receive call failed at the transport or service level.
    #[error("failed to receive message: {0}")]
    ReceiveError(String),

    /// The delete call failed. The message stays on the queue and is
    /// redelivered once its visibility timeout expires.
    #[error("failed to delete message: {0}")]
    DeleteError(String),

    /// The send call failed.
    #[error("failed to send message: {0}")]
    SendError(String),

    /// The handler reported that it could not process the payload.
    #[error("handler failed: {0}")]
    HandlerError(#[from] GenericError),
}

/// Failure reported by a message handler.
///
/// Converts into [`SqsWorkerError::HandlerError`], so handlers can use `?`
/// on any `Result<_, GenericError>`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GenericError(String);

impl From<String> for GenericError {
    fn from(message: String) -> Self {
        GenericError(message)
    }
}

impl From<&str> for GenericError {
    fn from(message: &str) -> Self {
        GenericError(message.to_string())
    }
}
