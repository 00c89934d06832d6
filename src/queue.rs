//! Transport-level access to the queue service.
//!
//! [`QueueClient`] is the narrow seam the polling loop depends on. It maps
//! three logical operations onto queue-service calls and nothing more: no
//! retries, no interpretation of failures beyond telling "no message" apart
//! from "the call failed".

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::MessageSystemAttributeName;

use crate::errors::SqsWorkerError;
use crate::worker::config::WorkerConfig;

/// SQS accepts visibility timeouts up to 12 hours.
const MAX_VISIBILITY_TIMEOUT_SECONDS: i32 = 43_200;
const MAX_WAIT_TIME_SECONDS: i32 = 20;
const MAX_DELAY_SECONDS: i32 = 900;

/// A message received from the queue.
///
/// Lives from receipt until it is deleted or dropped. The receipt handle only
/// identifies this delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub body: String,
    pub receipt_handle: String,
    pub message_id: Option<String>,
    /// System attributes such as `ApproximateReceiveCount`.
    pub attributes: HashMap<String, String>,
    /// String-valued user attributes.
    pub message_attributes: HashMap<String, String>,
}

impl Message {
    pub fn new(body: impl Into<String>, receipt_handle: impl Into<String>) -> Self {
        Message {
            body: body.into(),
            receipt_handle: receipt_handle.into(),
            message_id: None,
            attributes: HashMap::new(),
            message_attributes: HashMap::new(),
        }
    }
}

/// Queue operations needed by the worker and by producers.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Receives at most one message.
    ///
    /// Returns `Ok(None)` when no message is currently visible.
    async fn receive_one(&self) -> Result<Option<Message>, SqsWorkerError>;

    /// Deletes the delivery identified by `receipt_handle`.
    async fn delete(&self, receipt_handle: &str) -> Result<(), SqsWorkerError>;

    /// Enqueues `payload` and returns the id assigned by the queue service.
    async fn send(&self, payload: &str) -> Result<String, SqsWorkerError>;
}

/// [`QueueClient`] backed by the AWS SQS API.
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    sqs_client: aws_sdk_sqs::Client,
    queue_url: String,
    visibility_timeout_seconds: i32,
    wait_time_seconds: i32,
    send_delay_seconds: i32,
}

impl SqsQueueClient {
    /// Binds `sqs_client` to the queue and timing settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SqsWorkerError::InvalidConfig`] if the queue URL is empty or
    /// a timing setting is outside the range SQS accepts.
    pub fn new(
        sqs_client: aws_sdk_sqs::Client,
        config: &WorkerConfig,
    ) -> Result<Self, SqsWorkerError> {
        if config.queue_url.trim().is_empty() {
            return Err(SqsWorkerError::InvalidConfig(
                "queue_url must not be empty".to_string(),
            ));
        }
        check_range(
            "visibility_timeout_seconds",
            config.visibility_timeout_seconds,
            MAX_VISIBILITY_TIMEOUT_SECONDS,
        )?;
        check_range(
            "wait_time_seconds",
            config.wait_time_seconds,
            MAX_WAIT_TIME_SECONDS,
        )?;
        check_range(
            "send_delay_seconds",
            config.send_delay_seconds,
            MAX_DELAY_SECONDS,
        )?;

        Ok(SqsQueueClient {
            sqs_client,
            queue_url: config.queue_url.clone(),
            visibility_timeout_seconds: config.visibility_timeout_seconds,
            wait_time_seconds: config.wait_time_seconds,
            send_delay_seconds: config.send_delay_seconds,
        })
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn receive_one(&self) -> Result<Option<Message>, SqsWorkerError> {
        let output = self
            .sqs_client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(1)
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .message_attribute_names("All")
            .visibility_timeout(self.visibility_timeout_seconds)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await
            .map_err(|e| SqsWorkerError::ReceiveError(DisplayErrorContext(e).to_string()))?;

        let Some(message) = output.messages().first() else {
            return Ok(None);
        };

        let receipt_handle = message.receipt_handle().ok_or_else(|| {
            SqsWorkerError::ReceiveError("received a message without a receipt handle".to_string())
        })?;

        let attributes = message
            .attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let message_attributes = message
            .message_attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .filter_map(|(name, value)| {
                        value.string_value().map(|v| (name.clone(), v.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(Message {
            body: message.body().unwrap_or_default().to_string(),
            receipt_handle: receipt_handle.to_string(),
            message_id: message.message_id().map(str::to_string),
            attributes,
            message_attributes,
        }))
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), SqsWorkerError> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| SqsWorkerError::DeleteError(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }

    async fn send(&self, payload: &str) -> Result<String, SqsWorkerError> {
        let output = self
            .sqs_client
            .send_message()
            .queue_url(&self.queue_url)
            .delay_seconds(self.send_delay_seconds)
            .message_body(payload)
            .send()
            .await
            .map_err(|e| SqsWorkerError::SendError(DisplayErrorContext(e).to_string()))?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}

fn check_range(name: &str, value: i32, max: i32) -> Result<(), SqsWorkerError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(SqsWorkerError::InvalidConfig(format!(
            "{name} must be between 0 and {max}, got {value}"
        )))
    }
}
