use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::SqsWorkerError;

/// Configuration for a [`PollingWorker`](crate::worker::PollingWorker).
///
/// Immutable once the worker is built from it.
///
/// # Fields
/// - `queue_url`: The URL of the queue to poll.
/// - `region`: The AWS region the queue lives in.
/// - `endpoint_url`: Optional endpoint override for SQS-compatible services.
/// - `poll_interval`: How long the worker idles before each receive.
/// - `visibility_timeout_seconds`: How long a received message stays hidden.
/// - `wait_time_seconds`: The long-polling wait of each receive call.
/// - `send_delay_seconds`: The delivery delay applied to sent messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub queue_url: String,

    pub region: String,

    pub endpoint_url: Option<String>,

    pub poll_interval: Duration,

    /// Keep this comfortably above the handler's expected latency, otherwise
    /// the message becomes visible again while it is still being processed.
    pub visibility_timeout_seconds: i32,

    pub wait_time_seconds: i32,

    pub send_delay_seconds: i32,
}

impl WorkerConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_VISIBILITY_TIMEOUT_SECONDS: i32 = 30;
    pub const DEFAULT_WAIT_TIME_SECONDS: i32 = 1;
    pub const DEFAULT_SEND_DELAY_SECONDS: i32 = 1;

    /// Creates a configuration for `queue_url` in `region` with default timings.
    pub fn new(queue_url: impl Into<String>, region: impl Into<String>) -> Self {
        WorkerConfig {
            queue_url: queue_url.into(),
            region: region.into(),
            endpoint_url: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            visibility_timeout_seconds: Self::DEFAULT_VISIBILITY_TIMEOUT_SECONDS,
            wait_time_seconds: Self::DEFAULT_WAIT_TIME_SECONDS,
            send_delay_seconds: Self::DEFAULT_SEND_DELAY_SECONDS,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `SQS_WORKER_QUEUE_URL` (required) | `queue_url` |
    /// | `AWS_REGION`, then `AWS_DEFAULT_REGION` (required) | `region` |
    /// | `SQS_WORKER_ENDPOINT_URL` | `endpoint_url` |
    /// | `SQS_WORKER_POLL_INTERVAL_MS` | `poll_interval` |
    /// | `SQS_WORKER_VISIBILITY_TIMEOUT` | `visibility_timeout_seconds` |
    /// | `SQS_WORKER_WAIT_TIME` | `wait_time_seconds` |
    /// | `SQS_WORKER_SEND_DELAY` | `send_delay_seconds` |
    pub fn from_env() -> Result<Self, SqsWorkerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SqsWorkerError> {
        let queue_url = lookup("SQS_WORKER_QUEUE_URL").ok_or_else(|| {
            SqsWorkerError::InvalidConfig("SQS_WORKER_QUEUE_URL is not set".to_string())
        })?;
        let region = lookup("AWS_REGION")
            .or_else(|| lookup("AWS_DEFAULT_REGION"))
            .ok_or_else(|| {
                SqsWorkerError::InvalidConfig(
                    "neither AWS_REGION nor AWS_DEFAULT_REGION is set".to_string(),
                )
            })?;

        let mut config = WorkerConfig::new(queue_url, region);
        config.endpoint_url = lookup("SQS_WORKER_ENDPOINT_URL");

        if let Some(ms) = parse_var::<u64, _>(&lookup, "SQS_WORKER_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var(&lookup, "SQS_WORKER_VISIBILITY_TIMEOUT")? {
            config.visibility_timeout_seconds = secs;
        }
        if let Some(secs) = parse_var(&lookup, "SQS_WORKER_WAIT_TIME")? {
            config.wait_time_seconds = secs;
        }
        if let Some(secs) = parse_var(&lookup, "SQS_WORKER_SEND_DELAY")? {
            config.send_delay_seconds = secs;
        }

        Ok(config)
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_visibility_timeout_seconds(mut self, seconds: i32) -> Self {
        self.visibility_timeout_seconds = seconds;
        self
    }

    pub fn with_wait_time_seconds(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds;
        self
    }

    pub fn with_send_delay_seconds(mut self, seconds: i32) -> Self {
        self.send_delay_seconds = seconds;
        self
    }
}

fn parse_var<T, L>(lookup: &L, key: &str) -> Result<Option<T>, SqsWorkerError>
where
    T: FromStr,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            SqsWorkerError::InvalidConfig(format!("{key} has an invalid value: {raw:?}"))
        }),
    }
}
