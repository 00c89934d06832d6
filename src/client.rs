use aws_config::Region;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};

use crate::errors::SqsWorkerError;

/// Creates an AWS SQS client pinned to `region`, taking credentials from the
/// default provider chain (`AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`,
/// `AWS_PROFILE`, instance metadata, ...).
///
/// `endpoint_url` overrides the service endpoint, which is how SQS-compatible
/// services such as ElasticMQ or LocalStack are reached.
///
/// Credentials are resolved once here so that a session that could never
/// authenticate fails at construction instead of on every poll.
///
/// # Errors
///
/// Returns [`SqsWorkerError::SessionError`] when `region` is blank or no
/// credentials can be resolved.
pub async fn create_sqs_client_for_region(
    region: &str,
    endpoint_url: Option<&str>,
) -> Result<aws_sdk_sqs::Client, SqsWorkerError> {
    let region = region.trim();
    if region.is_empty() {
        return Err(SqsWorkerError::SessionError("region must not be empty".to_string()));
    }

    let mut loader = aws_config::from_env().region(Region::new(region.to_string()));
    if let Some(endpoint_url) = endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let config = loader.load().await;

    check_credentials(config.credentials_provider()).await?;

    Ok(aws_sdk_sqs::Client::new(&config))
}

async fn check_credentials(
    provider: Option<SharedCredentialsProvider>,
) -> Result<(), SqsWorkerError> {
    let provider = provider.ok_or_else(|| {
        SqsWorkerError::SessionError("no credentials provider configured".to_string())
    })?;

    provider
        .provide_credentials()
        .await
        .map(|_| ())
        .map_err(|e| SqsWorkerError::SessionError(format!("cannot resolve credentials: {e}")))
}
