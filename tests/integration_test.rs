//! Tests against a real queue. They need `TEST_SQS_QUEUE_URL` and AWS
//! credentials (a `.env` file is picked up), so they only run with
//! `cargo test -- --ignored`.

use sqs_worker::queue::{QueueClient, SqsQueueClient};
use sqs_worker::{client, errors::SqsWorkerError, worker};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

#[derive(Clone)]
struct SharedPayloads {
    payloads: Arc<Mutex<Vec<String>>>,
}

impl SharedPayloads {
    fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn push(&self, payload: String) {
        self.payloads.lock().await.push(payload);
    }

    async fn contains(&self, payload: &str) -> bool {
        self.payloads.lock().await.iter().any(|p| p == payload)
    }
}

async fn test_handler(message: String, shared: SharedPayloads) -> Result<(), SqsWorkerError> {
    println!("Received message: {}", message);
    shared.push(message).await;
    Ok(())
}

fn test_config() -> worker::WorkerConfig {
    dotenvy::dotenv().ok();

    let queue_url = env::var("TEST_SQS_QUEUE_URL").expect("TEST_SQS_QUEUE_URL must be set");
    let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    let mut config = worker::WorkerConfig::new(queue_url, region)
        .with_poll_interval(Duration::from_millis(200));
    config.endpoint_url = env::var("SQS_WORKER_ENDPOINT_URL").ok();
    config
}

#[tokio::test]
#[ignore = "requires a live SQS queue"]
async fn test_send_then_receive_round_trip() {
    let config = test_config();
    let sqs_client = client::create_sqs_client_for_region(&config.region, config.endpoint_url.as_deref())
        .await
        .expect("Failed to create SQS client");
    let queue = SqsQueueClient::new(sqs_client, &config).expect("Invalid config");

    queue.send("round-trip payload").await.expect("Failed to send");

    let received = timeout(Duration::from_secs(30), async {
        loop {
            if let Some(message) = queue.receive_one().await.expect("Failed to receive") {
                if message.body == "round-trip payload" {
                    return message;
                }
            }
        }
    })
    .await
    .expect("Message was not received in time");

    assert!(!received.receipt_handle.is_empty());
    queue
        .delete(&received.receipt_handle)
        .await
        .expect("Failed to delete message");
}

#[tokio::test]
#[ignore = "requires a live SQS queue"]
async fn test_polling_worker_with_shutdown() {
    let shared = SharedPayloads::new();

    let polling_worker = worker::PollingWorker::connect(
        test_config(),
        worker::handler_fn_with_shared(test_handler, shared.clone()),
    )
    .await
    .expect("Failed to build worker");

    let message_id = polling_worker
        .send_message("Shutdown test message")
        .await
        .expect("Failed to send test message");
    println!("Sent message {}", message_id);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let receive_task = tokio::spawn(async move {
        polling_worker.start_polling_with_shutdown(shutdown_rx).await
    });

    let processed = timeout(Duration::from_secs(30), async {
        while !shared.contains("Shutdown test message").await {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    })
    .await;

    let _ = shutdown_tx.send(());
    let shutdown_result = timeout(Duration::from_secs(10), receive_task).await;

    assert!(processed.is_ok(), "Message was not processed before timeout");
    assert!(
        shutdown_result.is_ok(),
        "Worker did not shut down after the signal"
    );
}
