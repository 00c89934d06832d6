use crate::errors::SqsWorkerError;
use async_trait::async_trait;
use std::future::Future;

/// Trait for processing the payload of a received message.
///
/// Returning `Ok(())` acknowledges the message, which is then deleted from
/// the queue. Returning an error leaves it on the queue so it is redelivered
/// once its visibility timeout expires.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: String) -> Result<(), SqsWorkerError>;
}

/// [`MessageHandler`] backed by an async function of the payload.
///
/// Built with [`handler_fn`].
#[derive(Clone)]
pub struct FnHandler<F> {
    handler_fn: F,
}

/// Wraps an async function so it can be used as a [`MessageHandler`].
///
/// ```rust
/// use sqs_worker::worker::handler_fn;
///
/// let handler = handler_fn(|payload: String| async move {
///     println!("{payload}");
///     Ok(())
/// });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(handler_fn: F) -> FnHandler<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SqsWorkerError>> + Send + 'static,
{
    FnHandler { handler_fn }
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SqsWorkerError>> + Send + 'static,
{
    async fn handle(&self, payload: String) -> Result<(), SqsWorkerError> {
        (self.handler_fn)(payload).await
    }
}

/// [`MessageHandler`] that hands a clone of a shared resource to every call.
///
/// Built with [`handler_fn_with_shared`].
///
/// # Type Parameters
///
/// * `RFn` - The message handler function type
/// * `TShared` - The type of shared resources passed to the handler
#[derive(Clone)]
pub struct SharedFnHandler<RFn, TShared> {
    rv_fn: RFn,
    shared_resources: TShared,
}

/// Wraps an async function taking the payload and a shared resource, such as
/// a connection pool or a counter behind an `Arc`.
pub fn handler_fn_with_shared<RFn, Fut, TShared>(
    rv_fn: RFn,
    shared_resources: TShared,
) -> SharedFnHandler<RFn, TShared>
where
    RFn: Fn(String, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SqsWorkerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    SharedFnHandler {
        rv_fn,
        shared_resources,
    }
}

#[async_trait]
impl<RFn, Fut, TShared> MessageHandler for SharedFnHandler<RFn, TShared>
where
    RFn: Fn(String, TShared) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SqsWorkerError>> + Send + 'static,
    TShared: Send + Sync + Clone + 'static,
{
    async fn handle(&self, payload: String) -> Result<(), SqsWorkerError> {
        (self.rv_fn)(payload, self.shared_resources.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GenericError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn fn_handler_passes_payload_through() {
        let handler = handler_fn(|payload: String| async move {
            if payload == "ok" {
                Ok(())
            } else {
                Err(SqsWorkerError::from(GenericError::from(payload)))
            }
        });

        assert!(handler.handle("ok".to_string()).await.is_ok());
        let err = handler.handle("nope".to_string()).await.unwrap_err();
        assert_eq!(err.to_string(), "handler failed: nope");
    }

    #[tokio::test]
    async fn shared_handler_sees_same_resource() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handler = handler_fn_with_shared(
            |_payload: String, counter: Arc<AtomicUsize>| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            counter.clone(),
        );

        handler.handle("a".to_string()).await.unwrap();
        handler.handle("b".to_string()).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
