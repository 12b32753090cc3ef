//! Async glue for Lambda handlers.
//!
//! [`WorkerPool`] runs blocking closures on tokio's blocking threads, at most
//! `MAX_WORKERS` at a time. [`async_handler`] and [`graphql_handler`] wrap an
//! async handler with request logging; the GraphQL variant also turns errors
//! and panics into an `{"error": {"message": ...}}` result instead of failing
//! the invocation.

use futures::FutureExt;
use lambda_runtime::LambdaEvent;
use serde_json::{json, Value};
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::config::HandlerConfig;
use crate::handlers::{HandlerError, HandlerResult};
use crate::utils::jsonify;

/// Bounded pool for blocking work.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// A pool running at most `max_workers` closures at once (minimum 1).
    pub fn new(max_workers: usize) -> Self {
        let size = max_workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn from_config(config: &HandlerConfig) -> Self {
        Self::new(config.max_workers)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Permits not currently held by a running closure.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `func` on a blocking thread once a permit is free.
    pub async fn run<F, T>(&self, func: F) -> HandlerResult<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| HandlerError::Worker(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            func()
        })
        .await
        .map_err(|e| HandlerError::Worker(e.to_string()))
    }
}

/// Log the incoming event, then run `handler` on it.
pub async fn async_handler<F, Fut, T, E>(handler: F, event: LambdaEvent<Value>) -> Result<T, E>
where
    F: FnOnce(LambdaEvent<Value>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    info!("Received event {}", jsonify(&event.payload).unwrap_or_default());
    handler(event).await
}

/// Like [`async_handler`], but never fails: an error or panic becomes
/// `{"error": {"message": ...}}`. The result is logged either way.
pub async fn graphql_handler<F, Fut, E>(handler: F, event: LambdaEvent<Value>) -> Value
where
    F: FnOnce(LambdaEvent<Value>) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
    E: Display,
{
    info!("Received event {}", jsonify(&event.payload).unwrap_or_default());

    let result = match AssertUnwindSafe(handler(event)).catch_unwind().await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            error!(error = %e, "An exception occurred");
            error_envelope(&e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(error = %message, "Handler panicked");
            error_envelope(&message)
        }
    };

    info!("Result: {}", jsonify(&result).unwrap_or_default());
    result
}

fn error_envelope(message: &str) -> Value {
    json!({ "error": { "message": message } })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
