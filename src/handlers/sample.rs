//! Echo handler.

use lambda_runtime::LambdaEvent;
use serde_json::{json, Value};

use crate::aio::{async_handler, WorkerPool};
use crate::utils::jsonify;

use super::HandlerResult;

/// `{"statusCode": 200, "body": <event as JSON text>}`.
pub fn respond(event: &Value) -> HandlerResult<Value> {
    Ok(json!({
        "statusCode": 200,
        "body": jsonify(event)?,
    }))
}

/// Lambda entry point. The body is rendered on `pool` so a large event does not
/// hold up the runtime thread.
pub async fn handler(pool: &WorkerPool, event: LambdaEvent<Value>) -> HandlerResult<Value> {
    async_handler(
        |event| async move {
            let payload = event.payload;
            pool.run(move || respond(&payload)).await?
        },
        event,
    )
    .await
}
