//! Lambda bootstrap. `_HANDLER` picks the handler this process serves.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use ses_identity::aio::WorkerPool;
use ses_identity::cfn::{CustomResourceDispatcher, HttpResponseSender};
use ses_identity::handlers::{
    sample, HttpLinkFetcher, IdentityHandler, RuleSetHandler, VerificationLinkHandler,
};
use ses_identity::{logging, HandlerConfig, HandlerKind, SesClient};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = HandlerConfig::from_env()?;
    logging::init(&config)?;
    let pool = WorkerPool::from_config(&config);
    info!(handler = %config.handler, max_workers = pool.size(), "Starting handler");

    match config.handler {
        HandlerKind::Sample => {
            let pool = &pool;
            run(service_fn(move |event: LambdaEvent<Value>| async move {
                sample::handler(pool, event).await
            }))
            .await
        }
        HandlerKind::Identity => {
            let client = SesClient::from_env()?;
            let dispatcher = CustomResourceDispatcher::new(
                IdentityHandler::from_client(&client),
                Arc::new(HttpResponseSender::new()?),
            );
            let dispatcher = &dispatcher;
            run(service_fn(move |event: LambdaEvent<Value>| async move {
                dispatcher.run(event).await
            }))
            .await
        }
        HandlerKind::RuleSet => {
            let client = SesClient::from_env()?;
            let dispatcher = CustomResourceDispatcher::new(
                RuleSetHandler::from_client(&client),
                Arc::new(HttpResponseSender::new()?),
            );
            let dispatcher = &dispatcher;
            run(service_fn(move |event: LambdaEvent<Value>| async move {
                dispatcher.run(event).await
            }))
            .await
        }
        HandlerKind::Verification => {
            let handler = VerificationLinkHandler::new(HttpLinkFetcher::new()?)?;
            let handler = &handler;
            run(service_fn(move |event: LambdaEvent<Value>| async move {
                handler.run(event).await
            }))
            .await
        }
    }
}
