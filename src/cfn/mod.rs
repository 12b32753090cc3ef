//! CloudFormation custom-resource protocol.
//!
//! A [`CustomResourceHandler`] does the resource-specific work and records
//! the outcome on the event. [`CustomResourceDispatcher`] routes on
//! `RequestType`, turns handler errors into a `FAILED` status, fills in the
//! protocol defaults and uploads the response to the pre-signed
//! `ResponseURL`.

pub mod event;
pub mod response;

pub use event::{CustomResourceEvent, RequestType, ResponseStatus};
pub use response::{CfnResponse, HttpResponseSender, ResponseSender};

use async_trait::async_trait;
use lambda_runtime::LambdaEvent;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::handlers::HandlerResult;
use crate::utils::jsonify;

/// Resource-specific lifecycle callbacks.
///
/// Implementations mutate the event (`PhysicalResourceId`, `Data`) and return
/// an error to fail the request; the dispatcher records it as the reason.
#[async_trait]
pub trait CustomResourceHandler: Send + Sync {
    async fn create(&self, event: &mut CustomResourceEvent) -> HandlerResult<()>;

    /// Defaults to [`create`](Self::create).
    async fn update(&self, event: &mut CustomResourceEvent) -> HandlerResult<()> {
        self.create(event).await
    }

    async fn delete(&self, event: &mut CustomResourceEvent) -> HandlerResult<()>;
}

/// Routes custom-resource events to a handler and reports the outcome.
pub struct CustomResourceDispatcher<H> {
    handler: H,
    sender: Arc<dyn ResponseSender>,
}

impl<H: CustomResourceHandler> CustomResourceDispatcher<H> {
    /// `sender` delivers every response this dispatcher produces.
    pub fn new(handler: H, sender: Arc<dyn ResponseSender>) -> Self {
        Self { handler, sender }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Run the handler for the event's request type. Never fails: a handler
    /// error is logged and recorded as `Status=FAILED` with the error as reason.
    pub async fn handle(&self, mut event: CustomResourceEvent) -> CustomResourceEvent {
        info!("Received event {}", jsonify(&event).unwrap_or_default());

        let result = match event.request_type {
            RequestType::Create => self.handler.create(&mut event).await,
            RequestType::Update => self.handler.update(&mut event).await,
            RequestType::Delete => self.handler.delete(&mut event).await,
        };

        if let Err(e) = result {
            error!(
                request_type = %event.request_type,
                logical_resource_id = %event.logical_resource_id,
                error = %e,
                "An exception occurred"
            );
            event.fail(&e);
        }

        event
    }

    /// Handle the event, apply the protocol defaults and deliver the response
    /// when the event carries an `https://` response URL.
    ///
    /// The completed event is returned either way; only a failed upload is an
    /// error.
    pub async fn dispatch(
        &self,
        event: CustomResourceEvent,
        log_stream: &str,
    ) -> HandlerResult<CustomResourceEvent> {
        let mut event = self.handle(event).await;
        event.apply_defaults(log_stream);

        if event.response_url.starts_with("https://") {
            let response = CfnResponse::from_event(&event);
            info!(
                status = ?response.status,
                physical_resource_id = %response.physical_resource_id,
                "Sending CloudFormation response"
            );
            if let Err(e) = self.sender.send(&event.response_url, &response).await {
                error!(error = %e, "Failed to deliver CloudFormation response");
                return Err(e);
            }
        }

        Ok(event)
    }

    /// Lambda entry point.
    pub async fn run(&self, event: LambdaEvent<Value>) -> Result<Value, lambda_runtime::Error> {
        let LambdaEvent { payload, context } = event;
        let event: CustomResourceEvent = serde_json::from_value(payload)?;
        let event = self.dispatch(event, &context.env_config.log_stream).await?;
        Ok(serde_json::to_value(event)?)
    }
}
