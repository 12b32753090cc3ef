//! Response document uploaded to the pre-signed `ResponseURL`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use super::event::{CustomResourceEvent, ResponseStatus};
use crate::handlers::{HandlerError, HandlerResult};

/// Body of the PUT to `ResponseURL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnResponse {
    pub status: ResponseStatus,
    /// Shown in the stack events; the error text on failure.
    pub reason: String,
    /// Changing this on `Update` makes CloudFormation delete the old resource.
    pub physical_resource_id: String,
    /// Echoed from the request.
    pub stack_id: String,
    /// Echoed from the request.
    pub request_id: String,
    /// Echoed from the request.
    pub logical_resource_id: String,
    /// Omitted unless set.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_echo: bool,
    /// Values for `Fn::GetAtt`, e.g. `DkimTokens`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl CfnResponse {
    /// Build the response for an event whose defaults have been applied.
    pub fn from_event(event: &CustomResourceEvent) -> Self {
        Self {
            status: event.status.unwrap_or(ResponseStatus::Success),
            reason: event.reason.clone().unwrap_or_default(),
            physical_resource_id: event.physical_resource_id.clone().unwrap_or_default(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo: event.no_echo.unwrap_or(false),
            data: event.data.clone(),
        }
    }
}

/// Delivers a [`CfnResponse`] to CloudFormation.
#[async_trait]
pub trait ResponseSender: Send + Sync {
    /// Upload `response`; a non-2xx answer is an error.
    async fn send(&self, response_url: &str, response: &CfnResponse) -> HandlerResult<()>;
}

/// [`ResponseSender`] that PUTs the JSON body with reqwest.
///
/// The pre-signed S3 URL is signed without a content type, so the request
/// carries an empty `Content-Type`.
#[derive(Clone, Debug)]
pub struct HttpResponseSender {
    client: reqwest::Client,
}

impl HttpResponseSender {
    /// A sender with its own client and a 30 second timeout.
    pub fn new() -> HandlerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Use an existing client, e.g. one shared with other handlers.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResponseSender for HttpResponseSender {
    async fn send(&self, response_url: &str, response: &CfnResponse) -> HandlerResult<()> {
        let body = serde_json::to_vec(response)?;

        let result = self
            .client
            .put(response_url)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match result {
            Ok(r) => {
                tracing::info!(status = r.status().as_u16(), "CloudFormation response sent");
                Ok(())
            }
            Err(e) => Err(HandlerError::ResponseDelivery {
                message: e.to_string(),
            }),
        }
    }
}
