//! Custom-resource request event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::handlers::{HandlerError, HandlerResult};

/// Lifecycle action CloudFormation is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
        })
    }
}

/// Outcome reported back to CloudFormation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// A CloudFormation custom-resource event.
///
/// Handlers take the event, fill in the output fields (`PhysicalResourceId`,
/// `Status`, `Reason`, `Data`) and hand it back. Fields this type does not
/// know about survive the round trip in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,

    /// Pre-signed S3 URL the response document is PUT to.
    #[serde(rename = "ResponseURL", default)]
    pub response_url: String,

    #[serde(default)]
    pub stack_id: String,

    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub resource_type: String,

    /// Name of the resource in the template.
    #[serde(default)]
    pub logical_resource_id: String,

    /// Set by the handler. Absent on `Create` until then; defaults to the log
    /// stream name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Properties from the template, all values as CloudFormation sent them.
    #[serde(default)]
    pub resource_properties: Map<String, Value>,

    /// Previous properties; only present on `Update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Attributes readable with `Fn::GetAtt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,

    /// Mask `data` in stack output and events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_echo: Option<bool>,

    /// `ServiceToken` and anything else not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomResourceEvent {
    /// A required string property from `ResourceProperties`.
    pub fn property(&self, key: &str) -> HandlerResult<&str> {
        let value = self
            .resource_properties
            .get(key)
            .ok_or_else(|| HandlerError::missing_key(key))?;

        value.as_str().ok_or_else(|| HandlerError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a string, got {}", value),
        })
    }

    /// An optional property; JSON `null` counts as absent.
    pub fn optional_property(&self, key: &str) -> Option<&Value> {
        self.resource_properties.get(key).filter(|v| !v.is_null())
    }

    /// Mark the event failed with `error` as the reason.
    pub fn fail(&mut self, error: &HandlerError) {
        self.status = Some(ResponseStatus::Failed);
        self.reason = Some(error.to_string());
    }

    /// Fill in whatever the handler left unset: `SUCCESS`, a reason pointing at
    /// the log stream, and the log stream as physical resource id.
    pub fn apply_defaults(&mut self, log_stream: &str) {
        if self.status.is_none() {
            self.status = Some(ResponseStatus::Success);
        }
        if self.reason.is_none() {
            self.reason = Some(format!(
                "See the details in CloudWatch Log Stream: {}",
                log_stream
            ));
        }
        if self.physical_resource_id.is_none() {
            self.physical_resource_id = Some(log_stream.to_string());
        }
    }
}
