use thiserror::Error;

use crate::error::SesError;

/// Result alias for the handler layer.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors raised while handling a Lambda event.
///
/// Custom-resource handlers never return these to the runtime; they end up as
/// the `Reason` of a `FAILED` response. The SNS handler returns them as is.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required key is absent from the event payload.
    #[error("Missing key '{0}'")]
    MissingKey(String),

    /// A key is present but holds the wrong kind of value.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// A payload could not be parsed as JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// SES returned less than the handler needs.
    #[error("{0}")]
    MissingAttribute(String),

    #[error(transparent)]
    Ses(#[from] SesError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The CloudFormation response could not be delivered.
    #[error("Failed to send response to CloudFormation: {message}")]
    ResponseDelivery { message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A blocking task on the worker pool panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::MissingKey`].
    pub fn missing_key(key: impl Into<String>) -> Self {
        HandlerError::MissingKey(key.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(HandlerError::missing_key("Records").to_string(), "Missing key 'Records'");

        let ses = HandlerError::from(SesError::NotFound {
            message: "Email identity does not exist".to_string(),
        });
        assert_eq!(ses.to_string(), SesError::NotFound {
            message: "Email identity does not exist".to_string(),
        }
        .to_string());
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(HandlerError::from(err), HandlerError::InvalidJson(_)));
    }
}
