//! Error types for the SES client.
//!
//! [`SesError`] covers everything that can go wrong between building a request
//! and decoding the response: configuration, credentials, signing, transport and
//! the error documents returned by both SES API dialects. The custom-resource
//! handlers sit one layer up and wrap these in [`crate::handlers::HandlerError`].
//!
//! # Examples
//!
//! ```rust
//! use ses_identity::error::SesError;
//!
//! fn describe(error: &SesError) {
//!     if error.is_retryable() {
//!         println!("retryable, wait {:?}", error.retry_after());
//!     }
//!     if let Some(code) = error.error_code() {
//!         println!("AWS error code: {}", code);
//!     }
//! }
//! ```

mod mapping;

pub use mapping::{map_aws_error, parse_error_response, parse_query_error_response, AwsErrorResponse};

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::signing::SigningError;

/// Result alias used throughout the client layer.
pub type SesResult<T> = Result<T, SesError>;

/// Top-level error type for SES operations.
#[derive(Debug, Error)]
pub enum SesError {
    /// The client is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credentials could not be resolved.
    #[error("Credential error: {message}")]
    Credential {
        /// Description of the credential error.
        message: String,
    },

    /// SigV4 signing failed.
    #[error("Signing error: {message}")]
    Signing {
        /// Description of the signing error.
        message: String,
    },

    /// Network-level failure talking to SES.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// The request timed out.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
        /// Whether this timeout is retryable.
        retryable: bool,
    },

    /// SES throttled the request.
    #[error("Rate limited: {message}")]
    RateLimited {
        /// Description of the throttling.
        message: String,
        /// Optional hint for how long to wait.
        retry_after: Option<Duration>,
    },

    /// The addressed identity, policy or rule set does not exist.
    #[error("Not found: {message}")]
    NotFound {
        /// Message returned by SES.
        message: String,
    },

    /// The resource being created already exists.
    #[error("Already exists: {message}")]
    AlreadyExists {
        /// Message returned by SES.
        message: String,
    },

    /// Request validation failed on either side.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation error.
        message: String,
        /// Optional field name that failed validation.
        field: Option<String>,
    },

    /// A request or response body could not be (de)serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// Any other error document returned by SES.
    #[error("AWS API error: {code} - {message}")]
    AwsApi {
        /// AWS error code (e.g. "MessageRejected").
        code: String,
        /// Human-readable error message.
        message: String,
        /// AWS request ID for debugging.
        request_id: Option<String>,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// Unmapped error conditions.
    #[error("Unknown error: {message}")]
    Unknown {
        /// Description of the unknown error.
        message: String,
    },
}

impl SesError {
    /// Returns true if the request that produced this error may be retried.
    ///
    /// ```rust
    /// use ses_identity::error::SesError;
    ///
    /// let error = SesError::RateLimited {
    ///     message: "Rate exceeded".to_string(),
    ///     retry_after: None,
    /// };
    /// assert!(error.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            SesError::Transport { retryable, .. } => *retryable,
            SesError::Timeout { retryable, .. } => *retryable,
            SesError::RateLimited { .. } => true,
            SesError::AwsApi { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Returns the AWS error code if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            SesError::AwsApi { code, .. } => Some(code.as_str()),
            SesError::NotFound { .. } => Some("NotFoundException"),
            SesError::AlreadyExists { .. } => Some("AlreadyExistsException"),
            _ => None,
        }
    }

    /// Returns the AWS request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            SesError::AwsApi { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Returns the suggested retry delay if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SesError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SesError {
    fn from(err: serde_json::Error) -> Self {
        SesError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for SesError {
    fn from(err: quick_xml::Error) -> Self {
        SesError::Serialization {
            message: format!("Invalid XML response: {}", err),
        }
    }
}

impl From<reqwest::Error> for SesError {
    fn from(err: reqwest::Error) -> Self {
        let retryable = err.is_timeout()
            || err.is_connect()
            || err.status().map_or(false, |s| s.is_server_error());

        if err.is_timeout() {
            SesError::Timeout {
                message: err.to_string(),
                retryable: true,
            }
        } else {
            SesError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
                retryable,
            }
        }
    }
}

impl From<ConfigError> for SesError {
    fn from(err: ConfigError) -> Self {
        SesError::Configuration {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<CredentialError> for SesError {
    fn from(err: CredentialError) -> Self {
        SesError::Credential {
            message: err.to_string(),
        }
    }
}

impl From<SigningError> for SesError {
    fn from(err: SigningError) -> Self {
        SesError::Signing {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        let throttled = SesError::RateLimited {
            message: "Throttled".to_string(),
            retry_after: None,
        };
        assert!(throttled.is_retryable());

        let connect = SesError::Transport {
            message: "Connection refused".to_string(),
            source: None,
            retryable: true,
        };
        assert!(connect.is_retryable());

        let internal = SesError::AwsApi {
            code: "InternalFailure".to_string(),
            message: "Internal error".to_string(),
            request_id: None,
            retryable: true,
        };
        assert!(internal.is_retryable());

        let missing = SesError::NotFound {
            message: "Identity does not exist".to_string(),
        };
        assert!(!missing.is_retryable());

        let invalid = SesError::Validation {
            message: "Invalid identity".to_string(),
            field: Some("EmailIdentity".to_string()),
        };
        assert!(!invalid.is_retryable());
    }

    #[test]
    fn test_error_code_and_request_id() {
        let error = SesError::AwsApi {
            code: "MessageRejected".to_string(),
            message: "Email rejected".to_string(),
            request_id: Some("abc-123".to_string()),
            retryable: false,
        };
        assert_eq!(error.error_code(), Some("MessageRejected"));
        assert_eq!(error.request_id(), Some("abc-123"));

        let not_found = SesError::NotFound {
            message: "gone".to_string(),
        };
        assert_eq!(not_found.error_code(), Some("NotFoundException"));
        assert_eq!(not_found.request_id(), None);
    }

    #[test]
    fn test_retry_after() {
        let throttled = SesError::RateLimited {
            message: "Throttled".to_string(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(throttled.retry_after(), Some(Duration::from_secs(2)));

        let other = SesError::Unknown {
            message: "?".to_string(),
        };
        assert_eq!(other.retry_after(), None);
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: SesError = json_err.into();
        assert!(matches!(error, SesError::Serialization { .. }));
    }

    #[test]
    fn test_from_credential_error() {
        let error: SesError = CredentialError::Expired.into();
        assert!(matches!(error, SesError::Credential { .. }));
        assert_eq!(error.to_string(), "Credential error: Expired credentials");
    }

    #[test]
    fn test_display() {
        let error = SesError::AlreadyExists {
            message: "Email identity user@example.com already exists.".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Already exists: Email identity user@example.com already exists."
        );
    }
}
