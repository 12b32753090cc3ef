//! Mapping of SES error documents onto [`SesError`].
//!
//! SES speaks two dialects. The v2 REST API returns JSON:
//!
//! ```json
//! { "__type": "NotFoundException", "message": "Email identity does not exist." }
//! ```
//!
//! The v1 Query API returns XML:
//!
//! ```xml
//! <ErrorResponse>
//!   <Error><Type>Sender</Type><Code>RuleSetDoesNotExist</Code><Message>...</Message></Error>
//!   <RequestId>...</RequestId>
//! </ErrorResponse>
//! ```
//!
//! Both are parsed into [`AwsErrorResponse`] and then mapped by [`map_aws_error`].

use super::{SesError, SesResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parsed SES error document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwsErrorResponse {
    /// Error code with any namespace prefix stripped.
    #[serde(alias = "__type", alias = "Type", alias = "code", alias = "Code")]
    pub error_type: String,

    /// Human-readable error message.
    #[serde(alias = "Message", default)]
    pub message: String,

    /// AWS request ID.
    #[serde(
        alias = "requestId",
        alias = "RequestId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,
}

/// Parse a v2 JSON error body.
///
/// ```rust
/// use ses_identity::error::parse_error_response;
///
/// let body = r#"{"__type": "com.amazon.coral.service#NotFoundException", "message": "missing"}"#;
/// let error = parse_error_response(body).unwrap();
/// assert_eq!(error.error_type, "NotFoundException");
/// ```
pub fn parse_error_response(body: &str) -> SesResult<AwsErrorResponse> {
    let mut response: AwsErrorResponse = serde_json::from_str(body)?;
    strip_namespace(&mut response.error_type);
    Ok(response)
}

/// Parse a v1 XML `ErrorResponse` body.
pub fn parse_query_error_response(body: &str) -> SesResult<AwsErrorResponse> {
    let mut response = crate::xml::parse_error_document(body)?;
    strip_namespace(&mut response.error_type);
    Ok(response)
}

// "com.amazon.coral.service#NotFoundException" -> "NotFoundException"
fn strip_namespace(error_type: &mut String) {
    if let Some(pos) = error_type.rfind('#') {
        *error_type = error_type[pos + 1..].to_string();
    }
    if let Some(pos) = error_type.find(':') {
        error_type.truncate(pos);
    }
}

/// Map a parsed error document and HTTP status to a [`SesError`] variant.
///
/// ```rust
/// use ses_identity::error::{map_aws_error, AwsErrorResponse, SesError};
///
/// let error = AwsErrorResponse {
///     error_type: "AlreadyExistsException".to_string(),
///     message: "Email identity already exists".to_string(),
///     request_id: None,
/// };
/// assert!(matches!(map_aws_error(&error, 400), SesError::AlreadyExists { .. }));
/// ```
pub fn map_aws_error(error: &AwsErrorResponse, status_code: u16) -> SesError {
    match error.error_type.as_str() {
        "Throttling" | "ThrottlingException" | "TooManyRequestsException" => {
            SesError::RateLimited {
                message: error.message.clone(),
                retry_after: retry_delay_for_status(status_code),
            }
        }

        "ValidationException"
        | "ValidationError"
        | "InvalidParameterValue"
        | "InvalidParameterCombination"
        | "BadRequestException" => SesError::Validation {
            message: error.message.clone(),
            field: extract_field_from_message(&error.message),
        },

        "NotFoundException" | "ResourceNotFoundException" | "RuleSetDoesNotExist" => {
            SesError::NotFound {
                message: error.message.clone(),
            }
        }

        "AlreadyExistsException" | "AlreadyExists" => SesError::AlreadyExists {
            message: error.message.clone(),
        },

        "InternalFailure"
        | "InternalServiceException"
        | "InternalServerException"
        | "ServiceUnavailable"
        | "ServiceUnavailableException" => SesError::AwsApi {
            code: error.error_type.clone(),
            message: error.message.clone(),
            request_id: error.request_id.clone(),
            retryable: true,
        },

        _ => SesError::AwsApi {
            code: error.error_type.clone(),
            message: error.message.clone(),
            request_id: error.request_id.clone(),
            retryable: is_retryable_status(status_code),
        },
    }
}

/// Pulls `'name'` out of messages like "Invalid value for parameter 'PolicyName'".
fn extract_field_from_message(message: &str) -> Option<String> {
    for marker in ["parameter '", "field '"] {
        if let Some(start) = message.find(marker) {
            let start = start + marker.len();
            if let Some(end) = message[start..].find('\'') {
                return Some(message[start..start + end].to_string());
            }
        }
    }
    None
}

fn is_retryable_status(status_code: u16) -> bool {
    matches!(status_code, 500..=599 | 408 | 429)
}

fn retry_delay_for_status(status_code: u16) -> Option<Duration> {
    match status_code {
        429 => Some(Duration::from_secs(1)),
        503 => Some(Duration::from_secs(2)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn response(error_type: &str, message: &str) -> AwsErrorResponse {
        AwsErrorResponse {
            error_type: error_type.to_string(),
            message: message.to_string(),
            request_id: Some("req-1".to_string()),
        }
    }

    #[test]
    fn test_parse_json_error_with_namespace() {
        let body = r#"{"__type":"com.amazon.coral.service#TooManyRequestsException","message":"Slow down"}"#;
        let parsed = parse_error_response(body).unwrap();
        assert_eq!(parsed.error_type, "TooManyRequestsException");
        assert_eq!(parsed.message, "Slow down");
    }

    #[test]
    fn test_parse_json_error_without_message() {
        let parsed = parse_error_response(r#"{"__type":"NotFoundException"}"#).unwrap();
        assert_eq!(parsed.error_type, "NotFoundException");
        assert_eq!(parsed.message, "");
    }

    #[test]
    fn test_parse_query_error() {
        let body = r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <Error>
    <Type>Sender</Type>
    <Code>RuleSetDoesNotExist</Code>
    <Message>Rule set does not exist: missing-set</Message>
  </Error>
  <RequestId>4b1f2c3d-0000</RequestId>
</ErrorResponse>"#;
        let parsed = parse_query_error_response(body).unwrap();
        assert_eq!(parsed.error_type, "RuleSetDoesNotExist");
        assert_eq!(parsed.message, "Rule set does not exist: missing-set");
        assert_eq!(parsed.request_id.as_deref(), Some("4b1f2c3d-0000"));
    }

    #[rstest]
    #[case("ThrottlingException", 429)]
    #[case("Throttling", 400)]
    #[case("TooManyRequestsException", 429)]
    fn test_throttling_maps_to_rate_limited(#[case] code: &str, #[case] status: u16) {
        let error = map_aws_error(&response(code, "Rate exceeded"), status);
        assert!(matches!(error, SesError::RateLimited { .. }));
        assert!(error.is_retryable());
    }

    #[rstest]
    #[case("NotFoundException")]
    #[case("RuleSetDoesNotExist")]
    fn test_not_found(#[case] code: &str) {
        let error = map_aws_error(&response(code, "missing"), 404);
        assert!(matches!(error, SesError::NotFound { .. }));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_validation_extracts_field() {
        let error = map_aws_error(
            &response("BadRequestException", "Invalid value for parameter 'PolicyName'"),
            400,
        );
        match error {
            SesError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("PolicyName")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_code_uses_status() {
        let server = map_aws_error(&response("Weird", "?"), 502);
        assert!(server.is_retryable());
        assert_eq!(server.request_id(), Some("req-1"));

        let client = map_aws_error(&response("Weird", "?"), 403);
        assert!(!client.is_retryable());
        assert_eq!(client.error_code(), Some("Weird"));
    }
}
