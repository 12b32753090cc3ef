//! Response wrapper and error extraction for both SES dialects.

use http::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::{
    map_aws_error, parse_error_response, parse_query_error_response, AwsErrorResponse, SesError,
    SesResult,
};

/// A buffered response from SES.
#[derive(Debug, Clone)]
pub struct SesResponse {
    status: StatusCode,
    /// Lowercased header names.
    headers: HashMap<String, String>,
    body: Vec<u8>,
    request_id: Option<String>,
}

impl SesResponse {
    /// ```rust
    /// use ses_identity::http::SesResponse;
    /// use http::StatusCode;
    /// use std::collections::HashMap;
    ///
    /// let mut headers = HashMap::new();
    /// headers.insert("x-amzn-requestid".to_string(), "abc-123".to_string());
    ///
    /// let response = SesResponse::new(StatusCode::OK, headers, vec![]);
    /// assert_eq!(response.request_id(), Some("abc-123"));
    /// ```
    pub fn new(status: StatusCode, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        let request_id = headers
            .get("x-amzn-requestid")
            .or_else(|| headers.get("x-amzn-request-id"))
            .or_else(|| headers.get("x-amz-request-id"))
            .cloned();

        Self {
            status,
            headers,
            body,
            request_id,
        }
    }

    pub async fn from_reqwest(response: reqwest::Response) -> SesResult<Self> {
        let status = response.status();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), value_str.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SesError::Transport {
                message: format!("Failed to read response body: {}", e),
                source: Some(Box::new(e)),
                retryable: true,
            })?
            .to_vec();

        Ok(Self::new(status, headers, body))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_string(&self) -> SesResult<&str> {
        std::str::from_utf8(&self.body).map_err(|e| SesError::Serialization {
            message: format!("Response body is not valid UTF-8: {}", e),
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> SesResult<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    fn is_xml(&self) -> bool {
        let declared = self
            .header("content-type")
            .map(|ct| ct.contains("xml"))
            .unwrap_or(false);
        declared
            || self
                .body
                .iter()
                .find(|b| !b.is_ascii_whitespace())
                .map_or(false, |b| *b == b'<')
    }

    /// Turn a non-2xx response into a [`SesError`].
    ///
    /// XML bodies are read as Query API `ErrorResponse` documents, anything
    /// else as a v2 JSON error. When neither parses, the error type falls back
    /// to the `x-amzn-errortype` header and then to the bare status.
    ///
    /// ```rust
    /// use ses_identity::http::SesResponse;
    /// use ses_identity::error::SesError;
    /// use http::StatusCode;
    /// use std::collections::HashMap;
    ///
    /// let body = br#"{"__type": "NotFoundException", "message": "gone"}"#.to_vec();
    /// let response = SesResponse::new(StatusCode::NOT_FOUND, HashMap::new(), body);
    /// assert!(matches!(response.into_error(), SesError::NotFound { .. }));
    /// ```
    pub fn into_error(self) -> SesError {
        let status = self.status.as_u16();
        let text = String::from_utf8_lossy(&self.body);

        let parsed = if self.is_xml() {
            parse_query_error_response(&text).ok()
        } else if text.trim().is_empty() {
            None
        } else {
            parse_error_response(&text).ok()
        };

        let parsed = parsed.or_else(|| {
            self.header("x-amzn-errortype").map(|error_type| AwsErrorResponse {
                error_type: error_type
                    .split(':')
                    .next()
                    .unwrap_or(error_type)
                    .to_string(),
                message: body_message(&text),
                request_id: None,
            })
        });

        match parsed {
            Some(mut error) => {
                if error.request_id.is_none() {
                    error.request_id = self.request_id.clone();
                }
                map_aws_error(&error, status)
            }
            None => SesError::AwsApi {
                code: status.to_string(),
                message: if text.is_empty() {
                    self.status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    text.to_string()
                },
                request_id: self.request_id.clone(),
                retryable: self.status.is_server_error()
                    || self.status == StatusCode::TOO_MANY_REQUESTS,
            },
        }
    }
}

/// restJson1 errors often carry only `{"message": "..."}` and put the type in
/// a header. Falls back to the raw body when there is no message to pull out.
fn body_message(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("Message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.to_string())
}
