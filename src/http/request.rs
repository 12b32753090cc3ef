//! Request builder shared by the v2 REST and v1 Query dialects.

use http::HeaderMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::{SesError, SesResult};

/// Characters left alone in a path segment or query value.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query API version sent with every v1 action.
pub const QUERY_API_VERSION: &str = "2010-12-01";

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// HTTP methods used against SES.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        }
    }
}

/// Percent-encode a single path segment, e.g. an email identity.
///
/// ```rust
/// use ses_identity::http::encode_path_segment;
///
/// assert_eq!(encode_path_segment("user@example.com"), "user%40example.com");
/// ```
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, UNRESERVED).to_string()
}

/// A request to SES, prior to signing.
#[derive(Debug, Clone)]
pub struct SesRequest {
    method: HttpMethod,
    /// Already percent-encoded path.
    path: String,
    query_params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    content_type: Option<String>,
}

impl SesRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, path)
    }

    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            content_type: None,
        }
    }

    /// A v1 Query API call: `POST /` with a form-encoded body carrying
    /// `Action`, `Version` and the given parameters.
    ///
    /// ```rust
    /// use ses_identity::http::SesRequest;
    ///
    /// let request = SesRequest::action("VerifyEmailIdentity", [("EmailAddress", "a@example.com")]);
    /// assert_eq!(
    ///     request.body_bytes(),
    ///     Some("Action=VerifyEmailIdentity&Version=2010-12-01&EmailAddress=a%40example.com".as_bytes())
    /// );
    /// ```
    pub fn action<I, K, V>(action: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        form.append_pair("Action", action);
        form.append_pair("Version", QUERY_API_VERSION);
        for (key, value) in params {
            form.append_pair(key.as_ref(), value.as_ref());
        }

        let mut request = Self::post("/").body(form.finish().into_bytes());
        request.content_type = Some(FORM_CONTENT_TYPE.to_string());
        request
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> SesResult<Self> {
        let header_name = http::header::HeaderName::from_bytes(key.as_ref().as_bytes())
            .map_err(|e| SesError::Validation {
                message: format!("Invalid header name: {}", e),
                field: Some("header".to_string()),
            })?;

        let header_value = http::header::HeaderValue::from_str(value.as_ref())
            .map_err(|e| SesError::Validation {
                message: format!("Invalid header value: {}", e),
                field: Some("header".to_string()),
            })?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `json` as the body and mark it `application/json`.
    pub fn json<T: Serialize>(mut self, json: &T) -> SesResult<Self> {
        let body = serde_json::to_vec(json)?;
        self.body = Some(body);
        self.content_type = Some(JSON_CONTENT_TYPE.to_string());
        Ok(self)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Endpoint plus path plus the encoded query string.
    pub fn build_url(&self, endpoint: &str) -> String {
        let mut url = format!("{}{}", endpoint.trim_end_matches('/'), self.path);

        if !self.query_params.is_empty() {
            let query = self
                .query_params
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(k, UNRESERVED),
                        utf8_percent_encode(v, UNRESERVED)
                    )
                })
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }

        url
    }
}
