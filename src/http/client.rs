//! Signing, retrying HTTP client for SES.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Request;
use std::sync::Arc;
use tokio::time::sleep;
use url::Url;

use crate::config::SesConfig;
use crate::credentials::AwsCredentials;
use crate::error::{SesError, SesResult};
use crate::signing::{sign_request, SigningKeyCache, SigningParams, SES_SERVICE};

use super::request::SesRequest;
use super::response::SesResponse;
use super::transport::{ReqwestTransport, Transport};
use super::HttpClient;

/// HTTP client that signs every request with SigV4 and retries retryable
/// failures according to the configured [`RetryConfig`](crate::config::RetryConfig).
pub struct SesHttpClient {
    config: Arc<SesConfig>,
    transport: Arc<dyn Transport>,
    signing_cache: Arc<SigningKeyCache>,
    endpoint: String,
    host: String,
}

impl SesHttpClient {
    pub fn new(config: SesConfig) -> SesResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout, config.connect_timeout)?)
            as Arc<dyn Transport>;
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: SesConfig, transport: Arc<dyn Transport>) -> SesResult<Self> {
        let endpoint = config.ses_endpoint();
        let host = extract_host(&endpoint)?;

        Ok(Self {
            config: Arc::new(config),
            transport,
            signing_cache: Arc::new(SigningKeyCache::new()),
            endpoint,
            host,
        })
    }

    async fn build_request(&self, ses_request: &SesRequest) -> SesResult<Request> {
        let credentials = self.config.credentials_provider.credentials().await?;

        let url = Url::parse(&ses_request.build_url(&self.endpoint)).map_err(|e| {
            SesError::Validation {
                message: format!("Invalid URL: {}", e),
                field: Some("url".to_string()),
            }
        })?;

        let mut request = Request::new(ses_request.method().into(), url);
        let headers = request.headers_mut();

        for (name, value) in ses_request.headers() {
            headers.insert(name.clone(), value.clone());
        }

        headers.insert(
            "host",
            self.host.parse().map_err(|e| SesError::Validation {
                message: format!("Invalid host header: {}", e),
                field: Some("host".to_string()),
            })?,
        );

        if let Some(content_type) = ses_request.content_type() {
            headers.insert(
                "content-type",
                content_type.parse().map_err(|e| SesError::Validation {
                    message: format!("Invalid content-type header: {}", e),
                    field: Some("content-type".to_string()),
                })?,
            );
        }

        if let Some(ref user_agent) = self.config.user_agent {
            headers.insert(
                "user-agent",
                user_agent.parse().map_err(|e| SesError::Validation {
                    message: format!("Invalid user-agent header: {}", e),
                    field: Some("user-agent".to_string()),
                })?,
            );
        }

        let signing_params = self.signing_params(&credentials);
        sign_request(
            ses_request.method().as_str(),
            ses_request.path(),
            ses_request.query_params(),
            request.headers_mut(),
            ses_request.body_bytes(),
            &signing_params,
            &Utc::now(),
            Some(self.signing_cache.clone()),
        )?;

        if let Some(body) = ses_request.body_bytes() {
            *request.body_mut() = Some(body.to_vec().into());
        }

        Ok(request)
    }

    fn signing_params(&self, credentials: &AwsCredentials) -> SigningParams {
        let params = SigningParams::new(&self.config.region, SES_SERVICE)
            .with_access_key(credentials.access_key_id())
            .with_secret_key(credentials.secret_access_key());

        match credentials.session_token() {
            Some(token) => params.with_session_token(token),
            None => params,
        }
    }

    async fn send_with_retry(&self, request: Request) -> SesResult<SesResponse> {
        let retry = &self.config.retry_config;
        let mut attempt = 0;

        loop {
            let req = request.try_clone().ok_or_else(|| SesError::Transport {
                message: "Failed to clone request for retry".to_string(),
                source: None,
                retryable: false,
            })?;

            let error = match self.transport.send(req).await {
                Ok(response) => {
                    let response = SesResponse::from_reqwest(response).await?;
                    if response.is_success() {
                        return Ok(response);
                    }
                    response.into_error()
                }
                Err(e) => e,
            };

            if !retry.should_retry(attempt, &error) {
                return Err(error);
            }

            let delay = error
                .retry_after()
                .unwrap_or_else(|| retry.calculate_delay(attempt));
            tracing::debug!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying SES request"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    pub fn signing_cache(&self) -> &SigningKeyCache {
        &self.signing_cache
    }
}

/// Host header value for an endpoint, with the port when one is given.
fn extract_host(endpoint: &str) -> SesResult<String> {
    let url = Url::parse(endpoint).map_err(|e| SesError::Configuration {
        message: format!("Invalid endpoint URL: {}", e),
        source: None,
    })?;

    let host = url.host_str().ok_or_else(|| SesError::Configuration {
        message: "Endpoint URL has no host".to_string(),
        source: None,
    })?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[async_trait]
impl HttpClient for SesHttpClient {
    async fn send_request(&self, ses_request: SesRequest) -> SesResult<SesResponse> {
        let request = self.build_request(&ses_request).await?;
        tracing::trace!(method = ses_request.method().as_str(), path = ses_request.path(), "SES request");
        self.send_with_retry(request).await
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn region(&self) -> &str {
        &self.config.region
    }
}
