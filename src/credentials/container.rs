//! Container credentials endpoint provider.
//!
//! Used when Lambda (SnapStart) or ECS expose role credentials over HTTP
//! instead of environment variables:
//!
//! - `AWS_CONTAINER_CREDENTIALS_FULL_URI`: absolute URI of the endpoint
//! - `AWS_CONTAINER_CREDENTIALS_RELATIVE_URI`: path on `169.254.170.2`
//! - `AWS_CONTAINER_AUTHORIZATION_TOKEN`: optional `Authorization` header value

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const FULL_URI_ENV: &str = "AWS_CONTAINER_CREDENTIALS_FULL_URI";
pub const RELATIVE_URI_ENV: &str = "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI";
pub const AUTHORIZATION_TOKEN_ENV: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN";

const ECS_ENDPOINT: &str = "http://169.254.170.2";
const DEFAULT_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerCredentials {
    access_key_id: String,
    secret_access_key: String,
    token: Option<String>,
    expiration: Option<String>,
}

/// Fetches role credentials from the container credentials endpoint.
#[derive(Clone)]
pub struct ContainerCredentialProvider {
    client: Client,
    uri: Option<String>,
    authorization: Option<String>,
}

impl ContainerCredentialProvider {
    /// Resolve the endpoint from the environment. Without one configured, every
    /// call fails with [`CredentialError::Missing`] so the chain can move on.
    pub fn new() -> Self {
        let uri = std::env::var(FULL_URI_ENV)
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| {
                std::env::var(RELATIVE_URI_ENV)
                    .ok()
                    .filter(|u| !u.is_empty())
                    .map(|path| format!("{}{}", ECS_ENDPOINT, path))
            });
        let authorization = std::env::var(AUTHORIZATION_TOKEN_ENV).ok().filter(|t| !t.is_empty());

        Self {
            client: build_client(),
            uri,
            authorization,
        }
    }

    /// Use an explicit endpoint.
    pub fn with_uri(uri: impl Into<String>, authorization: Option<String>) -> Self {
        Self {
            client: build_client(),
            uri: Some(uri.into()),
            authorization,
        }
    }
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| Client::new())
}

impl Default for ContainerCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for ContainerCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        let uri = self.uri.as_deref().ok_or_else(|| CredentialError::Missing {
            message: format!("neither {} nor {} is set", FULL_URI_ENV, RELATIVE_URI_ENV),
        })?;

        let mut request = self.client.get(uri);
        if let Some(token) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await.map_err(|e| CredentialError::Container {
            message: format!("request to {} failed: {}", uri, e),
        })?;

        if !response.status().is_success() {
            return Err(CredentialError::Container {
                message: format!("endpoint returned status {}", response.status()),
            });
        }

        let body: ContainerCredentials =
            response.json().await.map_err(|e| CredentialError::Container {
                message: format!("failed to parse credentials response: {}", e),
            })?;

        let mut credentials = AwsCredentials::new(body.access_key_id, body.secret_access_key);
        if let Some(token) = body.token.filter(|t| !t.is_empty()) {
            credentials = credentials.with_session_token(token);
        }
        if let Some(expiration) = body.expiration {
            let expiration = DateTime::parse_from_rfc3339(&expiration)
                .map_err(|e| CredentialError::Invalid {
                    message: format!("invalid expiration '{}': {}", expiration, e),
                })?
                .with_timezone(&Utc);
            credentials = credentials.with_expiration(expiration);
        }

        Ok(credentials)
    }
}

impl fmt::Debug for ContainerCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerCredentialProvider")
            .field("uri", &self.uri)
            .field("authorization", &self.authorization.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetches_credentials_with_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2018-06-01/credentials"))
            .and(header("authorization", "secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "AccessKeyId": "ASIAEXAMPLE",
                "SecretAccessKey": "SECRET",
                "Token": "SESSION",
                "Expiration": "2099-01-01T00:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ContainerCredentialProvider::with_uri(
            format!("{}/2018-06-01/credentials", server.uri()),
            Some("secret-token".to_string()),
        );
        let creds = provider.credentials().await.unwrap();

        assert_eq!(creds.access_key_id(), "ASIAEXAMPLE");
        assert_eq!(creds.session_token(), Some("SESSION"));
        assert!(creds.expiration().is_some());
        assert!(!creds.is_expired());
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let provider = ContainerCredentialProvider::with_uri(server.uri(), None);
        assert!(matches!(
            provider.credentials().await,
            Err(CredentialError::Container { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let provider =
            ContainerCredentialProvider::with_uri("http://localhost/creds", Some("tok".to_string()));
        let debug = format!("{:?}", provider);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok\""));
    }
}
