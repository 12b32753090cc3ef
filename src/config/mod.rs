//! Configuration for the SES client and the Lambda handlers.
//!
//! - [`SesConfig`]: region, endpoint, credentials, timeouts and retries for SES calls.
//! - [`HandlerConfig`]: `LOG_LEVEL`, `MAX_WORKERS` and handler selection for the
//!   Lambda bootstrap.

use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod handler;
pub mod retry;

pub use error::ConfigError;
pub use handler::{HandlerConfig, HandlerKind};
pub use retry::RetryConfig;

use crate::credentials::{AwsCredentials, CredentialProvider, DefaultCredentialProvider, StaticCredentialProvider};

/// Environment variable overriding the SES endpoint (e.g. for LocalStack).
pub const SES_ENDPOINT_ENV: &str = "SES_ENDPOINT";

/// Configuration for the SES client.
#[derive(Clone)]
pub struct SesConfig {
    /// AWS region (e.g. "us-east-1").
    pub region: String,

    /// Custom endpoint URL.
    pub endpoint: Option<String>,

    /// Credential provider used to sign every request.
    pub credentials_provider: Arc<dyn CredentialProvider + Send + Sync>,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Retry behaviour for throttling and transient failures.
    pub retry_config: RetryConfig,

    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl SesConfig {
    /// Create a new configuration builder.
    ///
    /// ```
    /// use ses_identity::config::SesConfig;
    ///
    /// let config = SesConfig::builder()
    ///     .region("us-east-1")
    ///     .credentials("access_key", "secret_key")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.region, "us-east-1");
    /// ```
    pub fn builder() -> SesConfigBuilder {
        SesConfigBuilder::default()
    }

    /// Build a configuration from the Lambda environment.
    ///
    /// Reads `AWS_REGION` (falling back to `AWS_DEFAULT_REGION`) and the optional
    /// `SES_ENDPOINT` override, and resolves credentials through
    /// [`DefaultCredentialProvider`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .map_err(|_| ConfigError::Environment {
                message: "AWS_REGION or AWS_DEFAULT_REGION must be set".to_string(),
            })?;

        let mut builder = Self::builder()
            .region(region)
            .credentials_provider(DefaultCredentialProvider::new());

        if let Some(endpoint) = std::env::var(SES_ENDPOINT_ENV).ok().filter(|e| !e.is_empty()) {
            builder = builder.endpoint(endpoint);
        }

        builder.build()
    }

    /// The SES endpoint: the override if set, otherwise the regional endpoint.
    ///
    /// Both API generations share this host; v2 calls live under `/v2/email`.
    pub fn ses_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://email.{}.amazonaws.com", self.region))
    }
}

impl std::fmt::Debug for SesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesConfig")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry_config", &self.retry_config)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SesConfig`].
#[derive(Default)]
pub struct SesConfigBuilder {
    region: Option<String>,
    endpoint: Option<String>,
    credentials_provider: Option<Arc<dyn CredentialProvider + Send + Sync>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry_config: Option<RetryConfig>,
    user_agent: Option<String>,
}

impl SesConfigBuilder {
    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the credential provider.
    pub fn credentials_provider(
        mut self,
        provider: impl CredentialProvider + Send + Sync + 'static,
    ) -> Self {
        self.credentials_provider = Some(Arc::new(provider));
        self
    }

    /// Use fixed credentials.
    pub fn credentials(self, access_key: &str, secret_key: &str) -> Self {
        self.credentials_provider(StaticCredentialProvider::new(AwsCredentials::new(
            access_key, secret_key,
        )))
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set the maximum number of retries, keeping the other retry settings.
    pub fn max_retries(mut self, retries: u32) -> Self {
        let mut retry_config = self.retry_config.take().unwrap_or_default();
        retry_config.max_attempts = retries;
        self.retry_config = Some(retry_config);
        self
    }

    /// Replace the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if the region or credentials provider
    /// is not set, and [`ConfigError::Invalid`] for an empty region.
    pub fn build(self) -> Result<SesConfig, ConfigError> {
        let region = self.region.ok_or_else(|| ConfigError::MissingField {
            field: "region".to_string(),
        })?;

        if region.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "region must not be empty".to_string(),
            });
        }

        let credentials_provider =
            self.credentials_provider
                .ok_or_else(|| ConfigError::MissingField {
                    field: "credentials_provider".to_string(),
                })?;

        Ok(SesConfig {
            region,
            endpoint: self.endpoint,
            credentials_provider,
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            retry_config: self.retry_config.unwrap_or_default(),
            user_agent: self.user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SesConfig::builder()
            .region("us-east-1")
            .credentials("access_key", "secret_key")
            .build()
            .unwrap();

        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.retry_config.max_attempts, 3);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SesConfig::builder()
            .region("eu-west-1")
            .credentials("access_key", "secret_key")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .max_retries(5)
            .user_agent("ses-identity/1.0")
            .build()
            .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.retry_config.max_attempts, 5);
        assert_eq!(config.user_agent.as_deref(), Some("ses-identity/1.0"));
    }

    #[test]
    fn test_builder_missing_region() {
        let result = SesConfig::builder().credentials("a", "b").build();
        match result {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "region"),
            other => panic!("expected MissingField, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_builder_empty_region() {
        let result = SesConfig::builder().region(" ").credentials("a", "b").build();
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_builder_missing_credentials() {
        let result = SesConfig::builder().region("us-east-1").build();
        match result {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "credentials_provider"),
            other => panic!("expected MissingField, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_ses_endpoint() {
        let regional = SesConfig::builder()
            .region("eu-west-1")
            .credentials("a", "b")
            .build()
            .unwrap();
        assert_eq!(regional.ses_endpoint(), "https://email.eu-west-1.amazonaws.com");

        let custom = SesConfig::builder()
            .region("us-east-1")
            .endpoint("http://localhost:4566/")
            .credentials("a", "b")
            .build()
            .unwrap();
        assert_eq!(custom.ses_endpoint(), "http://localhost:4566");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = SesConfig::builder()
            .region("us-east-1")
            .credentials("AKID", "SUPERSECRET")
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("us-east-1"));
        assert!(!debug.contains("SUPERSECRET"));
    }
}
