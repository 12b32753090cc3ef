//! AWS credentials for signing SES requests.
//!
//! The [`CredentialProvider`] trait is the port; the adapters are:
//!
//! - [`StaticCredentialProvider`]: fixed credentials, mostly for tests
//! - [`EnvironmentCredentialProvider`]: `AWS_ACCESS_KEY_ID` and friends, which the
//!   Lambda runtime injects for the execution role
//! - [`ContainerCredentialProvider`]: the container credentials endpoint used by
//!   Lambda SnapStart and ECS
//! - [`ChainCredentialProvider`]: first provider that succeeds wins
//! - [`CachedCredentialProvider`]: caches another provider until shortly before expiry
//!
//! [`DefaultCredentialProvider`] caches the chain environment -> container.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use zeroize::Zeroize;

pub mod cache;
pub mod chain;
pub mod container;
pub mod env;
pub mod error;
pub mod static_creds;

pub use cache::CachedCredentialProvider;
pub use chain::ChainCredentialProvider;
pub use container::ContainerCredentialProvider;
pub use env::EnvironmentCredentialProvider;
pub use error::CredentialError;
pub use static_creds::StaticCredentialProvider;

/// A set of AWS credentials. The secret is zeroized on drop and redacted from `Debug`.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct AwsCredentials {
    access_key_id: String,
    #[zeroize(skip)]
    secret_access_key: SecretString,
    session_token: Option<String>,
    #[zeroize(skip)]
    expiration: Option<DateTime<Utc>>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
            session_token: None,
            expiration: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn expiration(&self) -> Option<&DateTime<Utc>> {
        self.expiration.as_ref()
    }

    pub fn is_expired(&self) -> bool {
        self.expiration.map_or(false, |exp| Utc::now() >= exp)
    }

    /// True if the credentials expire within `within` from now.
    pub fn expires_within(&self, within: chrono::Duration) -> bool {
        self.expiration.map_or(false, |exp| Utc::now() + within >= exp)
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Source of AWS credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve credentials, refreshing them if the source supports it.
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError>;

    /// Cheap, non-blocking expiry hint.
    fn is_expired(&self) -> bool {
        false
    }
}

/// Cached environment -> container chain.
#[derive(Debug, Clone)]
pub struct DefaultCredentialProvider {
    inner: CachedCredentialProvider<ChainCredentialProvider>,
}

impl DefaultCredentialProvider {
    pub fn new() -> Self {
        let chain = ChainCredentialProvider::new()
            .with_provider(EnvironmentCredentialProvider::new())
            .with_provider(ContainerCredentialProvider::new());

        Self {
            inner: CachedCredentialProvider::new(chain),
        }
    }
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for DefaultCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        self.inner.credentials().await
    }

    fn is_expired(&self) -> bool {
        self.inner.is_expired()
    }
}
