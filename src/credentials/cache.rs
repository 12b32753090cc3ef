//! Caching wrapper around another credential provider.
//!
//! Lambda execution environments are reused across invocations, so resolving
//! credentials once and holding them until shortly before they expire saves a
//! round trip to the container endpoint on every request.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const DEFAULT_CACHE_TTL_SECS: u64 = 900;
const DEFAULT_REFRESH_BUFFER_SECS: i64 = 300;

#[derive(Clone)]
struct CachedEntry {
    credentials: AwsCredentials,
    cache_expiration: DateTime<Utc>,
}

impl CachedEntry {
    fn needs_refresh(&self, buffer: ChronoDuration) -> bool {
        Utc::now() >= self.cache_expiration || self.credentials.expires_within(buffer)
    }
}

/// Caches credentials for a TTL, refreshing early when they are about to expire.
pub struct CachedCredentialProvider<P>
where
    P: CredentialProvider,
{
    inner: P,
    cache: Arc<RwLock<Option<CachedEntry>>>,
    cache_ttl: Duration,
    refresh_buffer: ChronoDuration,
}

impl<P> CachedCredentialProvider<P>
where
    P: CredentialProvider,
{
    pub fn new(provider: P) -> Self {
        Self::with_ttl(provider, Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn with_ttl(provider: P, ttl: Duration) -> Self {
        Self {
            inner: provider,
            cache: Arc::new(RwLock::new(None)),
            cache_ttl: ttl,
            refresh_buffer: ChronoDuration::seconds(DEFAULT_REFRESH_BUFFER_SECS),
        }
    }

    pub fn with_refresh_buffer(mut self, buffer: ChronoDuration) -> Self {
        self.refresh_buffer = buffer;
        self
    }

    pub async fn clear_cache(&self) {
        *self.cache.write().await = None;
    }

    async fn fetch_and_cache(&self) -> Result<AwsCredentials, CredentialError> {
        let credentials = self.inner.credentials().await?;

        let ttl = ChronoDuration::from_std(self.cache_ttl)
            .unwrap_or_else(|_| ChronoDuration::seconds(DEFAULT_CACHE_TTL_SECS as i64));
        let ttl_expiration = Utc::now() + ttl;
        let cache_expiration = match credentials.expiration() {
            Some(expiration) => (*expiration).min(ttl_expiration),
            None => ttl_expiration,
        };

        *self.cache.write().await = Some(CachedEntry {
            credentials: credentials.clone(),
            cache_expiration,
        });

        Ok(credentials)
    }
}

impl<P> Clone for CachedCredentialProvider<P>
where
    P: CredentialProvider + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: Arc::clone(&self.cache),
            cache_ttl: self.cache_ttl,
            refresh_buffer: self.refresh_buffer,
        }
    }
}

#[async_trait]
impl<P> CredentialProvider for CachedCredentialProvider<P>
where
    P: CredentialProvider,
{
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.as_ref() {
                if !entry.needs_refresh(self.refresh_buffer) {
                    return Ok(entry.credentials.clone());
                }
            }
        }

        self.fetch_and_cache().await
    }
}

impl<P> fmt::Debug for CachedCredentialProvider<P>
where
    P: CredentialProvider + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCredentialProvider")
            .field("inner", &self.inner)
            .field("cache_ttl", &self.cache_ttl)
            .field("refresh_buffer", &self.refresh_buffer)
            .finish()
    }
}
