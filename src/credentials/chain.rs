//! Tries several credential providers in order.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Returns the credentials of the first provider that succeeds.
#[derive(Clone, Default)]
pub struct ChainCredentialProvider {
    providers: Vec<Arc<dyn CredentialProvider + Send + Sync>>,
}

impl ChainCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider<P>(mut self, provider: P) -> Self
    where
        P: CredentialProvider + Send + Sync + 'static,
    {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

#[async_trait]
impl CredentialProvider for ChainCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            match provider.credentials().await {
                Ok(credentials) => return Ok(credentials),
                Err(e) => {
                    tracing::debug!(error = %e, "credential provider in chain failed");
                    failures.push(e.to_string());
                }
            }
        }

        if failures.is_empty() {
            return Err(CredentialError::Missing {
                message: "No credential providers configured in chain".to_string(),
            });
        }

        Err(CredentialError::LoadFailed {
            source: "provider chain".to_string(),
            message: failures.join("; "),
        })
    }

    fn is_expired(&self) -> bool {
        !self.providers.is_empty() && self.providers.iter().all(|p| p.is_expired())
    }
}

impl fmt::Debug for ChainCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainCredentialProvider")
            .field("provider_count", &self.providers.len())
            .finish()
    }
}
