//! Fixed credentials.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use std::fmt;

/// Always returns the same credentials, failing once they expire.
#[derive(Clone)]
pub struct StaticCredentialProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        if self.credentials.is_expired() {
            return Err(CredentialError::Expired);
        }
        Ok(self.credentials.clone())
    }

    fn is_expired(&self) -> bool {
        self.credentials.is_expired()
    }
}

impl fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("credentials", &self.credentials)
            .finish()
    }
}
