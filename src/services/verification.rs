//! Identity verification actions (SES v1 Query API).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SesResult;
use crate::http::{HttpClient, SesRequest};
use crate::types::VerificationAttributes;
use crate::xml::parse_verification_attributes;

use super::VerificationApi;

/// v1 verification actions over an [`HttpClient`].
#[derive(Clone)]
pub struct VerificationService {
    http_client: Arc<dyn HttpClient>,
}

impl VerificationService {
    /// Wrap a signing HTTP client.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

/// `Identities.member.N` parameters, 1-based.
fn identity_members(identities: &[String]) -> Vec<(String, String)> {
    identities
        .iter()
        .enumerate()
        .map(|(i, identity)| (format!("Identities.member.{}", i + 1), identity.clone()))
        .collect()
}

#[async_trait]
impl VerificationApi for VerificationService {
    async fn get_identity_verification_attributes(
        &self,
        identities: &[String],
    ) -> SesResult<HashMap<String, VerificationAttributes>> {
        let request = SesRequest::action(
            "GetIdentityVerificationAttributes",
            identity_members(identities),
        );
        let response = self.http_client.send_request(request).await?;
        parse_verification_attributes(response.body_string()?)
    }

    async fn verify_email_identity(&self, email_address: &str) -> SesResult<()> {
        let request = SesRequest::action("VerifyEmailIdentity", [("EmailAddress", email_address)]);
        self.http_client.send_request(request).await?;
        Ok(())
    }
}
