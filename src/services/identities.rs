//! Email identity and identity policy operations (SES v2 REST API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SesResult;
use crate::http::{encode_path_segment, HttpClient, SesRequest};
use crate::types::{EmailIdentity, IdentityInfo};

use super::IdentityApi;

const IDENTITIES_PATH: &str = "/v2/email/identities";

/// Page size requested from `ListEmailIdentities`.
pub const LIST_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateEmailIdentityRequest<'a> {
    email_identity: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PolicyRequest<'a> {
    policy: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListEmailIdentitiesResponse {
    #[serde(default)]
    email_identities: Vec<IdentityInfo>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetEmailIdentityPoliciesResponse {
    #[serde(default)]
    policies: HashMap<String, String>,
}

/// v2 identity operations over an [`HttpClient`].
#[derive(Clone)]
pub struct IdentityService {
    http_client: Arc<dyn HttpClient>,
}

impl IdentityService {
    /// Wrap a signing HTTP client. Usually reached through [`SesClient::identities`].
    ///
    /// [`SesClient::identities`]: crate::SesClient::identities
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    fn identity_path(identity: &str) -> String {
        format!("{}/{}", IDENTITIES_PATH, encode_path_segment(identity))
    }

    fn policy_path(identity: &str, policy_name: &str) -> String {
        format!(
            "{}/policies/{}",
            Self::identity_path(identity),
            encode_path_segment(policy_name)
        )
    }

    async fn list_page(&self, next_token: Option<&str>) -> SesResult<ListEmailIdentitiesResponse> {
        let mut request = SesRequest::get(IDENTITIES_PATH).query("PageSize", LIST_PAGE_SIZE.to_string());
        if let Some(token) = next_token {
            request = request.query("NextToken", token);
        }

        self.http_client.send_request(request).await?.json()
    }
}

#[async_trait]
impl IdentityApi for IdentityService {
    async fn list_email_identities(&self) -> SesResult<Vec<IdentityInfo>> {
        let mut identities = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self.list_page(next_token.as_deref()).await?;
            identities.extend(page.email_identities);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(identities)
    }

    async fn get_email_identity(&self, identity: &str) -> SesResult<EmailIdentity> {
        let request = SesRequest::get(Self::identity_path(identity));
        self.http_client.send_request(request).await?.json()
    }

    async fn create_email_identity(&self, identity: &str) -> SesResult<EmailIdentity> {
        let request = SesRequest::post(IDENTITIES_PATH).json(&CreateEmailIdentityRequest {
            email_identity: identity,
        })?;
        self.http_client.send_request(request).await?.json()
    }

    async fn delete_email_identity(&self, identity: &str) -> SesResult<()> {
        let request = SesRequest::delete(Self::identity_path(identity));
        self.http_client.send_request(request).await?;
        Ok(())
    }

    async fn get_email_identity_policies(&self, identity: &str) -> SesResult<HashMap<String, String>> {
        let request = SesRequest::get(format!("{}/policies", Self::identity_path(identity)));
        let response: GetEmailIdentityPoliciesResponse =
            self.http_client.send_request(request).await?.json()?;
        Ok(response.policies)
    }

    async fn create_email_identity_policy(
        &self,
        identity: &str,
        policy_name: &str,
        policy: &str,
    ) -> SesResult<()> {
        let request = SesRequest::post(Self::policy_path(identity, policy_name))
            .json(&PolicyRequest { policy })?;
        self.http_client.send_request(request).await?;
        Ok(())
    }

    async fn update_email_identity_policy(
        &self,
        identity: &str,
        policy_name: &str,
        policy: &str,
    ) -> SesResult<()> {
        let request = SesRequest::put(Self::policy_path(identity, policy_name))
            .json(&PolicyRequest { policy })?;
        self.http_client.send_request(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_encode_identity() {
        assert_eq!(
            IdentityService::identity_path("user@example.com"),
            "/v2/email/identities/user%40example.com"
        );
        assert_eq!(
            IdentityService::policy_path("user@example.com", "send policy"),
            "/v2/email/identities/user%40example.com/policies/send%20policy"
        );
    }

    #[test]
    fn test_list_response_without_token() {
        let page: ListEmailIdentitiesResponse =
            serde_json::from_str(r#"{"EmailIdentities": []}"#).unwrap();
        assert!(page.email_identities.is_empty());
        assert!(page.next_token.is_none());
    }
}
