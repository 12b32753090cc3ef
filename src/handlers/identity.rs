//! `Custom::SesIdentity`: email and domain identities.
//!
//! Create and update make sure the identity exists. Domain identities report
//! their DKIM tokens and TXT verification token as resource data; email
//! identities get verification emails until verified, then their sending
//! policy is upserted. Delete removes the identity if SES still has it.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cfn::{CustomResourceEvent, CustomResourceHandler};
use crate::client::SesClient;
use crate::poller;
use crate::services::{IdentityApi, VerificationApi};
use crate::types::{EmailIdentity, IdentityInfo, IdentityType};
use crate::utils::jsonify;

use super::{HandlerError, HandlerResult};

/// Email address or domain; also the physical resource id.
pub const IDENTITY_PROPERTY: &str = "Identity";
/// Optional sending authorization policy name.
pub const POLICY_NAME_PROPERTY: &str = "PolicyName";
/// Policy document, a JSON object or string. Ignored without a name.
pub const POLICY_DOCUMENT_PROPERTY: &str = "PolicyDocument";

/// Custom-resource handler that keeps one SES identity in sync with the stack.
///
/// Email identities block on verification (see [`poller::verify_email_identity`]),
/// so the function timeout needs to cover the full polling window.
#[derive(Clone)]
pub struct IdentityHandler {
    identities: Arc<dyn IdentityApi>,
    verification: Arc<dyn VerificationApi>,
}

impl IdentityHandler {
    /// Build from service traits; tests pass mocks here.
    pub fn new(identities: Arc<dyn IdentityApi>, verification: Arc<dyn VerificationApi>) -> Self {
        Self {
            identities,
            verification,
        }
    }

    /// Use the v2 identity and v1 verification services of `client`.
    pub fn from_client(client: &SesClient) -> Self {
        Self::new(
            Arc::new(client.identities().clone()),
            Arc::new(client.verification().clone()),
        )
    }

    /// Current identities keyed by name.
    async fn list_email_identities(&self) -> HandlerResult<HashMap<String, IdentityInfo>> {
        let identities: HashMap<String, IdentityInfo> = self
            .identities
            .list_email_identities()
            .await?
            .into_iter()
            .map(|info| (info.identity_name.clone(), info))
            .collect();

        info!(
            "Current email identities: {}",
            jsonify(&identities).unwrap_or_default()
        );
        Ok(identities)
    }

    async fn domain_data(
        &self,
        identity: &str,
        ses_identity: &EmailIdentity,
    ) -> HandlerResult<Map<String, Value>> {
        let tokens = ses_identity.dkim_tokens().ok_or_else(|| {
            HandlerError::MissingAttribute(format!("No DKIM tokens returned for {}", identity))
        })?;

        let attributes = self
            .verification
            .get_identity_verification_attributes(&[identity.to_string()])
            .await?;
        info!(
            "Verification attributes: {}",
            jsonify(&attributes).unwrap_or_default()
        );

        let token = attributes
            .get(identity)
            .and_then(|a| a.verification_token.clone())
            .ok_or_else(|| {
                HandlerError::MissingAttribute(format!(
                    "No verification token returned for {}",
                    identity
                ))
            })?;

        let mut data = Map::new();
        data.insert("DkimTokens".to_string(), Value::from(tokens.to_vec()));
        data.insert("VerificationToken".to_string(), Value::String(token));
        Ok(data)
    }

    /// Update the named policy if the identity has it, create it otherwise.
    async fn put_policy(&self, identity: &str, name: &str, document: &Value) -> HandlerResult<()> {
        let policy = jsonify(document)?;
        let policies = self.identities.get_email_identity_policies(identity).await?;

        if policies.contains_key(name) {
            info!(identity, policy_name = name, "Updating identity policy");
            self.identities
                .update_email_identity_policy(identity, name, &policy)
                .await?;
        } else {
            info!(identity, policy_name = name, "Creating identity policy");
            self.identities
                .create_email_identity_policy(identity, name, &policy)
                .await?;
        }
        Ok(())
    }
}

/// JSON truthiness: null, false, 0 and empty strings, lists or objects are
/// all "not set".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[async_trait]
impl CustomResourceHandler for IdentityHandler {
    async fn create(&self, event: &mut CustomResourceEvent) -> HandlerResult<()> {
        let identity = event.property(IDENTITY_PROPERTY)?.to_string();
        event.physical_resource_id = Some(identity.clone());

        let policy_name = event
            .optional_property(POLICY_NAME_PROPERTY)
            .filter(|v| is_truthy(v))
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| HandlerError::InvalidValue {
                    key: POLICY_NAME_PROPERTY.to_string(),
                    message: format!("expected a string, got {}", v),
                })
            })
            .transpose()?;
        let policy_document = event
            .optional_property(POLICY_DOCUMENT_PROPERTY)
            .filter(|v| is_truthy(v))
            .cloned();

        let existing = self.list_email_identities().await?;
        let ses_identity = if existing.contains_key(&identity) {
            self.identities.get_email_identity(&identity).await?
        } else {
            info!(identity = %identity, "Creating email identity");
            self.identities.create_email_identity(&identity).await?
        };
        info!("SES identity: {}", jsonify(&ses_identity).unwrap_or_default());

        match ses_identity.identity_type {
            IdentityType::Domain => {
                event.data = Some(self.domain_data(&identity, &ses_identity).await?);
            }
            IdentityType::EmailAddress => {
                let verified =
                    poller::verify_email_identity(self.verification.as_ref(), &identity).await?;
                if !verified {
                    warn!(identity = %identity, "Email identity is still unverified");
                }

                if let (Some(name), Some(document)) = (policy_name, policy_document) {
                    self.put_policy(&identity, &name, &document).await?;
                }
            }
            IdentityType::ManagedDomain => {}
        }

        Ok(())
    }

    async fn delete(&self, event: &mut CustomResourceEvent) -> HandlerResult<()> {
        let identity = event.property(IDENTITY_PROPERTY)?;
        let existing = self.list_email_identities().await?;

        if existing.contains_key(identity) {
            info!(identity, "Deleting email identity");
            self.identities.delete_email_identity(identity).await?;
        } else {
            info!(identity, "Email identity not found, nothing to delete");
        }
        Ok(())
    }
}
