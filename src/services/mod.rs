//! SES operations grouped by concern.
//!
//! Each group is a trait (the port the handlers depend on) plus a service that
//! implements it over an [`HttpClient`](crate::http::HttpClient):
//!
//! - [`IdentityApi`] / [`IdentityService`]: v2 email identities and policies
//! - [`VerificationApi`] / [`VerificationService`]: v1 verification attributes and emails
//! - [`ReceiptRuleApi`] / [`ReceiptRuleService`]: v1 active receipt rule set

pub mod identities;
pub mod receipt_rules;
pub mod verification;

pub use identities::IdentityService;
pub use receipt_rules::ReceiptRuleService;
pub use verification::VerificationService;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::SesResult;
use crate::types::{EmailIdentity, IdentityInfo, VerificationAttributes};

/// SES v2 email identity operations.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Every identity in the account, following `NextToken` to the last page.
    async fn list_email_identities(&self) -> SesResult<Vec<IdentityInfo>>;

    async fn get_email_identity(&self, identity: &str) -> SesResult<EmailIdentity>;

    async fn create_email_identity(&self, identity: &str) -> SesResult<EmailIdentity>;

    async fn delete_email_identity(&self, identity: &str) -> SesResult<()>;

    /// Policy documents keyed by policy name.
    async fn get_email_identity_policies(&self, identity: &str) -> SesResult<HashMap<String, String>>;

    async fn create_email_identity_policy(
        &self,
        identity: &str,
        policy_name: &str,
        policy: &str,
    ) -> SesResult<()>;

    async fn update_email_identity_policy(
        &self,
        identity: &str,
        policy_name: &str,
        policy: &str,
    ) -> SesResult<()>;
}

/// SES v1 verification actions.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    async fn get_identity_verification_attributes(
        &self,
        identities: &[String],
    ) -> SesResult<HashMap<String, VerificationAttributes>>;

    /// Sends (or resends) the verification email.
    async fn verify_email_identity(&self, email_address: &str) -> SesResult<()>;
}

/// SES v1 receipt rule set actions.
#[async_trait]
pub trait ReceiptRuleApi: Send + Sync {
    async fn set_active_receipt_rule_set(&self, rule_set_name: Option<String>) -> SesResult<()>;
}
