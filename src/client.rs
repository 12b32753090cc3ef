//! SES client entry point.
//!
//! [`SesClient`] owns one signed HTTP client and hands out the service groups
//! lazily. It is meant to be built once per Lambda execution environment and
//! shared across invocations.
//!
//! ```rust,no_run
//! use ses_identity::SesClient;
//! use ses_identity::services::IdentityApi;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SesClient::from_env()?;
//! let identities = client.identities().list_email_identities().await?;
//! # Ok(())
//! # }
//! ```

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::SesConfig;
use crate::error::SesResult;
use crate::http::{HttpClient, SesHttpClient};
use crate::services::{IdentityService, ReceiptRuleService, VerificationService};

/// Entry point to SES. Cloning is cheap; clones share the HTTP client and the
/// lazily created services.
#[derive(Clone)]
pub struct SesClient {
    http_client: Arc<dyn HttpClient>,
    identity_service: Arc<OnceCell<IdentityService>>,
    verification_service: Arc<OnceCell<VerificationService>>,
    receipt_rule_service: Arc<OnceCell<ReceiptRuleService>>,
}

impl SesClient {
    /// Build the signing HTTP client for `config`.
    pub fn new(config: SesConfig) -> SesResult<Self> {
        Ok(Self::with_http_client(Arc::new(SesHttpClient::new(config)?)))
    }

    /// Build from `AWS_REGION`, `SES_ENDPOINT` and the default credential chain.
    pub fn from_env() -> SesResult<Self> {
        Self::new(SesConfig::from_env()?)
    }

    /// Use a prebuilt client, e.g. one pointed at a mock server.
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            identity_service: Arc::new(OnceCell::new()),
            verification_service: Arc::new(OnceCell::new()),
            receipt_rule_service: Arc::new(OnceCell::new()),
        }
    }

    /// v2 email identities and identity policies.
    pub fn identities(&self) -> &IdentityService {
        self.identity_service
            .get_or_init(|| IdentityService::new(self.http_client.clone()))
    }

    /// v1 verification attributes and verification emails.
    pub fn verification(&self) -> &VerificationService {
        self.verification_service
            .get_or_init(|| VerificationService::new(self.http_client.clone()))
    }

    /// v1 active receipt rule set.
    pub fn receipt_rules(&self) -> &ReceiptRuleService {
        self.receipt_rule_service
            .get_or_init(|| ReceiptRuleService::new(self.http_client.clone()))
    }

    pub fn region(&self) -> &str {
        self.http_client.region()
    }

    pub fn endpoint(&self) -> &str {
        self.http_client.endpoint()
    }
}

impl std::fmt::Debug for SesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesClient")
            .field("region", &self.region())
            .field("endpoint", &self.endpoint())
            .finish()
    }
}
