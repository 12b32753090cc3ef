//! Receipt rule set activation (SES v1 Query API).

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::SesResult;
use crate::http::{HttpClient, SesRequest};

use super::ReceiptRuleApi;

/// v1 `SetActiveReceiptRuleSet` over an [`HttpClient`].
#[derive(Clone)]
pub struct ReceiptRuleService {
    http_client: Arc<dyn HttpClient>,
}

impl ReceiptRuleService {
    /// Wrap a signing HTTP client.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl ReceiptRuleApi for ReceiptRuleService {
    /// Omitting the name deactivates whichever rule set is active.
    async fn set_active_receipt_rule_set(&self, rule_set_name: Option<String>) -> SesResult<()> {
        let params: Vec<(&str, String)> = rule_set_name
            .map(|name| vec![("RuleSetName", name)])
            .unwrap_or_default();

        let request = SesRequest::action("SetActiveReceiptRuleSet", params);
        self.http_client.send_request(request).await?;
        Ok(())
    }
}
