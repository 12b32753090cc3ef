//! `Custom::SesRuleSet`: the account's active receipt rule set.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::cfn::{CustomResourceEvent, CustomResourceHandler};
use crate::client::SesClient;
use crate::services::ReceiptRuleApi;

use super::HandlerResult;

/// Receipt rule set to activate. Required for every request type.
pub const RULE_SET_NAME_PROPERTY: &str = "RuleSetName";

/// Custom-resource handler that activates a receipt rule set.
#[derive(Clone)]
pub struct RuleSetHandler {
    receipt_rules: Arc<dyn ReceiptRuleApi>,
}

impl RuleSetHandler {
    /// Build from a [`ReceiptRuleApi`]; tests pass a mock.
    pub fn new(receipt_rules: Arc<dyn ReceiptRuleApi>) -> Self {
        Self { receipt_rules }
    }

    /// Use the receipt rule service of `client`.
    pub fn from_client(client: &SesClient) -> Self {
        Self::new(Arc::new(client.receipt_rules().clone()))
    }
}

#[async_trait]
impl CustomResourceHandler for RuleSetHandler {
    async fn create(&self, event: &mut CustomResourceEvent) -> HandlerResult<()> {
        let rule_set = event.property(RULE_SET_NAME_PROPERTY)?;
        info!(rule_set, "Activating receipt rule set");
        self.receipt_rules
            .set_active_receipt_rule_set(Some(rule_set.to_string()))
            .await?;
        Ok(())
    }

    /// Deactivates whichever rule set is active, not necessarily the one named
    /// by the resource. The name is still required.
    async fn delete(&self, event: &mut CustomResourceEvent) -> HandlerResult<()> {
        let rule_set = event.property(RULE_SET_NAME_PROPERTY)?;
        info!(rule_set, "Deactivating active receipt rule set");
        self.receipt_rules.set_active_receipt_rule_set(None).await?;
        Ok(())
    }
}
