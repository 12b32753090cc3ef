//! Follows SES verification links delivered through SNS.
//!
//! The verification email is routed to an SNS topic; each record's `Message`
//! is a JSON document whose `content` holds the raw email. The first
//! `https://email-verification...amazonaws...` link in it is fetched, which
//! completes verification of the address.

use async_trait::async_trait;
use lambda_runtime::LambdaEvent;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::utils::jsonify;

use super::{HandlerError, HandlerResult};

const VERIFICATION_URL_PATTERN: &str = r"https://email-verification.*amazonaws.*";

/// Issues the GET that completes verification.
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    /// Fetch `url`, failing on a non-2xx status. Returns the status code.
    async fn fetch(&self, url: &str) -> HandlerResult<u16>;
}

/// [`LinkFetcher`] backed by reqwest.
#[derive(Clone, Debug)]
pub struct HttpLinkFetcher {
    client: reqwest::Client,
}

impl HttpLinkFetcher {
    /// A fetcher with its own client and a 30 second timeout.
    pub fn new() -> HandlerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkFetcher for HttpLinkFetcher {
    async fn fetch(&self, url: &str) -> HandlerResult<u16> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.status().as_u16())
    }
}

/// SNS subscriber that confirms verification emails by following their link.
pub struct VerificationLinkHandler<F> {
    fetcher: F,
    pattern: Regex,
}

impl<F: LinkFetcher> VerificationLinkHandler<F> {
    /// Compile the link pattern. Fails only if the pattern itself is invalid.
    pub fn new(fetcher: F) -> HandlerResult<Self> {
        Ok(Self {
            fetcher,
            pattern: Regex::new(VERIFICATION_URL_PATTERN)?,
        })
    }

    /// The verification URL in `content`, if any.
    pub fn find_link<'a>(&self, content: &'a str) -> Option<&'a str> {
        self.pattern.find(content).map(|m| m.as_str().trim())
    }

    /// Process every SNS record. The first failure aborts the batch.
    pub async fn handle(&self, event: &Value) -> HandlerResult<()> {
        info!("Received event {}", jsonify(event).unwrap_or_default());

        let records = key(event, "Records")?
            .as_array()
            .ok_or_else(|| invalid("Records", "expected a list"))?;

        for record in records {
            let raw = key(key(record, "Sns")?, "Message")?
                .as_str()
                .ok_or_else(|| invalid("Message", "expected a string"))?;
            let message: Value = serde_json::from_str(raw)?;
            info!("Received message: {}", jsonify(&message).unwrap_or_default());

            let content = key(&message, "content")?
                .as_str()
                .ok_or_else(|| invalid("content", "expected a string"))?;

            if let Some(url) = self.find_link(content) {
                info!(url, "Verification URL");
                let status = self.fetcher.fetch(url).await?;
                info!(url, status, "Verification link fetched");
            }
        }

        Ok(())
    }

    /// Lambda entry point. Errors go back to the runtime so SNS can retry.
    pub async fn run(&self, event: LambdaEvent<Value>) -> Result<Value, lambda_runtime::Error> {
        self.handle(&event.payload).await?;
        Ok(Value::Null)
    }
}

fn key<'a>(value: &'a Value, name: &str) -> HandlerResult<&'a Value> {
    value.get(name).ok_or_else(|| HandlerError::missing_key(name))
}

fn invalid(name: &str, message: &str) -> HandlerError {
    HandlerError::InvalidValue {
        key: name.to_string(),
        message: message.to_string(),
    }
}
