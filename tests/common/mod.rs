//! Shared helpers for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use ses_identity::cfn::{CfnResponse, CustomResourceEvent, ResponseSender};
use ses_identity::{HandlerResult, SesClient, SesConfig};
use std::sync::Mutex;
use wiremock::MockServer;

/// Client signing with fixed credentials against `server`, without retries.
pub fn client_for(server: &MockServer) -> SesClient {
    let config = SesConfig::builder()
        .region("us-east-1")
        .endpoint(server.uri())
        .credentials("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .max_retries(0)
        .build()
        .unwrap();
    SesClient::new(config).unwrap()
}

pub fn verification_attributes_xml(entries: &[(&str, &str, Option<&str>)]) -> String {
    let entries: String = entries
        .iter()
        .map(|(identity, status, token)| {
            let token = token
                .map(|t| format!("<VerificationToken>{}</VerificationToken>", t))
                .unwrap_or_default();
            format!(
                "<entry><key>{}</key><value><VerificationStatus>{}</VerificationStatus>{}</value></entry>",
                identity, status, token
            )
        })
        .collect();

    format!(
        r#"<GetIdentityVerificationAttributesResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <GetIdentityVerificationAttributesResult>
    <VerificationAttributes>{}</VerificationAttributes>
  </GetIdentityVerificationAttributesResult>
  <ResponseMetadata><RequestId>d5b5ec07-0000-4000-8000-000000000000</RequestId></ResponseMetadata>
</GetIdentityVerificationAttributesResponse>"#,
        entries
    )
}

pub fn query_ok_xml(action: &str) -> String {
    format!(
        r#"<{action}Response xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <{action}Result/>
  <ResponseMetadata><RequestId>0b7f5c9a-0000-4000-8000-000000000000</RequestId></ResponseMetadata>
</{action}Response>"#,
        action = action
    )
}

pub fn query_error_xml(code: &str, message: &str) -> String {
    format!(
        r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <Error>
    <Type>Sender</Type>
    <Code>{}</Code>
    <Message>{}</Message>
  </Error>
  <RequestId>6c1a9e2b-0000-4000-8000-000000000000</RequestId>
</ErrorResponse>"#,
        code, message
    )
}

/// A custom-resource event; `response_url` empty skips the upload.
pub fn cfn_event(request_type: &str, response_url: &str, properties: Value) -> CustomResourceEvent {
    serde_json::from_value(json!({
        "RequestType": request_type,
        "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:ses-identity",
        "ResponseURL": response_url,
        "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/mail/6f3c2a10",
        "RequestId": "4f1d7c8e-0000-4000-8000-000000000000",
        "LogicalResourceId": "MailIdentity",
        "ResourceType": "Custom::SesIdentity",
        "ResourceProperties": properties,
    }))
    .unwrap()
}

/// Keeps responses in memory instead of uploading them.
#[derive(Default)]
pub struct CapturingSender {
    pub responses: Mutex<Vec<CfnResponse>>,
}

#[async_trait]
impl ResponseSender for CapturingSender {
    async fn send(&self, _response_url: &str, response: &CfnResponse) -> HandlerResult<()> {
        self.responses.lock().unwrap().push(response.clone());
        Ok(())
    }
}
