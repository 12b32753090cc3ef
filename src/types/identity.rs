//! Identity types shared by the v1 and v2 SES APIs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Type of email identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityType {
    EmailAddress,
    Domain,
    ManagedDomain,
}

impl IdentityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityType::EmailAddress => "EMAIL_ADDRESS",
            IdentityType::Domain => "DOMAIN",
            IdentityType::ManagedDomain => "MANAGED_DOMAIN",
        }
    }
}

impl fmt::Display for IdentityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verification state of an identity.
///
/// The v2 API spells these `SUCCESS`, `TEMPORARY_FAILURE`, ...; the v1 Query
/// API spells them `Success`, `TemporaryFailure`, .... Both parse to the same
/// variant; values SES adds later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerificationStatus {
    Pending,
    Success,
    Failed,
    TemporaryFailure,
    NotStarted,
    Other(String),
}

impl VerificationStatus {
    /// v1 spelling.
    pub fn as_str(&self) -> &str {
        match self {
            VerificationStatus::Pending => "Pending",
            VerificationStatus::Success => "Success",
            VerificationStatus::Failed => "Failed",
            VerificationStatus::TemporaryFailure => "TemporaryFailure",
            VerificationStatus::NotStarted => "NotStarted",
            VerificationStatus::Other(s) => s,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationStatus::Success)
    }
}

impl From<&str> for VerificationStatus {
    fn from(value: &str) -> Self {
        let normalized: String = value
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "pending" => VerificationStatus::Pending,
            "success" => VerificationStatus::Success,
            "failed" => VerificationStatus::Failed,
            "temporaryfailure" => VerificationStatus::TemporaryFailure,
            "notstarted" => VerificationStatus::NotStarted,
            _ => VerificationStatus::Other(value.to_string()),
        }
    }
}

impl From<String> for VerificationStatus {
    fn from(value: String) -> Self {
        VerificationStatus::from(value.as_str())
    }
}

impl From<VerificationStatus> for String {
    fn from(value: VerificationStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DKIM attributes of a v2 identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DkimAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// CNAME tokens to publish for Easy DKIM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_attributes_origin: Option<String>,
}

/// One entry of `ListEmailIdentities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_type: Option<IdentityType>,
    pub identity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sending_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
}

/// Body of `GetEmailIdentity` and `CreateEmailIdentity` responses.
///
/// `CreateEmailIdentity` only fills in the type, the sending status and the
/// DKIM attributes; everything else stays `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailIdentity {
    pub identity_type: IdentityType,
    #[serde(default)]
    pub verified_for_sending_status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_forwarding_status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dkim_attributes: Option<DkimAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
}

impl EmailIdentity {
    /// DKIM tokens, if SES returned any.
    pub fn dkim_tokens(&self) -> Option<&[String]> {
        self.dkim_attributes
            .as_ref()
            .and_then(|dkim| dkim.tokens.as_deref())
    }
}

/// Per-identity result of the v1 `GetIdentityVerificationAttributes` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerificationAttributes {
    pub verification_status: VerificationStatus,
    /// Only present for domain identities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Success", VerificationStatus::Success)]
    #[case("SUCCESS", VerificationStatus::Success)]
    #[case("Pending", VerificationStatus::Pending)]
    #[case("TEMPORARY_FAILURE", VerificationStatus::TemporaryFailure)]
    #[case("TemporaryFailure", VerificationStatus::TemporaryFailure)]
    #[case("NOT_STARTED", VerificationStatus::NotStarted)]
    #[case("Revoked", VerificationStatus::Other("Revoked".to_string()))]
    fn test_verification_status_parsing(#[case] raw: &str, #[case] expected: VerificationStatus) {
        assert_eq!(VerificationStatus::from(raw), expected);
    }

    #[test]
    fn test_verification_status_serializes_v1_spelling() {
        let json = serde_json::to_string(&VerificationStatus::TemporaryFailure).unwrap();
        assert_eq!(json, "\"TemporaryFailure\"");
    }

    #[test]
    fn test_email_identity_from_get_response() {
        let body = serde_json::json!({
            "IdentityType": "DOMAIN",
            "FeedbackForwardingStatus": true,
            "VerifiedForSendingStatus": false,
            "DkimAttributes": {
                "SigningEnabled": true,
                "Status": "PENDING",
                "Tokens": ["t1", "t2", "t3"],
                "SigningAttributesOrigin": "AWS_SES"
            },
            "Policies": {},
            "Tags": [],
            "VerificationStatus": "PENDING"
        });

        let identity: EmailIdentity = serde_json::from_value(body).unwrap();
        assert_eq!(identity.identity_type, IdentityType::Domain);
        assert_eq!(
            identity.dkim_tokens(),
            Some(&["t1".to_string(), "t2".to_string(), "t3".to_string()][..])
        );
        assert_eq!(identity.verification_status, Some(VerificationStatus::Pending));
    }

    #[test]
    fn test_email_identity_from_create_response() {
        let body = serde_json::json!({
            "IdentityType": "EMAIL_ADDRESS",
            "VerifiedForSendingStatus": false
        });

        let identity: EmailIdentity = serde_json::from_value(body).unwrap();
        assert_eq!(identity.identity_type, IdentityType::EmailAddress);
        assert!(identity.dkim_tokens().is_none());
    }

    #[test]
    fn test_identity_info() {
        let info: IdentityInfo = serde_json::from_value(serde_json::json!({
            "IdentityType": "EMAIL_ADDRESS",
            "IdentityName": "user@example.com",
            "SendingEnabled": true,
            "VerificationStatus": "SUCCESS"
        }))
        .unwrap();

        assert_eq!(info.identity_name, "user@example.com");
        assert_eq!(info.verification_status, Some(VerificationStatus::Success));
    }
}
