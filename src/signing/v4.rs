//! SigV4 signing.

use super::cache::SigningKeyCache;
use super::canonical::{canonical_headers, canonical_query_string, normalize_uri_path, uri_encode};
use super::error::SigningError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::{HeaderMap, HeaderValue};
use sha2::{Digest, Sha256};
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Signing name shared by SES v1 and v2.
pub const SES_SERVICE: &str = "ses";

/// Region, service and key material for one signature.
#[derive(Clone, Debug)]
pub struct SigningParams {
    pub region: String,
    pub service: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl SigningParams {
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
        }
    }

    pub fn with_access_key(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = access_key_id.into();
        self
    }

    pub fn with_secret_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = secret_access_key.into();
        self
    }

    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SigningError::SigningFailed {
        message: format!("invalid HMAC key: {}", e),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, SigningError> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/aws4_request", date_stamp, region, service)
}

fn build_canonical_request(
    method: &str,
    uri: &str,
    query_params: &[(String, String)],
    headers: &HeaderMap,
    payload_hash: &str,
) -> (String, String) {
    let canonical_uri = uri_encode(&normalize_uri_path(uri), false);
    let canonical_query = canonical_query_string(query_params);
    let (canonical_headers, signed_headers) = canonical_headers(headers);

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.to_uppercase(),
        canonical_uri,
        canonical_query,
        canonical_headers,
        signed_headers,
        payload_hash
    );

    (canonical_request, signed_headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, SigningError> {
    HeaderValue::from_str(value).map_err(|e| SigningError::InvalidHeader {
        header: name.to_string(),
        message: e.to_string(),
    })
}

/// Sign a request in place.
///
/// Adds `x-amz-date`, `x-amz-content-sha256`, `x-amz-security-token` (when a
/// session token is present) and `authorization` to `headers`. The `host`
/// header must already be present.
#[allow(clippy::too_many_arguments)]
pub fn sign_request(
    method: &str,
    uri: &str,
    query_params: &[(String, String)],
    headers: &mut HeaderMap,
    payload: Option<&[u8]>,
    params: &SigningParams,
    timestamp: &DateTime<Utc>,
    cache: Option<Arc<SigningKeyCache>>,
) -> Result<(), SigningError> {
    if params.access_key_id.is_empty() {
        return Err(SigningError::SigningFailed {
            message: "Access key ID is required".to_string(),
        });
    }
    if params.secret_access_key.is_empty() {
        return Err(SigningError::SigningFailed {
            message: "Secret access key is required".to_string(),
        });
    }
    if !headers.contains_key(http::header::HOST) {
        return Err(SigningError::SigningFailed {
            message: "host header is required".to_string(),
        });
    }

    let date_stamp = format_date_stamp(timestamp);
    let amz_date = format_datetime(timestamp);
    let payload_hash = sha256_hex(payload.unwrap_or_default());

    headers.insert("x-amz-date", header_value("x-amz-date", &amz_date)?);
    headers.insert(
        "x-amz-content-sha256",
        header_value("x-amz-content-sha256", &payload_hash)?,
    );
    if let Some(token) = &params.session_token {
        headers.insert(
            "x-amz-security-token",
            header_value("x-amz-security-token", token)?,
        );
    }

    let (canonical_request, signed_headers) =
        build_canonical_request(method, uri, query_params, headers, &payload_hash);

    let credential_scope = build_credential_scope(&date_stamp, &params.region, &params.service);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        AWS_ALGORITHM,
        amz_date,
        credential_scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let signing_key = match cache {
        Some(cache) => match cache.get(&params.access_key_id, &params.region, &params.service, &date_stamp) {
            Some(key) => key,
            None => {
                let key = derive_signing_key(
                    &params.secret_access_key,
                    &date_stamp,
                    &params.region,
                    &params.service,
                )?;
                cache.put(
                    &params.access_key_id,
                    &params.region,
                    &params.service,
                    &date_stamp,
                    key.clone(),
                );
                key
            }
        },
        None => derive_signing_key(
            &params.secret_access_key,
            &date_stamp,
            &params.region,
            &params.service,
        )?,
    };

    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);
    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        AWS_ALGORITHM, params.access_key_id, credential_scope, signed_headers, signature
    );
    headers.insert("authorization", header_value("authorization", &authorization)?);

    Ok(())
}
