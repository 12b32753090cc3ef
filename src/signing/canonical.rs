//! Canonical request pieces for SigV4.

use http::HeaderMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Unreserved characters plus `/`.
const URI_PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Unreserved characters only.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// RFC 3986 encoding as SigV4 wants it; `/` is kept unless `encode_slash`.
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let set = if encode_slash { QUERY_SET } else { URI_PATH_SET };
    utf8_percent_encode(input, set).to_string()
}

/// Collapse empty, `.` and `..` segments, preserving a trailing slash.
pub fn normalize_uri_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut result = format!("/{}", segments.join("/"));
    if path.ends_with('/') && result.len() > 1 {
        result.push('/');
    }
    result
}

/// Sorted, encoded `key=value` pairs joined with `&`.
pub fn canonical_query_string(query_params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = query_params
        .iter()
        .map(|(k, v)| (uri_encode(k, true), uri_encode(v, true)))
        .collect();
    encoded.sort();

    encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Returns `(canonical_headers, signed_headers)` for the signable subset of `headers`.
pub fn canonical_headers(headers: &HeaderMap) -> (String, String) {
    let mut signed: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let name = name.as_str().to_ascii_lowercase();
        if !should_sign_header(&name) {
            continue;
        }
        let value = value
            .to_str()
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        signed.entry(name).or_default().push(value);
    }

    let canonical = signed
        .iter()
        .map(|(name, values)| format!("{}:{}\n", name, values.join(",")))
        .collect::<String>();
    let signed_headers = signed.keys().cloned().collect::<Vec<_>>().join(";");

    (canonical, signed_headers)
}

/// `host`, `x-amz-*` and content headers are signed.
pub fn should_sign_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name == "host"
        || name.starts_with("x-amz-")
        || matches!(name.as_str(), "content-type" | "content-md5" | "content-length")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("/v2/email/identities", false), "/v2/email/identities");
        assert_eq!(uri_encode("user@example.com", true), "user%40example.com");
        assert_eq!(uri_encode("a b/c", true), "a%20b%2Fc");
        // an already encoded path segment gets encoded again
        assert_eq!(
            uri_encode("/v2/email/identities/user%40example.com", false),
            "/v2/email/identities/user%2540example.com"
        );
    }

    #[test]
    fn test_normalize_uri_path() {
        assert_eq!(normalize_uri_path(""), "/");
        assert_eq!(normalize_uri_path("/"), "/");
        assert_eq!(normalize_uri_path("/foo//bar"), "/foo/bar");
        assert_eq!(normalize_uri_path("/foo/./bar/../baz"), "/foo/baz");
        assert_eq!(normalize_uri_path("/foo/bar/"), "/foo/bar/");
    }

    #[test]
    fn test_canonical_query_string_sorted_and_encoded() {
        let params = vec![
            ("PageSize".to_string(), "100".to_string()),
            ("NextToken".to_string(), "a+b/c=".to_string()),
        ];
        assert_eq!(
            canonical_query_string(&params),
            "NextToken=a%2Bb%2Fc%3D&PageSize=100"
        );
        assert_eq!(canonical_query_string(&[]), "");
    }

    #[test]
    fn test_canonical_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("email.us-east-1.amazonaws.com"));
        headers.insert("x-amz-date", HeaderValue::from_static("20240101T000000Z"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("user-agent", HeaderValue::from_static("ignored   agent"));

        let (canonical, signed) = canonical_headers(&headers);
        assert_eq!(
            canonical,
            "content-type:application/json\nhost:email.us-east-1.amazonaws.com\nx-amz-date:20240101T000000Z\n"
        );
        assert_eq!(signed, "content-type;host;x-amz-date");
    }
}
