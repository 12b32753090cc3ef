//! XML parsing for the v1 Query API responses.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

use crate::error::{AwsErrorResponse, SesError, SesResult};
use crate::types::{VerificationAttributes, VerificationStatus};

fn xml_error(e: impl std::fmt::Display) -> SesError {
    SesError::Serialization {
        message: format!("Invalid XML response: {}", e),
    }
}

/// Parse an `ErrorResponse` document.
pub fn parse_error_document(xml: &str) -> SesResult<AwsErrorResponse> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut code = String::new();
    let mut message = String::new();
    let mut request_id = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current_element = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(xml_error)?.to_string();
                match current_element.as_str() {
                    "Code" => code = text,
                    "Message" => message = text,
                    "RequestId" => request_id = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    if code.is_empty() {
        return Err(xml_error("ErrorResponse without an error code"));
    }

    Ok(AwsErrorResponse {
        error_type: code,
        message,
        request_id,
    })
}

/// Parse a `GetIdentityVerificationAttributesResponse` into a map keyed by identity.
///
/// ```rust
/// use ses_identity::xml::parse_verification_attributes;
///
/// let xml = r#"<GetIdentityVerificationAttributesResponse>
///   <GetIdentityVerificationAttributesResult>
///     <VerificationAttributes>
///       <entry>
///         <key>example.com</key>
///         <value>
///           <VerificationStatus>Pending</VerificationStatus>
///           <VerificationToken>abc123</VerificationToken>
///         </value>
///       </entry>
///     </VerificationAttributes>
///   </GetIdentityVerificationAttributesResult>
/// </GetIdentityVerificationAttributesResponse>"#;
///
/// let attributes = parse_verification_attributes(xml).unwrap();
/// assert_eq!(attributes["example.com"].verification_token.as_deref(), Some("abc123"));
/// ```
pub fn parse_verification_attributes(
    xml: &str,
) -> SesResult<HashMap<String, VerificationAttributes>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut attributes = HashMap::new();
    let mut in_entry = false;
    let mut key: Option<String> = None;
    let mut status: Option<String> = None;
    let mut token: Option<String> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "entry" {
                    in_entry = true;
                    key = None;
                    status = None;
                    token = None;
                }
                current_element = name;
            }
            Ok(Event::Text(e)) if in_entry => {
                let text = e.unescape().map_err(xml_error)?.to_string();
                match current_element.as_str() {
                    "key" => key = Some(text),
                    "VerificationStatus" => status = Some(text),
                    "VerificationToken" => token = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"entry" {
                    in_entry = false;
                    if let Some(identity) = key.take() {
                        let verification_status = status
                            .take()
                            .map(VerificationStatus::from)
                            .ok_or_else(|| {
                                xml_error(format!("no VerificationStatus for {}", identity))
                            })?;
                        attributes.insert(
                            identity,
                            VerificationAttributes {
                                verification_status,
                                verification_token: token.take(),
                            },
                        );
                    }
                }
                current_element.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_document() {
        let xml = r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <Error>
    <Type>Sender</Type>
    <Code>InvalidParameterValue</Code>
    <Message>Invalid email address &lt;bad&gt;.</Message>
  </Error>
  <RequestId>0ff3e8c1-0000-4000-8000-000000000000</RequestId>
</ErrorResponse>"#;

        let error = parse_error_document(xml).unwrap();
        assert_eq!(error.error_type, "InvalidParameterValue");
        assert_eq!(error.message, "Invalid email address <bad>.");
        assert_eq!(
            error.request_id.as_deref(),
            Some("0ff3e8c1-0000-4000-8000-000000000000")
        );
    }

    #[test]
    fn test_parse_error_document_without_code() {
        assert!(parse_error_document("<Something><Else/></Something>").is_err());
    }

    #[test]
    fn test_parse_verification_attributes_multiple_entries() {
        let xml = r#"<GetIdentityVerificationAttributesResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
  <GetIdentityVerificationAttributesResult>
    <VerificationAttributes>
      <entry>
        <key>user@example.com</key>
        <value><VerificationStatus>Success</VerificationStatus></value>
      </entry>
      <entry>
        <key>example.com</key>
        <value>
          <VerificationStatus>Pending</VerificationStatus>
          <VerificationToken>QTKknzFg2J4ygwa+XvHAxUl1hyHoY0gVfZdfjIedHZ0=</VerificationToken>
        </value>
      </entry>
    </VerificationAttributes>
  </GetIdentityVerificationAttributesResult>
  <ResponseMetadata><RequestId>r-1</RequestId></ResponseMetadata>
</GetIdentityVerificationAttributesResponse>"#;

        let attributes = parse_verification_attributes(xml).unwrap();
        assert_eq!(attributes.len(), 2);

        let email = &attributes["user@example.com"];
        assert!(email.verification_status.is_verified());
        assert_eq!(email.verification_token, None);

        let domain = &attributes["example.com"];
        assert_eq!(domain.verification_status, VerificationStatus::Pending);
        assert_eq!(
            domain.verification_token.as_deref(),
            Some("QTKknzFg2J4ygwa+XvHAxUl1hyHoY0gVfZdfjIedHZ0=")
        );
    }

    #[test]
    fn test_parse_verification_attributes_empty() {
        let xml = r#"<GetIdentityVerificationAttributesResponse>
  <GetIdentityVerificationAttributesResult><VerificationAttributes/></GetIdentityVerificationAttributesResult>
</GetIdentityVerificationAttributesResponse>"#;
        assert!(parse_verification_attributes(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml() {
        assert!(parse_verification_attributes("<a><b></a>").is_err());
    }
}
