//! Small helpers shared by the handlers.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Render `data` as JSON text with `", "` and `": "` separators, keys in
/// insertion order and non-ASCII escaped as `\uXXXX`.
///
/// ```
/// use serde_json::json;
/// use ses_identity::utils::jsonify;
///
/// assert_eq!(jsonify(&json!({"foo": "bar", "n": [1, 2]})).unwrap(), r#"{"foo": "bar", "n": [1, 2]}"#);
/// ```
pub fn jsonify<T: Serialize + ?Sized>(data: &T) -> serde_json::Result<String> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    data.serialize(&mut serializer)?;
    // the formatter only ever writes ASCII
    Ok(String::from_utf8_lossy(&out).into_owned())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// URL-safe base64 without padding.
pub fn encode(data: &str) -> String {
    URL_SAFE_NO_PAD.encode(data.as_bytes())
}

/// Inverse of [`encode`]; padded input is accepted too.
pub fn decode(data: &str) -> Result<String, DecodeError> {
    let bytes = URL_SAFE_NO_PAD.decode(data.trim_end_matches('='))?;
    Ok(String::from_utf8(bytes)?)
}

/// Errors from [`decode`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded value is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The `index`-th `#`-separated segment counting from the end (1 is the last).
///
/// Returns `None` when `index` is 0 or larger than the number of segments.
pub fn last(data: &str, index: usize) -> Option<&str> {
    let segments: Vec<&str> = data.split('#').collect();
    index
        .checked_sub(1)
        .and_then(|back| segments.len().checked_sub(back + 1))
        .map(|i| segments[i])
}
