//! Transport encoding: binary-to-text (base64) and text-to-URL (percent escaping).
//!
//! The two steps are independent. The stored payload is the base64 string;
//! escaping is only applied when the payload is embedded in a link.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{DecodeErrorKind, Qr3kError, Result};

/// Characters left unescaped by ECMAScript `encodeURIComponent`.
///
/// Links already printed as QR codes were built with that function, so the
/// escape set must match it byte for byte.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode raw bytes as standard padded base64
pub fn base64_encode(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode standard padded base64 into raw bytes
pub fn base64_decode(encoded: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    Ok(BASE64.decode(encoded)?)
}

/// Length of the base64 encoding of `n` bytes: `4 * ceil(n / 3)`
pub fn base64_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Escape `text` for use as a single query-string value
pub fn url_escape(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Invert [`url_escape`].
///
/// Rejects `%` not followed by two hex digits and escapes that decode to
/// invalid UTF-8, rather than passing them through.
pub fn url_unescape(escaped: &str) -> Result<String> {
    let bytes = escaped.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Qr3kError::decode(
                    DecodeErrorKind::UrlEscape,
                    format!("malformed escape sequence at offset {i}"),
                ));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(escaped)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Qr3kError::decode(DecodeErrorKind::UrlEscape, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_binary_roundtrip() {
        let data: Vec<u8> = (0..=255).collect();
        let encoded = base64_encode(&data);
        assert_eq!(base64_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_base64_len_matches_encoder() {
        for n in 0..40 {
            assert_eq!(base64_encode(&vec![0u8; n]).len(), base64_len(n), "n = {n}");
        }
    }

    #[test]
    fn test_base64_rejects_garbage() {
        let err = base64_decode("@@@@").unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Base64));
    }

    #[test]
    fn test_url_escape_base64_alphabet() {
        assert_eq!(url_escape("ab+c/d=="), "ab%2Bc%2Fd%3D%3D");
    }

    #[test]
    fn test_url_escape_matches_encode_uri_component() {
        // encodeURIComponent("https://a.b/?x=1 2&y=é!~*'()")
        assert_eq!(
            url_escape("https://a.b/?x=1 2&y=é!~*'()"),
            "https%3A%2F%2Fa.b%2F%3Fx%3D1%202%26y%3D%C3%A9!~*'()"
        );
    }

    #[test]
    fn test_url_unescape_roundtrip() {
        let text = "c=\"🎮\"; x = a+b/2;";
        assert_eq!(url_unescape(&url_escape(text)).unwrap(), text);
    }

    #[test]
    fn test_url_unescape_rejects_malformed() {
        for bad in ["abc%", "abc%4", "abc%zz", "%C3%28"] {
            let err = url_unescape(bad).unwrap_err();
            assert_eq!(err.decode_kind(), Some(DecodeErrorKind::UrlEscape), "{bad}");
        }
    }
}
