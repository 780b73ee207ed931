//! Splitting and decoding a compact-serialized JWT.
//!
//! Only the header and payload are decoded. The signature is kept as the
//! raw base64url text; it is never checked here.
//!
//! Section decoding is lenient in the ways browser `atob` is: standard
//! alphabet characters (`+`, `/`), trailing `=` padding and non-zero
//! trailing bits in the final character are all accepted.

use base64ct::{Base64UrlUnpadded, Encoding as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{JwtError, Result, Section};

const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// A decoded token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecodedJwt {
    /// Parsed header JSON.
    pub header: Value,
    /// Parsed payload (claims) JSON.
    pub payload: Value,
    /// Header exactly as it appeared in the token.
    pub raw_header: String,
    /// Payload exactly as it appeared in the token.
    pub raw_payload: String,
    /// Signature exactly as it appeared in the token.
    pub raw_signature: String,
}

impl DecodedJwt {
    /// The `alg` header parameter.
    pub fn algorithm(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }

    /// The `typ` header parameter.
    pub fn token_type(&self) -> Option<&str> {
        self.header.get("typ").and_then(Value::as_str)
    }
}

/// Decode a token's header and payload.
///
/// ```
/// use jsonkit_jwt::decode;
///
/// let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
///              eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
///              SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";
/// let jwt = decode(token).unwrap();
/// assert_eq!(jwt.algorithm(), Some("HS256"));
/// assert_eq!(jwt.payload["name"], "John Doe");
/// ```
pub fn decode(token: &str) -> Result<DecodedJwt> {
    let token = token.trim();
    if token.is_empty() {
        return Err(JwtError::Empty);
    }

    let parts: Vec<&str> = token.split('.').collect();
    let [raw_header, raw_payload, raw_signature] = parts.as_slice() else {
        return Err(JwtError::PartCount { parts: parts.len() });
    };
    if raw_header.is_empty() || raw_payload.is_empty() || raw_signature.is_empty() {
        return Err(JwtError::EmptyPart);
    }

    let header = decode_section(raw_header, Section::Header)?;
    let payload = decode_section(raw_payload, Section::Payload)?;

    Ok(DecodedJwt {
        header,
        payload,
        raw_header: raw_header.to_string(),
        raw_payload: raw_payload.to_string(),
        raw_signature: raw_signature.to_string(),
    })
}

/// Rewrite a section into canonical unpadded base64url.
fn canonicalize(part: &str) -> String {
    let mut text: String = part
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    // The last character of a 2- or 3-character tail carries 4 or 2 bits
    // that do not reach the output; they must be zero for a strict decoder.
    let spare_bits = match text.len() % 4 {
        2 => 4,
        3 => 2,
        _ => 0,
    };
    if spare_bits > 0 {
        if let Some(last) = text.pop() {
            let canonical = URL_SAFE_ALPHABET
                .iter()
                .position(|&b| char::from(b) == last)
                .map(|sextet| char::from(URL_SAFE_ALPHABET[sextet & !((1 << spare_bits) - 1)]))
                .unwrap_or(last);
            text.push(canonical);
        }
    }
    text
}

fn decode_section(part: &str, section: Section) -> Result<Value> {
    let bytes = Base64UrlUnpadded::decode_vec(&canonicalize(part)).map_err(|e| {
        debug!(%section, error = %e, "base64url decoding failed");
        JwtError::Encoding { section }
    })?;
    let text = String::from_utf8(bytes).map_err(|_| JwtError::Encoding { section })?;
    serde_json::from_str(&text).map_err(|e| {
        debug!(%section, error = %e, "section is not JSON");
        JwtError::Json { section }
    })
}
