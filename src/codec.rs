//! Compact-token payload decoding.
//!
//! TRUST MODEL
//! ===========
//! [`decode`] does NOT verify the token signature. It only pulls the middle
//! segment apart so the UI can pick a dashboard variant or prefill a name.
//! No authorization decision may rest on its output alone; the remote
//! identity server re-validates the token on every privileged call.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

/// Standard alphabet, canonical padding, tolerant of non-zero trailing bits
/// the way browser `atob` is.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Debug, thiserror::Error)]
enum ClaimsError {
    #[error("token has fewer than two segments")]
    MissingSegment,
    #[error("payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("payload is not json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a json object")]
    NotAnObject,
}

/// Claims read out of a token payload. Ephemeral; never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedClaims {
    payload: Map<String, Value>,
}

impl DecodedClaims {
    /// Wrap an already-parsed payload object.
    #[must_use]
    pub fn from_payload(payload: Map<String, Value>) -> Self {
        Self { payload }
    }

    /// The raw payload, field for field.
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Raw claim lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Subject identifier (`sub`, `id` or `userId`). Numeric ids are stringified.
    #[must_use]
    pub fn subject_id(&self) -> Option<String> {
        ["sub", "id", "userId"]
            .iter()
            .find_map(|key| match self.payload.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.first_str(&["email"])
    }

    #[must_use]
    pub fn display_name_hint(&self) -> Option<&str> {
        self.first_str(&["name", "fullName", "username"])
    }

    /// Role string as issued (`ADMIN`, `RENTER`, ...), not yet mapped.
    #[must_use]
    pub fn role_hint(&self) -> Option<&str> {
        self.first_str(&["role", "userType"])
    }

    /// True only when the payload carries a literal boolean `true`.
    #[must_use]
    pub fn is_admin_flag(&self) -> bool {
        ["isAdmin", "is_admin"]
            .iter()
            .any(|key| matches!(self.payload.get(*key), Some(Value::Bool(true))))
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| match self.payload.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        })
    }
}

/// Decode the payload segment of a `header.payload.signature` token.
///
/// Returns `None` on any failure: missing segment, bad base64, invalid
/// UTF-8, invalid JSON, or a payload that is not an object. Never panics.
/// Non-verifying; see the module docs.
#[must_use]
pub fn decode(token: &str) -> Option<DecodedClaims> {
    match decode_payload(token) {
        Ok(payload) => Some(DecodedClaims::from_payload(payload)),
        Err(e) => {
            tracing::debug!(error = %e, "token payload not decodable");
            None
        }
    }
}

fn decode_payload(token: &str) -> Result<Map<String, Value>, ClaimsError> {
    let mut segments = token.split('.');
    let _header = segments.next();
    let payload = segments.next().ok_or(ClaimsError::MissingSegment)?;

    let bytes = PAYLOAD_ENGINE.decode(to_standard_alphabet(payload))?;
    let text = String::from_utf8(bytes)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        _ => Err(ClaimsError::NotAnObject),
    }
}

/// Map the URL-safe alphabet onto the standard one and right-pad to a
/// multiple of four.
fn to_standard_alphabet(segment: &str) -> String {
    let mut out: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while out.len() % 4 != 0 {
        out.push('=');
    }
    out
}
