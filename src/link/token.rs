//! Packed-token codec.
//!
//! An invitation is serialized as a small JSON record (`name`, then
//! `sender`), and the UTF-8 bytes are base64-encoded with the URL-safe
//! alphabet and no padding. The result is safe to drop into a query value or
//! a path segment unescaped.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::invitation::Invitation;

/// Wire record inside a token. Field order is part of the format.
#[derive(Debug, Serialize, Deserialize)]
struct PackedRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sender: String,
}

/// Encode an invitation into an opaque URL-safe token.
pub fn encode(invitation: &Invitation) -> String {
    let record = PackedRecord {
        name: invitation.recipient_name().to_string(),
        sender: invitation.sender_contact().unwrap_or_default().to_string(),
    };
    // A struct of two strings always serializes.
    let json = serde_json::to_vec(&record).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a token, reporting why it failed.
///
/// Accepts tokens that still carry the standard `+`/`/` alphabet or `=`
/// padding, as produced by older link generators.
pub fn try_decode(token: &str) -> Result<Invitation, TokenError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let normalized: String = token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    let json = std::str::from_utf8(&bytes).map_err(|_| TokenError::Utf8)?;
    let record: PackedRecord =
        serde_json::from_str(json).map_err(|e| TokenError::Record(e.to_string()))?;

    Ok(Invitation::new(&record.name, &record.sender))
}

/// Total decode: garbage yields the empty invitation.
pub fn decode(token: &str) -> Invitation {
    try_decode(token).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Discarding malformed link token");
        Invitation::empty()
    })
}
