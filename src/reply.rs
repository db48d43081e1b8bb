//! Outbound messaging hand-off.
//!
//! Builds a WhatsApp deep link with a pre-filled message. Touch-class devices
//! get the native `whatsapp://` scheme; everything else gets the `wa.me` web
//! fallback.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::invitation::sanitize_phone;

static MOBILE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)iPhone|iPad|iPod|Android").expect("static regex")
});

/// Message the recipient sends back after accepting.
pub const ACCEPT_REPLY_MESSAGE: &str = "Yes, I'd be your Valentine! 💕";

/// Coarse device class, used to pick the deep link scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceClass {
    pub fn from_user_agent(user_agent: &str) -> Self {
        if MOBILE_UA.is_match(user_agent) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Percent-encode a message for a URI query value. Spaces become `%20`.
pub fn encode_component(text: &str) -> String {
    // byte_serialize escapes a literal '+' as %2B, so any '+' left is a space.
    url::form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Deep link that opens a chat with `phone` and `message` pre-filled.
///
/// Returns `None` when the number has no digits, so callers can hide or
/// no-op the reply action instead of emitting a broken link.
pub fn reply_uri(phone: &str, message: &str, device: DeviceClass) -> Option<String> {
    let phone = sanitize_phone(phone);
    if phone.is_empty() {
        return None;
    }

    let text = encode_component(message);
    Some(match device {
        DeviceClass::Mobile => format!("whatsapp://send?phone={phone}&text={text}"),
        DeviceClass::Desktop => format!("https://wa.me/{phone}?text={text}"),
    })
}
