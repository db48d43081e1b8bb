//! The invitation value type and the input normalizers that feed it.

use serde::{Deserialize, Serialize};

/// Recipient name and optional sender contact carried through a link.
///
/// Immutable once built. Both constructors normalize their input, so a
/// value of this type always holds a display-ready name and a digit-only
/// contact (either may be empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Invitation {
    recipient_name: String,
    #[serde(serialize_with = "contact_or_null")]
    sender_contact: String,
}

// An empty contact goes out as `null`, matching `sender_contact()`.
#[allow(clippy::ptr_arg)]
fn contact_or_null<S>(contact: &String, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if contact.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_some(contact)
    }
}

impl Invitation {
    /// Build an invitation from raw user input.
    pub fn new(name: &str, contact: &str) -> Self {
        Self {
            recipient_name: normalize_name(name),
            sender_contact: sanitize_phone(contact),
        }
    }

    /// Build an invitation with no reply contact.
    pub fn named(name: &str) -> Self {
        Self::new(name, "")
    }

    /// The empty invitation used for the fallback greeting.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    /// Digit-only sender contact, if one was supplied.
    pub fn sender_contact(&self) -> Option<&str> {
        if self.sender_contact.is_empty() {
            None
        } else {
            Some(&self.sender_contact)
        }
    }

    pub fn has_name(&self) -> bool {
        !self.recipient_name.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.recipient_name.is_empty() && self.sender_contact.is_empty()
    }
}

// Deserialize through the normalizers so no caller can smuggle in an
// un-normalized value.
impl<'de> Deserialize<'de> for Invitation {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            recipient_name: Option<String>,
            #[serde(default)]
            sender_contact: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(
            raw.recipient_name.as_deref().unwrap_or_default(),
            raw.sender_contact.as_deref().unwrap_or_default(),
        ))
    }
}

/// Turn arbitrary input into a display-ready name.
///
/// Words are split on whitespace and each hyphen-delimited part is
/// capitalized: `"joHN mc-donald"` becomes `"John Mc-Donald"`. Whitespace-only
/// input yields an empty string.
pub fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalize_part)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_part(part: &str) -> String {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    // Only the first char of the uppercase mapping stays uppercase; the
    // tail of a multi-char mapping ("ß" -> "SS") is lowercased with the rest
    // so a second pass is a no-op.
    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(part.len());
    if let Some(head) = upper.next() {
        out.push(head);
    }
    let tail: String = upper.chain(chars).collect();
    out.push_str(&tail.to_lowercase());
    out
}

/// Strip every character that is not an ASCII decimal digit.
pub fn sanitize_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_capitalizes_words_and_hyphen_parts() {
        assert_eq!(normalize_name("joHN mc-donald"), "John Mc-Donald");
        assert_eq!(normalize_name("  mary   ANNE  "), "Mary Anne");
        assert_eq!(normalize_name("jean-luc-PICARD"), "Jean-Luc-Picard");
    }

    #[test]
    fn normalize_keeps_empty_hyphen_parts() {
        assert_eq!(normalize_name("a--b"), "A--B");
        assert_eq!(normalize_name("-x-"), "-X-");
    }

    #[test]
    fn normalize_blank_input_is_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name(" \t\n "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "joHN mc-donald",
            "  spaced\tout\nname ",
            "ßtraße",
            "ǆemal",
            "İstanbul",
            "élodie-ÉMILIE",
            "a--b- -c",
            "123 abc",
            "",
            "ﬁnn",
        ];
        for s in samples {
            let once = normalize_name(s);
            assert_eq!(normalize_name(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn sanitize_strips_non_digits() {
        assert_eq!(sanitize_phone("+234 801-234-5678"), "2348012345678");
        assert_eq!(sanitize_phone(""), "");
        assert_eq!(sanitize_phone("call me"), "");
        // Non-ASCII digits are not decimal digits for link purposes.
        assert_eq!(sanitize_phone("١٢٣4"), "4");
    }

    #[test]
    fn invitation_normalizes_on_construction() {
        let inv = Invitation::new(" sam ", "+1 555 000 1111");
        assert_eq!(inv.recipient_name(), "Sam");
        assert_eq!(inv.sender_contact(), Some("15550001111"));
        assert!(inv.has_name());
    }

    #[test]
    fn empty_contact_reads_as_none() {
        let inv = Invitation::named("jane");
        assert_eq!(inv.sender_contact(), None);
        assert!(!inv.is_empty());
        assert!(Invitation::empty().is_empty());
    }

    #[test]
    fn deserialize_goes_through_normalizers() {
        let inv: Invitation = serde_json::from_str(
            r#"{"recipient_name": "  jANE doe", "sender_contact": "+44 (0) 20"}"#,
        )
        .unwrap();
        assert_eq!(inv, Invitation::new("Jane Doe", "44020"));
    }

    #[test]
    fn missing_contact_serializes_as_null() {
        let json = serde_json::to_value(Invitation::named("jane")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"recipient_name": "Jane", "sender_contact": null})
        );

        let back: Invitation = serde_json::from_value(json).unwrap();
        assert_eq!(back, Invitation::named("Jane"));

        let with = serde_json::to_value(Invitation::new("sam", "+1 555")).unwrap();
        assert_eq!(with["sender_contact"], "1555");
    }
}
