//! Link assembly. The origin is supplied by the caller; nothing here knows
//! which host it is running on.

use serde::{Deserialize, Serialize};

use super::payload::{NAME_PARAM, SENDER_PARAM, TOKEN_PARAM};
use super::token;
use crate::invitation::Invitation;

/// Route that serves the question screen.
pub const VALENTINE_PATH: &str = "/valentine";
/// Route prefix for path-segment tokens.
pub const TOKEN_PATH_PREFIX: &str = "/v/";

/// Which shape of link to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkShape {
    /// `/valentine?t=<token>`
    #[default]
    Query,
    /// `/v/<token>`
    Path,
    /// `/valentine?name=<...>&sender=<digits>`
    Legacy,
}

impl std::fmt::Display for LinkShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Path => write!(f, "path"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for LinkShape {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("Unknown link shape: {other}")),
        }
    }
}

/// Build the shareable link for an invitation.
pub fn build_link(origin: &str, invitation: &Invitation, shape: LinkShape) -> String {
    let origin = origin.trim_end_matches('/');
    match shape {
        LinkShape::Query => {
            format!("{origin}{VALENTINE_PATH}?{TOKEN_PARAM}={}", token::encode(invitation))
        }
        LinkShape::Path => format!("{origin}{TOKEN_PATH_PREFIX}{}", token::encode(invitation)),
        LinkShape::Legacy => {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            query.append_pair(NAME_PARAM, invitation.recipient_name());
            if let Some(sender) = invitation.sender_contact() {
                query.append_pair(SENDER_PARAM, sender);
            }
            format!("{origin}{VALENTINE_PATH}?{}", query.finish())
        }
    }
}

/// Message sent alongside a link when sharing it with the recipient.
pub fn share_message(link: &str) -> String {
    format!("I made something special for you 💌 {link}")
}
