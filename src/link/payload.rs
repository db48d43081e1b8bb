//! Reading an invitation back out of an incoming link.
//!
//! Two link generations are in circulation: the packed `t` token (query
//! parameter or `/v/<token>` path segment) and the older plain `name` /
//! `sender` parameters. The packed form is tried first; plain parameters are
//! only consulted when no token is present.

use serde::{Deserialize, Serialize};

use super::token;
use crate::error::TokenError;
use crate::invitation::Invitation;

/// Query parameter carrying a packed token.
pub const TOKEN_PARAM: &str = "t";
/// Legacy recipient name parameter.
pub const NAME_PARAM: &str = "name";
/// Legacy sender contact parameter.
pub const SENDER_PARAM: &str = "sender";

/// Which link generation an invitation was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    /// `?t=<token>`
    QueryToken,
    /// `/v/<token>`
    PathToken,
    /// `?name=...&sender=...`
    PlainParams,
}

/// Outcome of reading a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPayload {
    /// The link carried no invitation parameters at all.
    Absent,
    /// A token was present but could not be decoded.
    Invalid(TokenError),
    /// An invitation was recovered.
    Present {
        invitation: Invitation,
        source: LinkSource,
    },
}

/// Link parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkParams {
    #[serde(default)]
    pub t: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
}

impl LinkParams {
    /// Collect known parameters from decoded key/value pairs. First
    /// occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                TOKEN_PARAM => &mut params.t,
                NAME_PARAM => &mut params.name,
                SENDER_PARAM => &mut params.sender,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// Parse a raw (still percent-encoded) query string, with or without the
    /// leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()).into_owned())
    }
}

impl LinkPayload {
    /// Read query parameters: packed token first, then legacy fields.
    pub fn from_params(params: &LinkParams) -> Self {
        if let Some(t) = params.t.as_deref().filter(|t| !t.trim().is_empty()) {
            return Self::from_token(t, LinkSource::QueryToken);
        }

        if params.name.is_none() && params.sender.is_none() {
            return Self::Absent;
        }

        Self::Present {
            invitation: Invitation::new(
                params.name.as_deref().unwrap_or_default(),
                params.sender.as_deref().unwrap_or_default(),
            ),
            source: LinkSource::PlainParams,
        }
    }

    /// Read a token carried as a path segment.
    pub fn from_path_token(token: &str) -> Self {
        Self::from_token(token, LinkSource::PathToken)
    }

    fn from_token(token: &str, source: LinkSource) -> Self {
        match token::try_decode(token) {
            Ok(invitation) => Self::Present { invitation, source },
            Err(e) => {
                tracing::debug!(error = %e, source = ?source, "Link token rejected");
                Self::Invalid(e)
            }
        }
    }

    /// The invitation to present; empty unless one was recovered.
    pub fn invitation(&self) -> Invitation {
        match self {
            Self::Present { invitation, .. } => invitation.clone(),
            Self::Absent | Self::Invalid(_) => Invitation::empty(),
        }
    }

    pub fn source(&self) -> Option<LinkSource> {
        match self {
            Self::Present { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// Short status label used by the JSON API.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Invalid(_) => "invalid",
            Self::Present { .. } => "present",
        }
    }
}
