//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;
use crate::link::LinkShape;

/// Server configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Listen port.
    pub port: u16,
    /// Origin used in generated links. When unset the request's `Host`
    /// header is used.
    pub public_origin: Option<String>,
    /// Shape of generated links.
    pub link_shape: LinkShape,
    /// Sessions are pruned after this much inactivity.
    pub session_idle_timeout: Duration,
    /// How often the prune sweep runs.
    pub prune_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            public_origin: None,
            link_shape: LinkShape::Query,
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            prune_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Numbers fall back to their defaults when unparsable; an unknown link
    /// shape is rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = lookup("VALENTINE_BIND").unwrap_or(defaults.bind);

        let port: u16 = lookup("VALENTINE_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let public_origin = lookup("VALENTINE_PUBLIC_ORIGIN")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        let link_shape = match lookup("VALENTINE_LINK_SHAPE") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "VALENTINE_LINK_SHAPE".to_string(),
                message,
            })?,
            None => defaults.link_shape,
        };

        let session_idle_timeout = lookup("VALENTINE_SESSION_IDLE_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_idle_timeout);

        let prune_interval = lookup("VALENTINE_PRUNE_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.prune_interval);

        Ok(Self {
            bind,
            port,
            public_origin,
            link_shape,
            session_idle_timeout,
            prune_interval,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
