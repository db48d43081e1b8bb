//! Error types for Valentine Link.

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Composer error: {0}")]
    Compose(#[from] ComposeError),

    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Why a packed token could not be decoded.
///
/// Never surfaced to the recipient; the presentation flow degrades to the
/// fallback greeting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token is empty")]
    Empty,

    #[error("Token is not valid base64: {0}")]
    Base64(String),

    #[error("Token bytes are not valid UTF-8")]
    Utf8,

    #[error("Token record is malformed: {0}")]
    Record(String),
}

/// Refusals from the composer wizard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("Recipient name is required")]
    MissingName,

    #[error("Sender contact number is required")]
    MissingContact,

    #[error("Link is not ready; regenerate it first")]
    NotReady,
}

/// Invalid state machine transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Already in state {state}, cannot {action}")]
    Terminal { state: String, action: String },
}

/// Session store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session {id} not found")]
    NotFound { id: Uuid },

    #[error("Invalid session ID: {0}")]
    InvalidId(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
