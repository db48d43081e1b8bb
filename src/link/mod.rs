//! Shareable links: token codec, link assembly, and incoming-link decoding.

pub mod builder;
pub mod payload;
pub mod token;

pub use builder::{LinkShape, TOKEN_PATH_PREFIX, VALENTINE_PATH, build_link, share_message};
pub use payload::{LinkParams, LinkPayload, LinkSource};
