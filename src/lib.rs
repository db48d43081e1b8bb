//! Valentine Link: shareable "Will you be my Valentine?" invitations.

pub mod celebration;
pub mod composer;
pub mod config;
pub mod error;
pub mod invitation;
pub mod link;
pub mod presentation;
pub mod reply;
pub mod sessions;
pub mod web;
