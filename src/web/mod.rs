//! HTTP surface: server-rendered screens plus a JSON API.

pub mod pages;
pub mod routes;

pub use routes::{AppState, app_routes};
