//! # tvtrack_core
//!
//! Core domain logic for tvtrack: models, bearer-token authentication
//! against the identity provider's key set, and the persistence client.

pub mod auth;
pub mod hello;
pub mod initials;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
