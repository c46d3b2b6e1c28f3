//! Domain models shared by the API and the persistence client.

pub mod auth;
pub mod show;
pub mod user;

pub use auth::{AuthenticatedUser, IdentityClaims};
pub use show::{Episode, Image, Show};
pub use user::User;
