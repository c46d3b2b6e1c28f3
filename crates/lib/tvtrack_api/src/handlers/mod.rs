//! Request handlers outside the GraphQL mount point.

pub mod episodes;
pub mod health;
