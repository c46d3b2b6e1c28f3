//! Bearer-token authentication against the identity provider.
//!
//! Tokens are RS256 JWTs issued by the provider; the verification key is
//! looked up by `kid` in the provider's published key set.

pub mod constants;
pub mod jwks;
pub mod subject;
pub mod verify;

use thiserror::Error;

pub use jwks::{JwksClient, KeyResolver, StaticKeys};
pub use verify::{AuthSettings, TokenVerifier};

/// Authentication errors. Every variant means the presented token is not
/// acceptable; an absent token is not an error.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("No signing key with id '{0}'")]
    KeyNotFound(String),

    #[error("Key set unavailable: {0}")]
    KeyFetch(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Malformed subject: {0}")]
    MalformedSubject(String),

    #[error("Token verification timed out")]
    Timeout,
}

/// Pull the token out of an `authorization` header value.
///
/// `Bearer <token>` (any case) yields `<token>`; a value without a scheme is
/// taken as the token itself. Missing or blank headers, and a bare scheme with
/// no credentials, yield `None`.
pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}
