//! Compound subject parsing.

use super::AuthError;
use crate::models::auth::{AuthenticatedUser, IdentityClaims};

/// Split a subject such as `auth0|abc123` on its first `|`.
pub fn split_subject(sub: &str) -> Result<(&str, &str), AuthError> {
    sub.split_once('|')
        .ok_or_else(|| AuthError::MalformedSubject(format!("no '|' in subject '{sub}'")))
}

impl AuthenticatedUser {
    /// Build the caller identity from verified claims.
    pub fn from_claims(claims: IdentityClaims) -> Result<Self, AuthError> {
        let (identity_provider, provider_local_id) = split_subject(&claims.sub)?;
        Ok(Self {
            identity_provider: identity_provider.to_string(),
            provider_local_id: provider_local_id.to_string(),
            email: claims.email,
            sub: claims.sub,
        })
    }
}
