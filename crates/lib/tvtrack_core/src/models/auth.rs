//! Authentication domain models.
//!
//! Nothing here is persisted: an `AuthenticatedUser` is derived from a
//! verified bearer token for one request and dropped afterwards.

use serde::{Deserialize, Serialize};

/// Claims read from a verified identity-provider access token.
///
/// Audience, issuer and expiry are checked by the verifier before these are
/// deserialized, so only the fields the application uses are listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Compound subject, e.g. `auth0|5c1f...`.
    pub sub: String,
    /// Email, when the provider includes it in the token.
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// Identity of the caller behind a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub email: Option<String>,
    /// Full subject claim.
    pub sub: String,
    /// Part of the subject before the first `|` (e.g. `auth0`, `google-oauth2`).
    pub identity_provider: String,
    /// Part of the subject after the first `|`.
    pub provider_local_id: String,
}
