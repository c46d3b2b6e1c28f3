//! RS256 access-token verification.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use tracing::debug;

use super::constants::{self, AUTH0_AUDIENCE, AUTH0_DOMAIN, DEFAULT_VERIFY_TIMEOUT_SECS};
use super::{AuthError, KeyResolver, extract_bearer};
use crate::models::auth::{AuthenticatedUser, IdentityClaims};

/// Identity-provider parameters a token is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Provider domain; the issuer and key-set URL derive from it.
    pub domain: String,
    /// Expected `aud` claim.
    pub audience: String,
    /// Upper bound for key resolution plus verification.
    pub timeout: Duration,
}

impl AuthSettings {
    pub fn issuer(&self) -> String {
        constants::issuer(&self.domain)
    }

    pub fn jwks_uri(&self) -> String {
        constants::jwks_uri(&self.domain)
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            domain: AUTH0_DOMAIN.to_string(),
            audience: AUTH0_AUDIENCE.to_string(),
            timeout: Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
        }
    }
}

/// Verifies bearer tokens and derives the caller identity.
///
/// Shared by every request; holds no per-request state.
pub struct TokenVerifier {
    resolver: Arc<dyn KeyResolver>,
    validation: Validation,
    timeout: Duration,
}

impl TokenVerifier {
    pub fn new(resolver: Arc<dyn KeyResolver>, settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_issuer(&[settings.issuer()]);
        validation.validate_exp = true;
        Self {
            resolver,
            validation,
            timeout: settings.timeout,
        }
    }

    /// Resolve the caller from an `authorization` header value.
    ///
    /// No token gives `Ok(None)`. A token that fails any check is an error.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<Option<AuthenticatedUser>, AuthError> {
        match extract_bearer(authorization) {
            None => Ok(None),
            Some(token) => self.verify(token).await.map(Some),
        }
    }

    /// Verify one token. Attempted once; bounded by the configured timeout.
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        tokio::time::timeout(self.timeout, self.verify_inner(token))
            .await
            .map_err(|_| AuthError::Timeout)?
    }

    async fn verify_inner(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.resolver.resolve(&kid).await?;

        let data = decode::<IdentityClaims>(token, &key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        debug!(sub = %data.claims.sub, "token verified");

        AuthenticatedUser::from_claims(data.claims)
    }
}
