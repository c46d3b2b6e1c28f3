//! Per-operation GraphQL context.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use tokio::sync::OnceCell;
use tracing::debug;
use tvtrack_core::auth::{AuthError, TokenVerifier};
use tvtrack_core::models::{AuthenticatedUser, User};
use tvtrack_core::store::{Store, find_or_create_user};

use crate::error::AppError;

/// Context threaded into every resolver of one operation.
///
/// Built once per request; its fields never change. `authenticated_user` is present
/// exactly when a bearer token was presented and verified. The caller's
/// persisted record is looked up at most once per operation and shared by
/// every resolver that needs it.
#[derive(Clone)]
pub struct RequestContext {
    pub authenticated_user: Option<AuthenticatedUser>,
    pub store: Arc<dyn Store>,
    persisted: Arc<OnceCell<User>>,
    existing: Arc<OnceCell<Option<User>>>,
}

impl RequestContext {
    pub fn new(authenticated_user: Option<AuthenticatedUser>, store: Arc<dyn Store>) -> Self {
        Self {
            authenticated_user,
            store,
            persisted: Arc::new(OnceCell::new()),
            existing: Arc::new(OnceCell::new()),
        }
    }

    pub fn anonymous(store: Arc<dyn Store>) -> Self {
        Self::new(None, store)
    }

    /// The caller, or a `FORBIDDEN` error for anonymous requests.
    pub fn require_user(&self) -> Result<&AuthenticatedUser, AppError> {
        self.authenticated_user
            .as_ref()
            .ok_or_else(|| AppError::Forbidden("Not authorised!".into()))
    }

    /// Persisted user record for the caller, created on first access.
    pub async fn current_user(&self) -> Result<User, AppError> {
        let caller = self.require_user()?;
        let user = self
            .persisted
            .get_or_try_init(|| find_or_create_user(self.store.as_ref(), caller))
            .await?;
        Ok(user.clone())
    }

    /// Persisted user record for the caller if one exists. Never writes.
    pub async fn existing_user(&self) -> Result<Option<User>, AppError> {
        let Some(caller) = &self.authenticated_user else {
            return Ok(None);
        };
        if let Some(user) = self.persisted.get() {
            return Ok(Some(user.clone()));
        }
        let user = self
            .existing
            .get_or_try_init(|| self.store.user_by_auth0_id(&caller.provider_local_id))
            .await?;
        Ok(user.clone())
    }
}

/// Build the context for one request from its headers.
///
/// No `authorization` header gives an anonymous context. A header whose token
/// fails verification is an error and the operation must not run.
pub async fn build_request_context(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
    store: Arc<dyn Store>,
) -> Result<RequestContext, AuthError> {
    let authorization = headers
        .get(AUTHORIZATION)
        .map(|v| {
            v.to_str()
                .map_err(|_| AuthError::InvalidToken("authorization header is not ASCII".into()))
        })
        .transpose()?;
    let authenticated_user = verifier.authenticate(authorization).await?;
    if let Some(user) = &authenticated_user {
        debug!(provider = %user.identity_provider, "authenticated request");
    }
    Ok(RequestContext::new(authenticated_user, store))
}
