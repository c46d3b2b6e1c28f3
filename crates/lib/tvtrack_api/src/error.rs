//! Application error types.
//!
//! The same enum feeds HTTP error bodies (via `IntoResponse`) and GraphQL
//! field errors (via `ErrorExtensions`, which adds an `extensions.code`).

use async_graphql::ErrorExtensions;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tvtrack_core::auth::AuthError;
use tvtrack_core::store::StoreError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body for non-GraphQL error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application-level errors with HTTP status and GraphQL code mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code, shared by both surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "BAD_USER_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Provider(_) => "PROVIDER_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show clients; internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Provider(_) => "Provider error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(%detail, "internal error");
        }
        let body = Json(ErrorResponse {
            error: self.code().to_lowercase(),
            message: self.public_message(),
        });
        (self.status(), body).into_response()
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.public_message()).extend_with(|_, e| e.set("code", self.code()))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => AppError::NotFound(what),
            other => {
                tracing::warn!(error = %other, "persistence provider failure");
                AppError::Provider(other.to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::Unauthenticated("Authentication failed".into())
    }
}

/// Failures while assembling the process-wide state at startup.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Persistence client: {0}")]
    Store(#[from] StoreError),

    #[error("Key set client: {0}")]
    Auth(#[from] AuthError),

    #[error("Views: {0}")]
    Views(#[from] AppError),
}

/// Convert any error that maps onto [`AppError`] into a coded GraphQL error.
pub trait GraphQLResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<AppError>> GraphQLResultExt<T> for Result<T, E> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| Into::<AppError>::into(e).extend())
    }
}
