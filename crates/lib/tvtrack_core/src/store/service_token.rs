//! Service tokens for the persistence endpoint.
//!
//! The data service authenticates callers with a short-lived HS256 JWT signed
//! with the shared service secret and naming the `service@stage` it targets.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::StoreError;

/// Service token lifetime.
const SERVICE_TOKEN_EXPIRY_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGrant {
    /// `name@stage` of the target service.
    pub service: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceClaims {
    pub data: ServiceGrant,
    pub iat: i64,
    pub exp: i64,
}

/// Derive `name@stage` from an endpoint such as `https://host/tvtrack/dev`.
/// Missing path segments default to `default`.
pub fn service_name(endpoint: &Url) -> String {
    let mut segments = endpoint
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty());
    let name = segments.next().unwrap_or("default");
    let stage = segments.next().unwrap_or("default");
    format!("{name}@{stage}")
}

/// Sign a service token for `endpoint`.
pub fn generate_service_token(endpoint: &Url, secret: &[u8]) -> Result<String, StoreError> {
    let now = Utc::now();
    let claims = ServiceClaims {
        data: ServiceGrant {
            service: service_name(endpoint),
            roles: vec!["admin".to_string()],
        },
        iat: now.timestamp(),
        exp: (now + Duration::seconds(SERVICE_TOKEN_EXPIRY_SECS)).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| StoreError::Transport(format!("service token: {e}")))
}
