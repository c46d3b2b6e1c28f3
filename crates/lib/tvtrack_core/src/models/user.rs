//! Persisted application user.

use serde::{Deserialize, Serialize};

/// A user record keyed by the identity provider's local id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(rename = "auth0id")]
    pub auth0_id: String,
    #[serde(default)]
    pub email: Option<String>,
}
