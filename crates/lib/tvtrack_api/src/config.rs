//! API server configuration.

use std::time::Duration;

use tvtrack_core::auth::AuthSettings;
use tvtrack_core::store::PrismaConfig;

use crate::graphql::GraphQLConfig;

/// Configuration for the API server.
///
/// Filled in by the server binary from its flags and environment.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:4000").
    pub bind_addr: String,
    /// Persistence service endpoint.
    pub prisma_endpoint: String,
    /// Persistence service secret.
    pub prisma_secret: String,
    /// Production mode disables persistence debug logging.
    pub production: bool,
    /// Identity-provider settings.
    pub auth: AuthSettings,
    /// How long a fetched key set is trusted.
    pub jwks_cache_ttl: Duration,
    /// Minimum spacing of key-set refetches forced by unknown key ids.
    pub jwks_refetch_interval: Duration,
    /// Schema limits and introspection.
    pub graphql: GraphQLConfig,
}

impl ApiConfig {
    /// Persistence client settings derived from this configuration.
    pub fn prisma(&self) -> PrismaConfig {
        PrismaConfig {
            endpoint: self.prisma_endpoint.clone(),
            secret: self.prisma_secret.clone(),
            debug: !self.production,
            ..PrismaConfig::default()
        }
    }
}

/// `production` (any case) is the only production mode.
pub fn is_production(app_env: &str) -> bool {
    app_env.trim().eq_ignore_ascii_case("production")
}
