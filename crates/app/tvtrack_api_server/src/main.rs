//! tvtrack API server binary.
//!
//! Serves the GraphQL API at `/api` and the episode list at `/episodes`.

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tvtrack_api::config::{ApiConfig, is_production};
use tvtrack_api::graphql::GraphQLConfig;
use tvtrack_core::auth::AuthSettings;
use tvtrack_core::auth::constants::{
    AUTH0_AUDIENCE, AUTH0_DOMAIN, DEFAULT_JWKS_CACHE_TTL_SECS, DEFAULT_JWKS_REFETCH_INTERVAL_SECS,
    DEFAULT_VERIFY_TIMEOUT_SECS,
};

/// CLI arguments for the API server. Every flag falls back to an env var.
#[derive(Parser, Debug)]
#[command(name = "tvtrack_api_server", about = "tvtrack GraphQL API server")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// Host to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Persistence service endpoint.
    #[arg(long, env = "PRISMA_ENDPOINT", default_value = "")]
    prisma_endpoint: String,

    /// Persistence service secret.
    #[arg(long, env = "PRISMA_SECRET", default_value = "", hide_env_values = true)]
    prisma_secret: String,

    /// Deployment mode; `production` turns off persistence query logging.
    /// Falls back to `NODE_ENV`, then `development`.
    #[arg(long, env = "APP_ENV")]
    app_env: Option<String>,

    /// Identity-provider domain.
    #[arg(long, env = "AUTH0_DOMAIN", default_value = AUTH0_DOMAIN)]
    auth0_domain: String,

    /// Audience required in access tokens.
    #[arg(long, env = "AUTH0_AUDIENCE", default_value = AUTH0_AUDIENCE)]
    auth0_audience: String,

    /// Seconds allowed for token verification, key lookup included.
    #[arg(long, env = "AUTH_TIMEOUT_SECS", default_value_t = DEFAULT_VERIFY_TIMEOUT_SECS)]
    auth_timeout_secs: u64,

    /// Seconds a fetched key set stays cached.
    #[arg(long, env = "JWKS_CACHE_TTL_SECS", default_value_t = DEFAULT_JWKS_CACHE_TTL_SECS)]
    jwks_cache_ttl_secs: u64,

    /// Minimum seconds between key-set refetches caused by unknown key ids.
    #[arg(
        long,
        env = "JWKS_REFETCH_INTERVAL_SECS",
        default_value_t = DEFAULT_JWKS_REFETCH_INTERVAL_SECS
    )]
    jwks_refetch_interval_secs: u64,

    /// Disable schema introspection and GraphiQL discovery.
    #[arg(long, default_value_t = false)]
    no_introspection: bool,
}

impl Args {
    fn into_config(self) -> ApiConfig {
        let app_env = self
            .app_env
            .or_else(|| std::env::var("NODE_ENV").ok())
            .unwrap_or_else(|| "development".into());
        ApiConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            prisma_endpoint: self.prisma_endpoint,
            prisma_secret: self.prisma_secret,
            production: is_production(&app_env),
            auth: AuthSettings {
                domain: self.auth0_domain,
                audience: self.auth0_audience,
                timeout: Duration::from_secs(self.auth_timeout_secs),
            },
            jwks_cache_ttl: Duration::from_secs(self.jwks_cache_ttl_secs),
            jwks_refetch_interval: Duration::from_secs(self.jwks_refetch_interval_secs),
            graphql: GraphQLConfig {
                enable_introspection: !self.no_introspection,
                ..GraphQLConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tvtrack_api=debug,tvtrack_core=debug".into()),
        )
        .init();

    let config = Args::parse().into_config();
    if config.prisma_endpoint.is_empty() {
        tracing::warn!("PRISMA_ENDPOINT is not set; data queries will fail");
    }
    info!(
        bind_addr = %config.bind_addr,
        production = config.production,
        auth0_domain = %config.auth.domain,
        "starting tvtrack_api_server"
    );

    let bind_addr = config.bind_addr.clone();
    let state = tvtrack_api::AppState::from_config(config)?;
    let app = tvtrack_api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, path = tvtrack_api::API_PATH, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
