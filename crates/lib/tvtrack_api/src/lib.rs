//! # tvtrack_api
//!
//! GraphQL API and server-rendered views for tvtrack.

pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tvtrack_core::auth::{JwksClient, TokenVerifier};
use tvtrack_core::store::{PrismaClient, Store};

use crate::config::ApiConfig;
use crate::error::{AppResult, InitError};
use crate::graphql::{TvSchema, build_schema};
use crate::graphql::handler::{graphiql, graphql_handler, schema_sdl};
use crate::handlers::{episodes, health};
use crate::views::EpisodeListView;

/// Mount point of the GraphQL endpoint.
pub const API_PATH: &str = "/api";

/// Process-wide state: built once at startup, shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Persistence client.
    pub store: Arc<dyn Store>,
    /// Bearer-token verifier.
    pub verifier: Arc<TokenVerifier>,
    /// Executable schema.
    pub schema: TvSchema,
    /// Compiled HTML templates.
    pub views: Arc<EpisodeListView>,
}

impl AppState {
    /// Assemble state from explicit collaborators.
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn Store>,
        verifier: Arc<TokenVerifier>,
    ) -> AppResult<Self> {
        Ok(Self {
            schema: build_schema(&config.graphql),
            views: Arc::new(EpisodeListView::new()?),
            config,
            store,
            verifier,
        })
    }

    /// Build the production collaborators (persistence client and remote
    /// key set) from configuration.
    pub fn from_config(config: ApiConfig) -> Result<Self, InitError> {
        let store = PrismaClient::new(config.prisma())?;
        let jwks = JwksClient::new(config.auth.jwks_uri(), config.jwks_cache_ttl, config.auth.timeout)?
            .with_refetch_interval(config.jwks_refetch_interval)?;
        info!(
            jwks_uri = %jwks.jwks_uri(),
            production = config.production,
            "initialised persistence and key-set clients"
        );
        let verifier = TokenVerifier::new(Arc::new(jwks), &config.auth);
        Ok(Self::new(config, Arc::new(store), Arc::new(verifier))?)
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(API_PATH, get(graphiql).post(graphql_handler))
        .route("/api/schema.graphql", get(schema_sdl))
        .route("/episodes", get(episodes::upcoming_episodes_page))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
