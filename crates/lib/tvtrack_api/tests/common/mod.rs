//! Shared fixtures: an in-memory store, a verifier trusting the test key set,
//! and token minting.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use tvtrack_api::config::ApiConfig;
use tvtrack_api::graphql::GraphQLConfig;
use tvtrack_api::{AppState, router};
use tvtrack_core::auth::{AuthSettings, StaticKeys, TokenVerifier};
use async_trait::async_trait;
use tvtrack_core::models::{Episode, Image, Show, User};
use tvtrack_core::store::{MemoryStore, Page, Store, StoreResult};

pub const JWKS: &str = include_str!("../../../tvtrack_core/tests/fixtures/jwks.json");
pub const SIGNING_KEY: &[u8] = include_bytes!("../../../tvtrack_core/tests/fixtures/signing_key.pem");
pub const ROGUE_KEY: &[u8] = include_bytes!("../../../tvtrack_core/tests/fixtures/rogue_key.pem");

pub const DOMAIN: &str = "tenant.example.com";
pub const AUDIENCE: &str = "https://api.example.com";

pub fn config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        prisma_endpoint: String::new(),
        prisma_secret: String::new(),
        production: false,
        auth: AuthSettings {
            domain: DOMAIN.into(),
            audience: AUDIENCE.into(),
            timeout: Duration::from_secs(5),
        },
        jwks_cache_ttl: Duration::from_secs(600),
        jwks_refetch_interval: Duration::from_secs(30),
        graphql: GraphQLConfig::default(),
    }
}

pub fn app(store: Arc<dyn Store>) -> Router {
    let config = config();
    let keys = StaticKeys::from_json(JWKS).expect("test key set");
    let verifier = TokenVerifier::new(Arc::new(keys), &config.auth);
    let state = AppState::new(config, store, Arc::new(verifier)).expect("state");
    router(state)
}

pub fn token_with_key(sub: &str, key: &[u8]) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some("test-key-1".into());
    let claims = json!({
        "sub": sub,
        "email": "viewer@example.com",
        "aud": AUDIENCE,
        "iss": format!("https://{DOMAIN}/"),
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(&header, &claims, &EncodingKey::from_rsa_pem(key).expect("pem")).expect("sign")
}

pub fn token(sub: &str) -> String {
    token_with_key(sub, SIGNING_KEY)
}

/// POST a GraphQL operation, returning the HTTP status and JSON body.
pub async fn graphql(
    app: Router,
    token: Option<&str>,
    query: &str,
    variables: Value,
) -> (StatusCode, Value) {
    let mut req = Request::builder()
        .method("POST")
        .uri("/api")
        .header("content-type", "application/json");
    if let Some(token) = token {
        req = req.header("authorization", format!("Bearer {token}"));
    }
    let body = json!({ "query": query, "variables": variables }).to_string();
    let resp = app
        .oneshot(req.body(Body::from(body)).unwrap())
        .await
        .expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("parse JSON"))
}

pub async fn seed_show(store: &MemoryStore, name: &str, image: Option<&str>) -> Show {
    store
        .insert_show(Show {
            id: String::new(),
            external_id: Some(169),
            name: name.into(),
            image: image.map(|url| Image {
                medium: Some(url.into()),
                original: None,
            }),
        })
        .await
}

pub async fn seed_episode(
    store: &MemoryStore,
    name: &str,
    show: Option<&Show>,
    airstamp: DateTime<Utc>,
) -> Episode {
    store
        .insert_episode(Episode {
            id: String::new(),
            name: name.into(),
            season: Some(5),
            number: Some(14),
            airstamp: Some(airstamp),
            show: show.cloned(),
        })
        .await
}

/// A [`MemoryStore`] that yields to the scheduler before every call, the way a
/// networked store suspends, so sibling resolvers interleave.
pub struct YieldingStore(pub Arc<MemoryStore>);

#[async_trait]
impl Store for YieldingStore {
    async fn show_by_id(&self, id: &str) -> StoreResult<Option<Show>> {
        tokio::task::yield_now().await;
        self.0.show_by_id(id).await
    }

    async fn show_by_external_id(&self, external_id: i32) -> StoreResult<Option<Show>> {
        tokio::task::yield_now().await;
        self.0.show_by_external_id(external_id).await
    }

    async fn shows(&self, page: Page) -> StoreResult<Vec<Show>> {
        tokio::task::yield_now().await;
        self.0.shows(page).await
    }

    async fn episode(&self, id: &str) -> StoreResult<Option<Episode>> {
        tokio::task::yield_now().await;
        self.0.episode(id).await
    }

    async fn episodes_for_show(&self, show_id: &str, page: Page) -> StoreResult<Vec<Episode>> {
        tokio::task::yield_now().await;
        self.0.episodes_for_show(show_id, page).await
    }

    async fn upcoming_episodes(&self, after: DateTime<Utc>, page: Page) -> StoreResult<Vec<Episode>> {
        tokio::task::yield_now().await;
        self.0.upcoming_episodes(after, page).await
    }

    async fn user_by_auth0_id(&self, auth0_id: &str) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        self.0.user_by_auth0_id(auth0_id).await
    }

    async fn create_user(&self, auth0_id: &str, email: Option<&str>) -> StoreResult<User> {
        tokio::task::yield_now().await;
        self.0.create_user(auth0_id, email).await
    }

    async fn favorite_shows(&self, user_id: &str) -> StoreResult<Vec<Show>> {
        tokio::task::yield_now().await;
        self.0.favorite_shows(user_id).await
    }

    async fn is_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool> {
        tokio::task::yield_now().await;
        self.0.is_favorite(user_id, show_id).await
    }

    async fn toggle_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool> {
        tokio::task::yield_now().await;
        self.0.toggle_favorite(user_id, show_id).await
    }
}
