//! Signing-key resolution from the identity provider's key set (JWKS).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::AuthError;
use super::constants::DEFAULT_JWKS_REFETCH_INTERVAL_SECS;

/// Resolves a token's `kid` to a verification key.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError>;
}

fn decoding_key(keys: &JwkSet, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
    keys.find(kid).map(|jwk| {
        DecodingKey::from_jwk(jwk).map_err(|e| AuthError::KeyFetch(format!("jwk {kid}: {e}")))
    })
}

/// A fixed key set, for tests and offline verification.
#[derive(Debug, Clone)]
pub struct StaticKeys {
    keys: JwkSet,
}

impl StaticKeys {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    /// Parse a key set from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let keys = serde_json::from_str(json)
            .map_err(|e| AuthError::KeyFetch(format!("parse key set: {e}")))?;
        Ok(Self::new(keys))
    }
}

#[async_trait]
impl KeyResolver for StaticKeys {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        decoding_key(&self.keys, kid).unwrap_or_else(|| Err(AuthError::KeyNotFound(kid.into())))
    }
}

/// A fetched key set with its expiry.
#[derive(Debug, Clone)]
struct CachedKeys {
    keys: JwkSet,
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CachedKeys {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Remote key-set client with an in-process TTL cache.
///
/// A `kid` missing from a fresh cache triggers a refetch so rotated keys are
/// picked up before the TTL runs out. Such refetches happen at most once per
/// refetch interval, and only one fetch is in flight at a time.
#[derive(Debug)]
pub struct JwksClient {
    http: reqwest::Client,
    jwks_uri: String,
    ttl: chrono::Duration,
    refetch_interval: chrono::Duration,
    cache: RwLock<Option<CachedKeys>>,
}

impl JwksClient {
    /// Create a client for `jwks_uri`. `timeout` bounds each fetch.
    pub fn new(jwks_uri: impl Into<String>, ttl: Duration, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeyFetch(format!("http client: {e}")))?;
        Ok(Self {
            http,
            jwks_uri: jwks_uri.into(),
            ttl: chrono_duration(ttl, "cache ttl")?,
            refetch_interval: chrono_duration(
                Duration::from_secs(DEFAULT_JWKS_REFETCH_INTERVAL_SECS),
                "refetch interval",
            )?,
            cache: RwLock::new(None),
        })
    }

    /// Override the minimum spacing of refetches forced by unknown key ids.
    pub fn with_refetch_interval(mut self, interval: Duration) -> Result<Self, AuthError> {
        self.refetch_interval = chrono_duration(interval, "refetch interval")?;
        Ok(self)
    }

    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Download the key set.
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        debug!(uri = %self.jwks_uri, "fetching key set");
        let resp = self
            .http
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "{} returned {}",
                self.jwks_uri,
                resp.status()
            )));
        }
        let keys: JwkSet = resp
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(format!("parse key set: {e}")))?;
        info!(uri = %self.jwks_uri, keys = keys.keys.len(), "key set refreshed");
        Ok(keys)
    }

    /// Key for `kid` from the cache, if the cache is fresh and holds it.
    async fn cached(&self, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
        let cache = self.cache.read().await;
        let entry = cache.as_ref().filter(|entry| entry.is_fresh(Utc::now()))?;
        decoding_key(&entry.keys, kid)
    }
}

fn chrono_duration(d: Duration, what: &str) -> Result<chrono::Duration, AuthError> {
    chrono::Duration::from_std(d).map_err(|e| AuthError::KeyFetch(format!("{what}: {e}")))
}

#[async_trait]
impl KeyResolver for JwksClient {
    async fn resolve(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached(kid).await {
            return key;
        }

        // Fetches are serialised on the write lock; whoever waited re-checks
        // what the previous holder stored before going to the network.
        let mut cache = self.cache.write().await;
        let now = Utc::now();
        if let Some(entry) = cache.as_ref().filter(|entry| entry.is_fresh(now)) {
            if let Some(key) = decoding_key(&entry.keys, kid) {
                return key;
            }
            if now - entry.fetched_at < self.refetch_interval {
                debug!(kid, "unknown key id, refetch rate-limited");
                return Err(AuthError::KeyNotFound(kid.into()));
            }
        }

        let keys = self.fetch().await?;
        let found = decoding_key(&keys, kid);
        let now = Utc::now();
        *cache = Some(CachedKeys {
            keys,
            fetched_at: now,
            expires_at: now + self.ttl,
        });
        found.unwrap_or_else(|| Err(AuthError::KeyNotFound(kid.into())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JWKS: &str = include_str!("../../tests/fixtures/jwks.json");

    fn client(server: &MockServer, ttl_secs: u64) -> JwksClient {
        JwksClient::new(
            format!("{}/.well-known/jwks.json", server.uri()),
            Duration::from_secs(ttl_secs),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn key_set_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(JWKS, "application/json")
    }

    async fn mount_key_set(server: &MockServer, expected_fetches: u64) {
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(key_set_response())
            .expect(expected_fetches)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn static_keys_resolve_known_kid() {
        let keys = StaticKeys::from_json(JWKS).unwrap();
        assert!(keys.resolve("test-key-1").await.is_ok());
        assert!(matches!(
            keys.resolve("other").await,
            Err(AuthError::KeyNotFound(kid)) if kid == "other"
        ));
    }

    #[tokio::test]
    async fn fetches_once_while_cached() {
        let server = MockServer::start().await;
        mount_key_set(&server, 1).await;

        let client = client(&server, 600);
        assert!(client.resolve("test-key-1").await.is_ok());
        assert!(client.resolve("test-key-1").await.is_ok());
    }

    #[tokio::test]
    async fn unknown_kid_refetches_once_the_interval_has_passed() {
        let server = MockServer::start().await;
        mount_key_set(&server, 2).await;

        let client = client(&server, 600)
            .with_refetch_interval(Duration::ZERO)
            .unwrap();
        assert!(client.resolve("test-key-1").await.is_ok());
        assert!(matches!(
            client.resolve("rotated-key").await,
            Err(AuthError::KeyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_kids_inside_the_interval_are_served_from_cache() {
        let server = MockServer::start().await;
        mount_key_set(&server, 1).await;

        let client = client(&server, 600);
        assert!(client.resolve("test-key-1").await.is_ok());
        for i in 0..20 {
            let kid = format!("bogus-{i}");
            assert!(matches!(
                client.resolve(&kid).await,
                Err(AuthError::KeyNotFound(k)) if k == kid
            ));
        }
        assert!(client.resolve("test-key-1").await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let server = MockServer::start().await;
        mount_key_set(&server, 1).await;

        let client = Arc::new(client(&server, 600));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.resolve("test-key-1").await.is_ok() })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }

    #[tokio::test]
    async fn endpoint_error_is_key_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(matches!(
            client(&server, 600).resolve("test-key-1").await,
            Err(AuthError::KeyFetch(_))
        ));
    }
}
