//! Client for the hosted GraphQL data service.
//!
//! One instance is built at startup and shared by every request. Connection
//! reuse and retries are left to `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::service_token::generate_service_token;
use super::{Page, Store, StoreError, StoreResult};
use crate::models::{Episode, Show, User};

const SHOW_FIELDS: &str = "id externalId name image { medium original }";

fn episode_fields() -> String {
    format!("id name season number airstamp show {{ {SHOW_FIELDS} }}")
}

/// Connection settings for [`PrismaClient`].
#[derive(Debug, Clone)]
pub struct PrismaConfig {
    /// Service endpoint; empty means unconfigured.
    pub endpoint: String,
    /// Service secret; empty means no service token is sent.
    pub secret: String,
    /// Log every operation at `debug`.
    pub debug: bool,
    pub timeout: Duration,
}

impl Default for PrismaConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            secret: String::new(),
            debug: false,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug)]
pub struct PrismaClient {
    http: reqwest::Client,
    endpoint: Option<Url>,
    secret: Option<String>,
    debug: bool,
}

impl PrismaClient {
    pub fn new(config: PrismaConfig) -> StoreResult<Self> {
        let endpoint = if config.endpoint.trim().is_empty() {
            None
        } else {
            Some(
                Url::parse(config.endpoint.trim())
                    .map_err(|e| StoreError::Transport(format!("endpoint: {e}")))?,
            )
        };
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            secret: (!config.secret.is_empty()).then_some(config.secret),
            debug: config.debug,
        })
    }

    /// Run one operation and decode its `data`.
    pub async fn request<T: DeserializeOwned>(&self, query: &str, variables: Value) -> StoreResult<T> {
        let endpoint = self.endpoint.as_ref().ok_or(StoreError::NotConfigured)?;
        if self.debug {
            debug!(%query, %variables, "persistence request");
        }

        let mut req = self
            .http
            .post(endpoint.clone())
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(secret) = &self.secret {
            req = req.bearer_auth(generate_service_token(endpoint, secret.as_bytes())?);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() && status.as_u16() != 400 {
            return Err(StoreError::Status(status.as_u16()));
        }
        let envelope: GraphqlEnvelope<T> = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(StoreError::Graphql(messages.join("; ")));
        }
        envelope
            .data
            .ok_or_else(|| StoreError::Decode("response has no data".into()))
    }
}

#[derive(Deserialize)]
struct ShowData {
    show: Option<Show>,
}

#[derive(Deserialize)]
struct ShowsData {
    shows: Vec<Show>,
}

#[derive(Deserialize)]
struct EpisodeData {
    episode: Option<Episode>,
}

#[derive(Deserialize)]
struct EpisodesData {
    episodes: Vec<Episode>,
}

#[derive(Deserialize)]
struct UserData {
    user: Option<User>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserData {
    create_user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritesOwner {
    favorite_shows: Vec<Show>,
}

#[derive(Deserialize)]
struct FavoritesData {
    user: Option<FavoritesOwner>,
}

#[async_trait]
impl Store for PrismaClient {
    async fn show_by_id(&self, id: &str) -> StoreResult<Option<Show>> {
        let query = format!("query ($id: ID!) {{ show(where: {{ id: $id }}) {{ {SHOW_FIELDS} }} }}");
        let data: ShowData = self.request(&query, json!({ "id": id })).await?;
        Ok(data.show)
    }

    async fn show_by_external_id(&self, external_id: i32) -> StoreResult<Option<Show>> {
        let query = format!(
            "query ($externalId: Int!) {{ show(where: {{ externalId: $externalId }}) {{ {SHOW_FIELDS} }} }}"
        );
        let data: ShowData = self
            .request(&query, json!({ "externalId": external_id }))
            .await?;
        Ok(data.show)
    }

    async fn shows(&self, page: Page) -> StoreResult<Vec<Show>> {
        let query = format!(
            "query ($first: Int, $skip: Int) {{ shows(orderBy: name_ASC, first: $first, skip: $skip) {{ {SHOW_FIELDS} }} }}"
        );
        let data: ShowsData = self
            .request(&query, json!({ "first": page.first, "skip": page.skip }))
            .await?;
        Ok(data.shows)
    }

    async fn episode(&self, id: &str) -> StoreResult<Option<Episode>> {
        let query = format!(
            "query ($id: ID!) {{ episode(where: {{ id: $id }}) {{ {} }} }}",
            episode_fields()
        );
        let data: EpisodeData = self.request(&query, json!({ "id": id })).await?;
        Ok(data.episode)
    }

    async fn episodes_for_show(&self, show_id: &str, page: Page) -> StoreResult<Vec<Episode>> {
        let query = format!(
            "query ($showId: ID!, $first: Int, $skip: Int) {{ episodes(where: {{ show: {{ id: $showId }} }}, orderBy: airstamp_ASC, first: $first, skip: $skip) {{ {} }} }}",
            episode_fields()
        );
        let data: EpisodesData = self
            .request(
                &query,
                json!({ "showId": show_id, "first": page.first, "skip": page.skip }),
            )
            .await?;
        Ok(data.episodes)
    }

    async fn upcoming_episodes(&self, after: DateTime<Utc>, page: Page) -> StoreResult<Vec<Episode>> {
        let query = format!(
            "query ($after: DateTime!, $first: Int, $skip: Int) {{ episodes(where: {{ airstamp_gte: $after }}, orderBy: airstamp_ASC, first: $first, skip: $skip) {{ {} }} }}",
            episode_fields()
        );
        let data: EpisodesData = self
            .request(
                &query,
                json!({ "after": after.to_rfc3339(), "first": page.first, "skip": page.skip }),
            )
            .await?;
        Ok(data.episodes)
    }

    async fn user_by_auth0_id(&self, auth0_id: &str) -> StoreResult<Option<User>> {
        let data: UserData = self
            .request(
                "query ($auth0id: String!) { user(where: { auth0id: $auth0id }) { id auth0id email } }",
                json!({ "auth0id": auth0_id }),
            )
            .await?;
        Ok(data.user)
    }

    async fn create_user(&self, auth0_id: &str, email: Option<&str>) -> StoreResult<User> {
        let data: CreateUserData = self
            .request(
                "mutation ($auth0id: String!, $email: String) { createUser(data: { auth0id: $auth0id, email: $email }) { id auth0id email } }",
                json!({ "auth0id": auth0_id, "email": email }),
            )
            .await?;
        Ok(data.create_user)
    }

    async fn favorite_shows(&self, user_id: &str) -> StoreResult<Vec<Show>> {
        let query = format!(
            "query ($id: ID!) {{ user(where: {{ id: $id }}) {{ favoriteShows(orderBy: name_ASC) {{ {SHOW_FIELDS} }} }} }}"
        );
        let data: FavoritesData = self.request(&query, json!({ "id": user_id })).await?;
        data.user
            .map(|u| u.favorite_shows)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }

    async fn is_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool> {
        let data: ShowsData = self
            .request(
                "query ($userId: ID!, $showId: ID!) { shows(where: { id: $showId, favoritedBy_some: { id: $userId } }) { id name } }",
                json!({ "userId": user_id, "showId": show_id }),
            )
            .await?;
        Ok(!data.shows.is_empty())
    }

    async fn toggle_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool> {
        if self.show_by_id(show_id).await?.is_none() {
            return Err(StoreError::NotFound(format!("show {show_id}")));
        }
        let favorite = !self.is_favorite(user_id, show_id).await?;
        let relation = if favorite { "connect" } else { "disconnect" };
        let query = format!(
            "mutation ($userId: ID!, $showId: ID!) {{ updateUser(where: {{ id: $userId }}, data: {{ favoriteShows: {{ {relation}: [{{ id: $showId }}] }} }}) {{ id }} }}"
        );
        let _: Value = self
            .request(&query, json!({ "userId": user_id, "showId": show_id }))
            .await?;
        Ok(favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header_exists, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, secret: &str) -> PrismaClient {
        PrismaClient::new(PrismaConfig {
            endpoint: format!("{}/tvtrack/dev", server.uri()),
            secret: secret.into(),
            debug: true,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn unconfigured_endpoint_fails() {
        let client = PrismaClient::new(PrismaConfig::default()).unwrap();
        assert!(matches!(
            client.show_by_id("s1").await,
            Err(StoreError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn fetches_show_by_external_id_with_service_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header_exists("authorization"))
            .and(body_partial_json(json!({ "variables": { "externalId": 169 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "show": { "id": "s1", "externalId": 169, "name": "Breaking Bad", "image": null } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let show = client(&server, "s3cret")
            .show_by_external_id(169)
            .await
            .unwrap()
            .expect("show");
        assert_eq!(show.id, "s1");
        assert_eq!(show.name, "Breaking Bad");
    }

    #[tokio::test]
    async fn provider_errors_surface() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Your token is invalid" }]
            })))
            .mount(&server)
            .await;

        let err = client(&server, "").shows(Page::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Graphql(m) if m == "Your token is invalid"));
    }

    #[tokio::test]
    async fn http_failure_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client(&server, "").episode("e1").await.unwrap_err();
        assert!(matches!(err, StoreError::Status(502)));
    }

    #[tokio::test]
    async fn toggle_connects_when_not_favorite() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "id": "s1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "show": { "id": "s1", "name": "Breaking Bad" } }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "userId": "u1", "showId": "s1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "shows": [], "updateUser": { "id": "u1" } }
            })))
            .mount(&server)
            .await;

        let now_favorite = client(&server, "").toggle_favorite("u1", "s1").await.unwrap();
        assert!(now_favorite);
    }
}
