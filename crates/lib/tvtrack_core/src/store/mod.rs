//! Persistence client.
//!
//! The application talks to its data through the [`Store`] trait. The
//! production implementation is [`PrismaClient`], a thin client for the
//! hosted GraphQL data service; [`MemoryStore`] backs tests and offline tools.

pub mod memory;
pub mod prisma;
pub mod service_token;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::models::{AuthenticatedUser, Episode, Show, User};

pub use memory::MemoryStore;
pub use prisma::{PrismaClient, PrismaConfig};

/// Persistence provider errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Persistence endpoint not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Provider error: {0}")]
    Graphql(String),

    #[error("Malformed provider response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Offset pagination, mirroring the provider's `first` / `skip` arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub first: Option<i32>,
    pub skip: Option<i32>,
}

impl Page {
    pub fn new(first: Option<i32>, skip: Option<i32>) -> Self {
        Self { first, skip }
    }

    /// Apply to an in-memory sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skip = self.skip.unwrap_or(0).max(0) as usize;
        let first = self.first.map_or(usize::MAX, |n| n.max(0) as usize);
        items.into_iter().skip(skip).take(first).collect()
    }
}

/// Entity queries and mutations the application needs from persistence.
#[async_trait]
pub trait Store: Send + Sync {
    async fn show_by_id(&self, id: &str) -> StoreResult<Option<Show>>;

    /// Look up a show by its id in the upstream listings catalogue.
    async fn show_by_external_id(&self, external_id: i32) -> StoreResult<Option<Show>>;

    /// Shows ordered by name.
    async fn shows(&self, page: Page) -> StoreResult<Vec<Show>>;

    async fn episode(&self, id: &str) -> StoreResult<Option<Episode>>;

    /// Episodes of one show, ordered by airstamp.
    async fn episodes_for_show(&self, show_id: &str, page: Page) -> StoreResult<Vec<Episode>>;

    /// Episodes airing at or after `after`, ordered by airstamp.
    async fn upcoming_episodes(&self, after: DateTime<Utc>, page: Page) -> StoreResult<Vec<Episode>>;

    async fn user_by_auth0_id(&self, auth0_id: &str) -> StoreResult<Option<User>>;

    async fn create_user(&self, auth0_id: &str, email: Option<&str>) -> StoreResult<User>;

    async fn favorite_shows(&self, user_id: &str) -> StoreResult<Vec<Show>>;

    async fn is_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool>;

    /// Flip the favorite relation; returns the new state.
    async fn toggle_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool>;
}

/// Load the persisted user for an authenticated caller, creating it on first
/// sight.
pub async fn find_or_create_user(store: &dyn Store, caller: &AuthenticatedUser) -> StoreResult<User> {
    if let Some(user) = store.user_by_auth0_id(&caller.provider_local_id).await? {
        return Ok(user);
    }
    let user = store
        .create_user(&caller.provider_local_id, caller.email.as_deref())
        .await?;
    info!(user_id = %user.id, provider = %caller.identity_provider, "created user");
    Ok(user)
}
