//! In-memory [`Store`] used by tests and offline tools.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Page, Store, StoreError, StoreResult};
use crate::models::{Episode, Show, User};

/// Episode row; the show is joined on read.
#[derive(Debug, Clone)]
struct EpisodeRow {
    episode: Episode,
    show_id: Option<String>,
}

#[derive(Debug, Default)]
struct Tables {
    shows: HashMap<String, Show>,
    episodes: Vec<EpisodeRow>,
    users: HashMap<String, User>,
    /// `(user_id, show_id)` pairs.
    favorites: BTreeSet<(String, String)>,
}

impl Tables {
    fn join(&self, row: &EpisodeRow) -> Episode {
        let mut episode = row.episode.clone();
        episode.show = row.show_id.as_ref().and_then(|id| self.shows.get(id).cloned());
        episode
    }

    fn sorted_episodes<'a>(&'a self, rows: impl Iterator<Item = &'a EpisodeRow>) -> Vec<Episode> {
        let mut episodes: Vec<Episode> = rows.map(|row| self.join(row)).collect();
        episodes.sort_by_key(|e| e.airstamp);
        episodes
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a show. An empty id is replaced with a generated one.
    pub async fn insert_show(&self, mut show: Show) -> Show {
        if show.id.is_empty() {
            show.id = Uuid::now_v7().to_string();
        }
        self.tables
            .write()
            .await
            .shows
            .insert(show.id.clone(), show.clone());
        show
    }

    /// Insert an episode; its `show`, if any, links by id.
    pub async fn insert_episode(&self, mut episode: Episode) -> Episode {
        if episode.id.is_empty() {
            episode.id = Uuid::now_v7().to_string();
        }
        let show_id = episode.show.take().map(|s| s.id);
        let mut tables = self.tables.write().await;
        let row = EpisodeRow { episode, show_id };
        let joined = tables.join(&row);
        tables.episodes.push(row);
        joined
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn show_by_id(&self, id: &str) -> StoreResult<Option<Show>> {
        Ok(self.tables.read().await.shows.get(id).cloned())
    }

    async fn show_by_external_id(&self, external_id: i32) -> StoreResult<Option<Show>> {
        Ok(self
            .tables
            .read()
            .await
            .shows
            .values()
            .find(|s| s.external_id == Some(external_id))
            .cloned())
    }

    async fn shows(&self, page: Page) -> StoreResult<Vec<Show>> {
        let tables = self.tables.read().await;
        let mut shows: Vec<Show> = tables.shows.values().cloned().collect();
        shows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page.slice(shows))
    }

    async fn episode(&self, id: &str) -> StoreResult<Option<Episode>> {
        let tables = self.tables.read().await;
        Ok(tables
            .episodes
            .iter()
            .find(|row| row.episode.id == id)
            .map(|row| tables.join(row)))
    }

    async fn episodes_for_show(&self, show_id: &str, page: Page) -> StoreResult<Vec<Episode>> {
        let tables = self.tables.read().await;
        let episodes = tables.sorted_episodes(
            tables
                .episodes
                .iter()
                .filter(|row| row.show_id.as_deref() == Some(show_id)),
        );
        Ok(page.slice(episodes))
    }

    async fn upcoming_episodes(&self, after: DateTime<Utc>, page: Page) -> StoreResult<Vec<Episode>> {
        let tables = self.tables.read().await;
        let episodes = tables.sorted_episodes(
            tables
                .episodes
                .iter()
                .filter(|row| row.episode.airstamp.is_some_and(|at| at >= after)),
        );
        Ok(page.slice(episodes))
    }

    async fn user_by_auth0_id(&self, auth0_id: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.auth0_id == auth0_id)
            .cloned())
    }

    async fn create_user(&self, auth0_id: &str, email: Option<&str>) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.auth0_id == auth0_id) {
            return Err(StoreError::Graphql(format!(
                "A unique constraint would be violated on User. Field name = auth0id: {auth0_id}"
            )));
        }
        let user = User {
            id: Uuid::now_v7().to_string(),
            auth0_id: auth0_id.to_string(),
            email: email.map(str::to_string),
        };
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn favorite_shows(&self, user_id: &str) -> StoreResult<Vec<Show>> {
        let tables = self.tables.read().await;
        if !tables.users.contains_key(user_id) {
            return Err(StoreError::NotFound(format!("user {user_id}")));
        }
        let mut shows: Vec<Show> = tables
            .favorites
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .filter_map(|(_, sid)| tables.shows.get(sid).cloned())
            .collect();
        shows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(shows)
    }

    async fn is_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .favorites
            .contains(&(user_id.to_string(), show_id.to_string())))
    }

    async fn toggle_favorite(&self, user_id: &str, show_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.shows.contains_key(show_id) {
            return Err(StoreError::NotFound(format!("show {show_id}")));
        }
        if !tables.users.contains_key(user_id) {
            return Err(StoreError::NotFound(format!("user {user_id}")));
        }
        let key = (user_id.to_string(), show_id.to_string());
        if tables.favorites.remove(&key) {
            Ok(false)
        } else {
            tables.favorites.insert(key);
            Ok(true)
        }
    }
}
