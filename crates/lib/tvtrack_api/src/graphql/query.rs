//! Root query resolvers.

use async_graphql::{Context, ID, Object, Result};
use chrono::{DateTime, Utc};
use tvtrack_core::store::Page;

use super::context::RequestContext;
use super::directives::IsAuthenticated;
use super::types::{EpisodeNode, ShowNode, UserNode};
use crate::error::{AppError, GraphQLResultExt};

pub struct Query;

#[Object]
impl Query {
    /// Demo round-trip.
    async fn hello(&self) -> String {
        tvtrack_core::hello::hello_world()
    }

    /// The caller's user record, created on first access.
    #[graphql(guard = "IsAuthenticated")]
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserNode>> {
        let context = ctx.data::<RequestContext>()?;
        Ok(Some(context.current_user().await.gql()?.into()))
    }

    /// Fetch a show by persistence id or by catalogue id.
    async fn show(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        external_id: Option<i32>,
    ) -> Result<Option<ShowNode>> {
        let context = ctx.data::<RequestContext>()?;
        let show = match (id, external_id) {
            (Some(id), _) => context.store.show_by_id(&id).await,
            (None, Some(external_id)) => context.store.show_by_external_id(external_id).await,
            (None, None) => {
                return Err(AppError::Validation("show requires id or externalId".into()))
                    .gql();
            }
        };
        Ok(show.gql()?.map(ShowNode))
    }

    async fn shows(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        skip: Option<i32>,
    ) -> Result<Vec<ShowNode>> {
        let context = ctx.data::<RequestContext>()?;
        let shows = context.store.shows(Page::new(first, skip)).await.gql()?;
        Ok(shows.into_iter().map(ShowNode).collect())
    }

    async fn episode(&self, ctx: &Context<'_>, id: ID) -> Result<Option<EpisodeNode>> {
        let context = ctx.data::<RequestContext>()?;
        Ok(context.store.episode(&id).await.gql()?.map(EpisodeNode))
    }

    /// Episodes airing from `after` (default: now), earliest first.
    async fn upcoming_episodes(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        skip: Option<i32>,
        after: Option<DateTime<Utc>>,
    ) -> Result<Vec<EpisodeNode>> {
        let context = ctx.data::<RequestContext>()?;
        let episodes = context
            .store
            .upcoming_episodes(after.unwrap_or_else(Utc::now), Page::new(first, skip))
            .await
            .gql()?;
        Ok(episodes.into_iter().map(EpisodeNode).collect())
    }

    #[graphql(guard = "IsAuthenticated")]
    async fn favorite_shows(&self, ctx: &Context<'_>) -> Result<Vec<ShowNode>> {
        let context = ctx.data::<RequestContext>()?;
        let user = context.current_user().await.gql()?;
        let shows = context.store.favorite_shows(&user.id).await.gql()?;
        Ok(shows.into_iter().map(ShowNode).collect())
    }
}
