//! GraphQL object types wrapping the domain models.

use async_graphql::{Context, ID, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};
use tvtrack_core::models::{Episode, Image, Show, User};
use tvtrack_core::store::Page;

use super::context::RequestContext;
use crate::error::GraphQLResultExt;

/// Show artwork.
#[derive(SimpleObject)]
#[graphql(name = "Image")]
pub struct ImageNode {
    pub medium: Option<String>,
    pub original: Option<String>,
}

impl From<Image> for ImageNode {
    fn from(image: Image) -> Self {
        Self {
            medium: image.medium,
            original: image.original,
        }
    }
}

pub struct ShowNode(pub Show);

#[Object(name = "Show")]
impl ShowNode {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    /// Id in the upstream TV listings catalogue.
    async fn external_id(&self) -> Option<i32> {
        self.0.external_id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn image(&self) -> Option<ImageNode> {
        self.0.image.clone().map(ImageNode::from)
    }

    /// Whether the caller follows this show. False when anonymous or when the
    /// caller has no persisted record yet.
    async fn is_favorite(&self, ctx: &Context<'_>) -> Result<bool> {
        let context = ctx.data::<RequestContext>()?;
        let Some(user) = context.existing_user().await.gql()? else {
            return Ok(false);
        };
        context.store.is_favorite(&user.id, &self.0.id).await.gql()
    }

    async fn episodes(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        skip: Option<i32>,
    ) -> Result<Vec<EpisodeNode>> {
        let context = ctx.data::<RequestContext>()?;
        let episodes = context
            .store
            .episodes_for_show(&self.0.id, Page::new(first, skip))
            .await
            .gql()?;
        Ok(episodes.into_iter().map(EpisodeNode).collect())
    }
}

pub struct EpisodeNode(pub Episode);

#[Object(name = "Episode")]
impl EpisodeNode {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn season(&self) -> Option<i32> {
        self.0.season
    }

    async fn number(&self) -> Option<i32> {
        self.0.number
    }

    async fn airstamp(&self) -> Option<DateTime<Utc>> {
        self.0.airstamp
    }

    async fn show(&self) -> Option<ShowNode> {
        self.0.show.clone().map(ShowNode)
    }
}

#[derive(SimpleObject)]
#[graphql(name = "User")]
pub struct UserNode {
    pub id: ID,
    pub auth0_id: String,
    pub email: Option<String>,
}

impl From<User> for UserNode {
    fn from(user: User) -> Self {
        Self {
            id: ID(user.id),
            auth0_id: user.auth0_id,
            email: user.email,
        }
    }
}
