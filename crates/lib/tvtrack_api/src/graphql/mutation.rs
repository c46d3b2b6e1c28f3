//! Root mutation resolvers.

use async_graphql::{Context, ID, Object, Result};
use tracing::info;

use super::context::RequestContext;
use super::directives::IsAuthenticated;
use super::types::ShowNode;
use crate::error::{AppError, GraphQLResultExt};

pub struct Mutation;

#[Object]
impl Mutation {
    /// Follow or unfollow a show. Last write wins.
    #[graphql(guard = "IsAuthenticated")]
    async fn toggle_favorite(&self, ctx: &Context<'_>, show_id: ID) -> Result<ShowNode> {
        let context = ctx.data::<RequestContext>()?;
        let user = context.current_user().await.gql()?;
        let favorite = context
            .store
            .toggle_favorite(&user.id, &show_id)
            .await
            .gql()?;
        info!(user_id = %user.id, show_id = %show_id.as_str(), favorite, "favorite toggled");

        let show = context.store.show_by_id(&show_id).await.gql()?;
        show.map(ShowNode)
            .ok_or_else(|| AppError::NotFound(format!("show {}", show_id.as_str())))
            .gql()
    }
}
