//! Authorization guards attached to schema fields.

use async_graphql::{Context, ErrorExtensions, Guard, Result};

use super::context::RequestContext;

/// Requires a verified caller in the request context.
pub struct IsAuthenticated;

impl Guard for IsAuthenticated {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let context = ctx.data::<RequestContext>()?;
        context.require_user().map(|_| ()).map_err(|e| e.extend())
    }
}
