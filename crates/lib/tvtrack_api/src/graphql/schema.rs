//! GraphQL schema definition.

use async_graphql::{EmptySubscription, Schema};

use super::mutation::Mutation;
use super::query::Query;

/// The executable schema type.
pub type TvSchema = Schema<Query, Mutation, EmptySubscription>;

/// Limits and introspection for the schema.
#[derive(Debug, Clone)]
pub struct GraphQLConfig {
    pub enable_introspection: bool,
    pub max_query_depth: Option<usize>,
    pub max_query_complexity: Option<usize>,
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            enable_introspection: true,
            max_query_depth: Some(15),
            max_query_complexity: Some(1000),
        }
    }
}

/// Build the schema once at startup.
pub fn build_schema(config: &GraphQLConfig) -> TvSchema {
    let mut builder = Schema::build(Query, Mutation, EmptySubscription);

    if let Some(depth) = config.max_query_depth {
        builder = builder.limit_depth(depth);
    }
    if let Some(complexity) = config.max_query_complexity {
        builder = builder.limit_complexity(complexity);
    }
    if !config.enable_introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::Request;
    use tvtrack_core::models::AuthenticatedUser;
    use tvtrack_core::store::MemoryStore;

    use super::*;
    use crate::graphql::RequestContext;

    fn anonymous() -> RequestContext {
        RequestContext::anonymous(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn hello_round_trip() {
        let schema = build_schema(&GraphQLConfig::default());
        let resp = schema
            .execute(Request::new("{ hello }").data(anonymous()))
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        assert_eq!(
            resp.data.into_json().unwrap(),
            serde_json::json!({ "hello": "Hello world!" })
        );
    }

    #[tokio::test]
    async fn guarded_field_rejects_anonymous() {
        let schema = build_schema(&GraphQLConfig::default());
        let resp = schema
            .execute(Request::new("{ me { id } }").data(anonymous()))
            .await;
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].message, "Not authorised!");
    }

    #[tokio::test]
    async fn me_creates_user_lazily() {
        let schema = build_schema(&GraphQLConfig::default());
        let context = RequestContext::new(
            Some(AuthenticatedUser {
                email: None,
                sub: "auth0|abc123".into(),
                identity_provider: "auth0".into(),
                provider_local_id: "abc123".into(),
            }),
            Arc::new(MemoryStore::new()),
        );
        let resp = schema
            .execute(Request::new("{ me { auth0Id } }").data(context))
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        assert_eq!(
            resp.data.into_json().unwrap(),
            serde_json::json!({ "me": { "auth0Id": "abc123" } })
        );
    }

    #[test]
    fn sdl_declares_root_fields() {
        let sdl = build_schema(&GraphQLConfig::default()).sdl();
        assert!(sdl.contains("hello: String!"));
        assert!(sdl.contains("toggleFavorite(showId: ID!): Show!"));
        assert!(sdl.contains("upcomingEpisodes("));
    }
}
