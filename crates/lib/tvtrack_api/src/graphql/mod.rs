//! GraphQL schema, per-request context and the `/api` handler.

pub mod context;
pub mod directives;
pub mod handler;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use context::{RequestContext, build_request_context};
pub use schema::{GraphQLConfig, TvSchema, build_schema};
