//! HTTP handlers for the `/api` mount point.

use async_graphql::http::GraphiQLSource;
use async_graphql::{ErrorExtensions, ServerError};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use tracing::warn;

use super::context::build_request_context;
use crate::AppState;
use crate::error::AppError;

/// `POST /api`: authenticate, then execute the operation.
///
/// A rejected token short-circuits into a GraphQL error envelope so clients
/// always receive `{data, errors}`.
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    match build_request_context(&headers, &state.verifier, state.store.clone()).await {
        Ok(context) => state.schema.execute(req.into_inner().data(context)).await.into(),
        Err(e) => {
            warn!(error = %e, "rejecting request with invalid token");
            authentication_failed(AppError::from(e)).into()
        }
    }
}

/// Response for an operation whose token failed verification.
///
/// The error carries no source location: nothing in the document was executed.
pub fn authentication_failed(error: AppError) -> async_graphql::Response {
    let extended = error.extend();
    let mut server_error = ServerError::new(extended.message, None);
    server_error.extensions = extended.extensions;
    async_graphql::Response::from_errors(vec![server_error])
}

/// `GET /api`: GraphiQL explorer.
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/api").finish())
}

/// `GET /api/schema.graphql`: the schema's type-definition document.
pub async fn schema_sdl(State(state): State<AppState>) -> String {
    state.schema.sdl()
}
