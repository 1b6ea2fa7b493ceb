//! GraphQL endpoint on `/graphql` (GraphiQL on GET)

pub mod error;
pub mod schema;

use async_graphql::{EmptySubscription, Schema, http::GraphiQLSource};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
};
use axum_helpers::MaybeIdentity;

use crate::state::AppState;
pub use schema::{CatalogSchema, MutationRoot, QueryRoot};

pub fn build_schema(state: &AppState) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state.users.clone())
        .data(state.products.clone())
        .finish()
}

/// Runs the request with the caller's identity, when there is one, in the
/// query data.
async fn graphql_handler(
    State(schema): State<CatalogSchema>,
    MaybeIdentity(identity): MaybeIdentity,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(identity) = identity {
        request = request.data(identity);
    }
    schema.execute(request).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(build_schema(state))
}
