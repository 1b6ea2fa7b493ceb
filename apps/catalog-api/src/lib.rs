//! Catalog API
//!
//! Products owned by users, served over REST (`/api`), GraphQL (`/graphql`)
//! and a change stream on `/socket`.
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   ↓ Authorization: Bearer <token>
//! auth_context_middleware (identity into request extensions)
//!   ↓
//! REST handlers ──┐        GraphQL resolvers
//!   │ publish     ├──▶ ProductService / UserService
//!   ↓             │          ↓
//! Broadcaster     │    Repositories (MongoDB)
//!   ↓ /socket     │
//! subscribers ◀───┘
//! ```
//!
//! ## Modules
//!
//! - `api`: REST routes and readiness
//! - `graphql`: schema, resolvers and the `/graphql` endpoint
//! - `owners`: the users repository seen from the products domain
//! - `state`: services shared by every surface

pub mod api;
pub mod config;
pub mod graphql;
pub mod openapi;
pub mod owners;
pub mod state;

use axum::{Router, middleware::from_fn_with_state};
use axum_helpers::auth_context_middleware;
use realtime::socket_router;

use state::AppState;

/// REST routes with the auth context applied, to be nested under `/api`
pub fn api_routes(state: &AppState) -> Router {
    api::routes(state).layer(from_fn_with_state(
        state.jwt.clone(),
        auth_context_middleware,
    ))
}

/// GraphQL with the auth context applied, plus the socket endpoint
pub fn root_routes(state: &AppState) -> Router {
    graphql::router(state)
        .layer(from_fn_with_state(
            state.jwt.clone(),
            auth_context_middleware,
        ))
        .merge(socket_router(state.broadcaster.clone()))
}
