//! # Axum Helpers
//!
//! Shared building blocks for the HTTP surfaces.
//!
//! ## Modules
//!
//! - **[`auth`]**: HS256 tokens, auth context middleware, identity extractors
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: `AppError` and the structured error body
//! - **[`extractors`]**: UUID path and JSON body extractors
//! - **[`validation`]**: ordered accumulation of input validation messages
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new(), Router::new())?;
//!     create_production_app(router, &ServerConfig::default(), async {})
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;
pub mod validation;

pub use auth::{
    CurrentUser, Identity, JwtAuth, JwtClaims, JwtConfig, MaybeIdentity, TOKEN_TTL, TokenError,
    auth_context_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer, cors_layer_from_env, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, FieldMessage};

pub use extractors::{JsonBody, UuidPath};

pub use validation::InputErrors;
