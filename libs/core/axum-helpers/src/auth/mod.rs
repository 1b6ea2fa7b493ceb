//! Token authentication.
//!
//! - HS256 token issue and verification with a one-hour expiry
//! - Middleware that turns a bearer token into an [`Identity`]
//! - Extractors for routes that require or merely accept a caller
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, auth_context_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let app = Router::new()
//!     .route("/api/protected", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, auth_context_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{Identity, JwtAuth, JwtClaims, TOKEN_TTL, TokenError};
pub use middleware::{CurrentUser, MaybeIdentity, auth_context_middleware, bearer_token};
