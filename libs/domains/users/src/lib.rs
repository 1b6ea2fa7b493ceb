//! Users Domain
//!
//! Accounts, password hashing and token issuance for the catalog.
//!
//! # Features
//!
//! - Registration with ordered input validation and unique emails
//! - Password hashing with bcrypt (off the async runtime)
//! - Login issuing HS256 tokens through [`axum_helpers::JwtAuth`]
//! - Free-text status of the authenticated user
//! - Forward list of owned products, maintained by the products domain
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /auth endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, hashing, tokens
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← MongoDB or in-memory
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← documents and DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars"));
//! let service = UserService::new(Arc::new(InMemoryUserRepository::new()), jwt);
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{AuthData, CreateUser, LoginRequest, UpdateStatus, User, UserResponse};
pub use self::mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{MIN_HASH_COST, PASSWORD_HASH_COST, UserService};
