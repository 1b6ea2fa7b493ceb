//! Database connectivity for the catalog services.
//!
//! Only MongoDB is supported. Collections themselves are owned by the domain
//! crates; this crate handles configuration, connecting and health checks.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{MongoConfig, connect_from_config};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config(&config).await?;
//! let db = client.database(config.database());
//! ```

pub mod error;
pub mod mongodb;
pub mod serde_helpers;

pub use error::{DatabaseError, DatabaseResult};
