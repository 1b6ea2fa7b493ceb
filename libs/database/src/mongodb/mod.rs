//! MongoDB connector and utilities

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::connect_from_config;
pub use health::check_health;

pub use mongodb::{Client, Collection, Database};
