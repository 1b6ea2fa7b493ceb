//! Products Domain
//!
//! Catalog products owned by users, stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /products endpoints, change broadcasts
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │ ──▶ │   Policy    │  ← creator-only mutation
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │ Repository  │     │   Owners    │  ← owner names and product lists
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← documents, input, events
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::{handlers, InMemoryOwners, MongoProductRepository, ProductService};
//! use mongodb::Client;
//! use realtime::{Broadcaster, RealtimeConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = ProductService::new(Arc::new(repository), Arc::new(InMemoryOwners::new()));
//!
//! let router = handlers::router(service, Broadcaster::new(&RealtimeConfig::default()));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod owners;
pub mod policy;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    Creator, PAGE_SIZE, PRODUCTS_EVENT, PageQuery, Price, Product, ProductContent, ProductDetails,
    ProductEvent, ProductInput, ProductPage, RawPrice,
};
pub use self::mongodb::MongoProductRepository;
pub use owners::{InMemoryOwners, ProductOwners};
pub use policy::Ownership;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::{CreatedProduct, ProductService};
