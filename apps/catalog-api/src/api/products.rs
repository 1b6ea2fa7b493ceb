//! Products API routes

use axum::Router;
use domain_products::{MongoProductRepository, handlers};
use mongodb::Database;

use crate::state::AppState;

/// REST products router; every mutation publishes on the state's broadcaster
pub fn router(state: &AppState) -> Router {
    handlers::router(state.products.clone(), state.broadcaster.clone())
}

/// Initialize products indexes
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoProductRepository::new(db).init_indexes().await?;
    Ok(())
}
