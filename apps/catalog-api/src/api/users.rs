//! Auth API routes

use axum::Router;
use domain_users::{MongoUserRepository, handlers};
use mongodb::Database;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router(state.users.clone())
}

/// Initialize users indexes (unique email)
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).init_indexes().await?;
    Ok(())
}
