//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health;
use mongodb::Database;

async fn ready(State(db): State<Database>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "mongodb",
        Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) }),
    )];

    run_health_checks(checks).await
}

/// Router with `/ready`, answering 503 while MongoDB does not respond to a ping
pub fn router(db: Database) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
