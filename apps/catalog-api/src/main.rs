//! Catalog API - REST, GraphQL and WebSocket server

use axum_helpers::server::{create_production_app, create_router, health_router};
use axum_helpers::JwtAuth;
use catalog_api::{api, api_routes, config::Config, openapi::ApiDoc, root_routes, state::AppState};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::MongoProductRepository;
use domain_users::MongoUserRepository;
use realtime::Broadcaster;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let mongo_client = database::mongodb::connect_from_config(&config.mongodb).await?;
    let db = mongo_client.database(config.mongodb.database());
    info!("Connected to MongoDB database: {}", config.mongodb.database());

    api::users::init_indexes(&db).await?;
    api::products::init_indexes(&db).await?;

    let broadcaster = Broadcaster::new(&config.realtime);
    let state = AppState::new(
        Arc::new(MongoUserRepository::new(&db)),
        Arc::new(MongoProductRepository::new(&db)),
        JwtAuth::new(&config.jwt),
        broadcaster.clone(),
    );

    let router = create_router::<ApiDoc>(api_routes(&state), root_routes(&state))?
        .merge(health_router(config.app))
        .merge(api::health::router(db));

    info!(
        "Starting {} v{} on port {}",
        config.app.name, config.app.version, config.server.port
    );

    create_production_app(
        router,
        &config.server,
        async move {
            info!("Shutting down: closing sockets and MongoDB connections");
            broadcaster.close();
            mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await?;

    info!("Catalog API shutdown complete");
    Ok(())
}
