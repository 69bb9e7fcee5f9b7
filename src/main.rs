//! dinehub-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dinehub_gateway::api;
use dinehub_gateway::app_state::AppState;
use dinehub_gateway::config::GatewayConfig;
use dinehub_gateway::domain::ConnectionRegistry;
use dinehub_gateway::persistence::{MemoryOrderStore, OrderStore, PostgresOrderStore};
use dinehub_gateway::service::OrderDispatcher;
use dinehub_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting dinehub-gateway");

    // Select the order store
    let store: Arc<dyn OrderStore> = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("postgres store ready");
        Arc::new(PostgresOrderStore::new(pool))
    } else {
        tracing::warn!("persistence disabled; orders are held in memory only");
        Arc::new(MemoryOrderStore::new())
    };

    // Build the fan-out core
    let registry = Arc::new(ConnectionRegistry::new());
    let dispatcher = Arc::new(OrderDispatcher::new(store, Arc::clone(&registry)));

    // Build application state
    let app_state = AppState {
        dispatcher,
        registry,
        backfill_enabled: config.backfill_enabled,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
