//! Frigora API Server
//!
//! Main entry point for the Frigora cold-storage backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frigora_api::{AppState, create_router};
use frigora_core::pricing::FlatRateValuer;
use frigora_db::connect;
use frigora_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frigora=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create the clearance valuer
    let valuer = FlatRateValuer::new(config.pricing.rate_per_unit);
    info!(rate_per_unit = %config.pricing.rate_per_unit, "Pricing configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        valuer: Arc::new(valuer),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
