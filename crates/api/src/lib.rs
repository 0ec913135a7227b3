//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for customers, entries, clearances, and the ledger
//! - Error-to-status mapping with structured JSON error bodies

pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use frigora_core::pricing::ClearanceValuer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Valuer used to price cleared stock for ledger postings.
    pub valuer: Arc<dyn ClearanceValuer>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
