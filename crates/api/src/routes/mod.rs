//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod clearances;
pub mod customers;
pub mod entries;
pub mod health;
pub mod ledger;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(customers::routes())
        .merge(entries::routes())
        .merge(clearances::routes())
        .merge(ledger::routes())
}
