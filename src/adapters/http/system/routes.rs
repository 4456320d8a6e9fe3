//! Axum router configuration for system endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{client_config, health};

/// # Routes
/// - `GET /health` - Liveness with server time
/// - `GET /config` - Publishable key and checkout redirect URLs
pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(client_config))
}
