//! HTTP adapters - REST API implementations.
//!
//! Each area has its own router; [`app_router`] merges them over a shared
//! [`AppState`] and [`app`] adds the middleware stack.

pub mod error;
pub mod middleware;
pub mod payments;
pub mod system;
pub mod webhook;

mod state;

use axum::Router;

use crate::config::ServerConfig;

pub use error::{ApiError, ErrorBody, ErrorStyle};
pub use state::{AppState, PublicSettings};

/// All routes, without middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(payments::payment_routes())
        .merge(webhook::webhook_routes())
        .merge(system::system_routes())
        .with_state(state)
}

/// All routes wrapped in the standard middleware stack.
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    middleware::apply(app_router(state), server)
}
