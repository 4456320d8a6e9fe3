//! Axum router configuration for the webhook endpoint.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::handle_webhook;

/// Create the Stripe webhook router.
///
/// Kept apart from the payment routes: it takes raw bytes rather than JSON
/// and authenticates by signature.
///
/// # Routes
/// - `POST /webhook` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/webhook", post(handle_webhook))
}
