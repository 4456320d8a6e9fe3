//! HTTP handler for Stripe webhook deliveries.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::adapters::http::state::AppState;
use crate::application::HandleWebhookCommand;

/// Header carrying Stripe's signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// POST /webhook - Verify and dispatch a Stripe event
///
/// The body is taken as raw bytes; the signature covers them exactly.
/// Verification and decode failures are 400 with a plain-text diagnostic.
/// Anything that verifies is acknowledged with 200, whether or not a handler
/// exists for it or succeeds.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.webhook_handler().handle(cmd).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "received": true }))).into_response(),
        Err(e) => (
            e.status_code(),
            format!("Webhook Error: {}", e.public_message()),
        )
            .into_response(),
    }
}
