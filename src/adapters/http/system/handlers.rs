//! Health and client configuration endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::adapters::http::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Current time, RFC 3339.
    pub timestamp: String,
}

/// Stripe settings a client needs to start a checkout.
#[derive(Debug, Clone, Serialize)]
pub struct ClientConfigResponse {
    pub publishable_key: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

/// GET /config
pub async fn client_config(State(state): State<AppState>) -> Json<ClientConfigResponse> {
    Json(ClientConfigResponse {
        publishable_key: state.settings.publishable_key.clone(),
        success_url: state.settings.success_url.clone(),
        cancel_url: state.settings.cancel_url.clone(),
    })
}
