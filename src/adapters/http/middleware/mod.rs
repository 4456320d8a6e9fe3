//! HTTP middleware for axum.
//!
//! Cross-cutting layers applied to every route:
//!
//! - request ids (`x-request-id`, generated when absent, echoed on the response)
//! - request tracing
//! - CORS
//! - request timeout

use axum::Router;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// CORS for the configured origins; permissive when none are configured.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Wraps the router in the standard middleware stack.
///
/// The request id is set outermost so the trace span and the response
/// both see it.
pub fn apply<S>(router: Router<S>, server: &ServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    fn router(server: &ServerConfig) -> Router {
        apply(Router::new().route("/ping", get(|| async { "pong" })), server)
    }

    #[tokio::test]
    async fn generates_request_id_when_absent() {
        let response = router(&ServerConfig::default())
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn propagates_incoming_request_id() {
        let response = router(&ServerConfig::default())
            .oneshot(
                Request::get("/ping")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn configured_origin_is_allowed() {
        let server = ServerConfig {
            cors_origins: Some("https://shop.test, https://admin.test".to_string()),
            ..ServerConfig::default()
        };

        let response = router(&server)
            .oneshot(
                Request::get("/ping")
                    .header("origin", "https://shop.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://shop.test"
        );
    }
}
