//! Payment Facade server
//!
//! Loads configuration, initializes tracing, wires the Stripe adapter and
//! webhook pipeline, and serves until Ctrl+C.

use std::sync::Arc;

use anyhow::{Context, Result};
use payment_facade::adapters::http::{app, AppState};
use payment_facade::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use payment_facade::adapters::telemetry::TracingFailureSink;
use payment_facade::config::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    init_tracing(&config);

    let addr = config.server.socket_addr()?;
    info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        dispatch_mode = ?config.webhook.dispatch_mode,
        tolerance_secs = config.webhook.tolerance_secs,
        "Configuration loaded"
    );

    let provider = StripePaymentAdapter::new(StripeConfig::from_payment_config(&config.payment));
    let state = AppState::from_config(
        &config,
        Arc::new(provider),
        Arc::new(TracingFailureSink::new()),
    );
    let router = app(state, &config.server);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening for connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`; JSON output in production.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
