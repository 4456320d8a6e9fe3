//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum routers, DTOs, error responses
//! - `stripe` - Stripe REST client and an in-memory mock
//! - `telemetry` - `tracing`-backed observability hooks

pub mod http;
pub mod stripe;
pub mod telemetry;
