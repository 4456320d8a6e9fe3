//! HTTP adapter for Stripe webhooks.

pub mod handlers;
pub mod routes;

pub use handlers::SIGNATURE_HEADER;
pub use routes::webhook_routes;
