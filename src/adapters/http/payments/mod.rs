//! HTTP adapter for the Stripe facade endpoints.
//!
//! Payment intents, setup intents, customers, saved payment methods,
//! subscriptions and card tokens. See [`routes::payment_routes`].

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::payment_routes;
