//! HTTP adapter for health and client configuration.

pub mod handlers;
pub mod routes;

pub use routes::system_routes;
