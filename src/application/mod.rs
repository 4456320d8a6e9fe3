//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! HTTP adapters translate requests into commands and results into responses.

pub mod handlers;

pub use handlers::*;
