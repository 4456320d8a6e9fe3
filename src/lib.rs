//! Payment Facade - Thin HTTP front for the Stripe API
//!
//! This crate exposes a small JSON API that client apps call instead of
//! talking to Stripe directly, and receives Stripe webhooks, verifying their
//! signatures before dispatching them to per-event handlers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
