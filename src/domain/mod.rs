//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `payments` - Amount and currency value objects, facade validation errors
//! - `webhook` - Stripe event types, signature verification, dispatch

pub mod payments;
pub mod webhook;
