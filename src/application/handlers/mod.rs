//! Application handlers.
//!
//! Command and query handlers that orchestrate provider calls and webhook
//! processing.

pub mod payments;
mod webhook;

pub use payments::*;
pub use webhook::{HandleWebhookCommand, HandleWebhookHandler};
