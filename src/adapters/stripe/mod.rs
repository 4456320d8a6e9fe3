//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe's REST API, including:
//! - Payment and setup intents
//! - Customers, payment methods and legacy card sources
//! - Subscriptions, products and prices
//!
//! # Security
//!
//! - The secret key is held in `secrecy::SecretString` and only exposed
//!   when building the `Authorization` header
//! - Resource ids are percent-encoded into the path

mod form;
mod mock_payment_provider;
mod stripe_adapter;
mod wire_types;

pub use form::FormParams;
pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
pub use wire_types::{decode_error, StripeErrorEnvelope, StripeList};
