//! Webhook domain - Verification and dispatch of Stripe events.
//!
//! Flow per request: raw bytes and the `Stripe-Signature` header go through
//! [`WebhookVerifier`]; a verified [`WebhookEvent`] goes to the
//! [`WebhookDispatcher`], which runs at most one handler.

mod dispatcher;
mod errors;
mod event;
mod handlers;
mod objects;
mod verifier;

pub use dispatcher::{DispatchOutcome, HandlerRegistry, WebhookDispatcher, WebhookEventHandler};
pub use errors::{HandlerError, WebhookError, WebhookErrorKind};
pub use event::{EventData, EventKind, WebhookEvent};
pub use handlers::{
    default_registry, InvoiceFailedHandler, InvoicePaidHandler, PaymentFailedHandler,
    PaymentSucceededHandler, SetupFailedHandler, SetupSucceededHandler,
    SubscriptionCancelledHandler,
};
pub use objects::{InvoiceObject, PaymentIntentObject, SetupIntentObject, SubscriptionObject};
pub use verifier::{
    sign_payload, SignatureHeader, WebhookVerifier, WebhookVerifierConfig,
    DEFAULT_MAX_CLOCK_SKEW_SECS, DEFAULT_TOLERANCE_SECS,
};
