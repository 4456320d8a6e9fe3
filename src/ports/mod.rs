//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Payment Ports
//!
//! - `PaymentProvider` - Remote payment gateway (Stripe)
//!
//! ## Webhook Ports
//!
//! - `HandlerFailureSink` - Observability hook for failed webhook handlers

mod handler_failure_sink;
mod payment_provider;

pub use handler_failure_sink::{HandlerFailure, HandlerFailureSink};
pub use payment_provider::{
    CardDetails, CardSource, Charge, CreateCharge, CreateCustomer, CreatePaymentIntent,
    CreatePrice, CreateProduct, CreateSetupIntent, CreateSubscription, Customer, EphemeralKey,
    ExtraFields, Metadata, PaymentError, PaymentErrorCode, PaymentIntent, PaymentMethod,
    PaymentMethodList, PaymentProvider, Price, Product, SetupIntent, Subscription,
};
