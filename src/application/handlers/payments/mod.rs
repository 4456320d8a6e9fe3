//! Payment handlers.
//!
//! One command handler per facade operation. Each validates its input,
//! makes the provider call(s), and returns the provider's objects.
//!
//! ## Intents
//! - Creating and retrieving payment intents
//! - Paying with a saved payment method
//! - Creating and retrieving setup intents
//!
//! ## Customers
//! - Find-or-create by email, ephemeral keys
//! - Listing and detaching saved payment methods
//!
//! ## Billing
//! - Products with recurring prices, subscriptions
//! - Token charges and legacy card sources

mod card_tokens;
mod customers;
mod payment_intents;
mod payment_methods;
mod setup_intents;
mod subscriptions;

pub use card_tokens::{
    AttachTokenCommand, AttachTokenHandler, ChargeTokenCommand, ChargeTokenHandler,
    UpdateCvcTokenCommand, UpdateCvcTokenHandler,
};
pub use customers::{
    CreateCustomerCommand, CreateCustomerHandler, GetEphemeralKeyCommand, GetEphemeralKeyHandler,
};
pub use payment_intents::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, CreatePaymentIntentCommand,
    CreatePaymentIntentHandler, CreatePaymentWithSavedMethodCommand,
    CreatePaymentWithSavedMethodHandler,
};
pub use payment_methods::{
    DeletePaymentMethodCommand, DeletePaymentMethodHandler, ListPaymentMethodsCommand,
    ListPaymentMethodsHandler,
};
pub use setup_intents::{
    CreateSetupIntentCommand, CreateSetupIntentHandler, CreateSetupIntentResult,
    RetrieveSetupIntentCommand, RetrieveSetupIntentHandler,
};
pub use subscriptions::{
    CreateProductCommand, CreateProductHandler, CreateProductResult, CreateSubscriptionCommand,
    CreateSubscriptionHandler,
};
