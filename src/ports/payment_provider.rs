//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Each method is a single remote call; composition (find-or-create,
//! attach-then-subscribe) lives in the application handlers.
//!
//! Objects the facade relays verbatim (payment methods, charges, card
//! sources) keep every field they arrive with in `extra`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::payments::{Currency, MinorUnits};

/// Free-form string metadata attached to Stripe objects.
pub type Metadata = BTreeMap<String, String>;

/// Fields of a relayed object that the facade does not model.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    // ── Payment intents ─────────────────────────────────────────────

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentError>;

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;

    // ── Setup intents ───────────────────────────────────────────────

    async fn create_setup_intent(
        &self,
        request: CreateSetupIntent,
    ) -> Result<SetupIntent, PaymentError>;

    async fn retrieve_setup_intent(&self, id: &str) -> Result<SetupIntent, PaymentError>;

    // ── Customers ───────────────────────────────────────────────────

    /// Returns the first customer with this email, if any.
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError>;

    async fn create_customer(&self, request: CreateCustomer) -> Result<Customer, PaymentError>;

    /// Sets the customer's default payment method for invoices.
    async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<Customer, PaymentError>;

    /// Creates an ephemeral key for client SDKs acting on behalf of a customer.
    async fn create_ephemeral_key(&self, customer_id: &str) -> Result<EphemeralKey, PaymentError>;

    // ── Payment methods ─────────────────────────────────────────────

    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<PaymentMethodList, PaymentError>;

    async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError>;

    async fn detach_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, PaymentError>;

    // ── Subscriptions & catalogue ───────────────────────────────────

    /// Creates an incomplete subscription awaiting its first payment.
    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> Result<Subscription, PaymentError>;

    async fn create_product(&self, request: CreateProduct) -> Result<Product, PaymentError>;

    async fn create_price(&self, request: CreatePrice) -> Result<Price, PaymentError>;

    // ── Tokens & legacy sources ─────────────────────────────────────

    async fn create_charge(&self, request: CreateCharge) -> Result<Charge, PaymentError>;

    async fn create_customer_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> Result<CardSource, PaymentError>;

    async fn update_customer_source_cvc(
        &self,
        customer_id: &str,
        card_id: &str,
        cvc_update_token: &str,
    ) -> Result<CardSource, PaymentError>;
}

// ════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════

/// Parameters for creating a payment intent.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePaymentIntent {
    pub amount: MinorUnits,
    pub currency: Currency,
    /// Empty when a concrete `payment_method` is given instead.
    pub payment_method_types: Vec<String>,
    pub payment_method: Option<String>,
    pub customer: Option<String>,
    /// Confirm immediately with manual confirmation.
    pub confirm: bool,
    pub return_url: Option<String>,
    pub metadata: Metadata,
}

impl CreatePaymentIntent {
    pub fn new(amount: MinorUnits, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            payment_method_types: Vec::new(),
            payment_method: None,
            customer: None,
            confirm: false,
            return_url: None,
            metadata: Metadata::new(),
        }
    }
}

/// Parameters for creating a setup intent.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSetupIntent {
    pub customer: Option<String>,
    /// `off_session` or `on_session`.
    pub usage: String,
    pub payment_method_types: Vec<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCustomer {
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubscription {
    pub customer: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
}

/// A recurring price for a product.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePrice {
    pub product: String,
    pub unit_amount: MinorUnits,
    pub currency: Currency,
    /// `day`, `week`, `month` or `year`.
    pub interval: String,
}

/// A one-off charge against a card token.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCharge {
    pub amount: MinorUnits,
    pub currency: Currency,
    pub source: String,
    pub description: String,
}

// ════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemeralKey {
    pub id: String,
    pub secret: String,
    #[serde(default)]
    pub expires: Option<i64>,
}

/// A saved payment method, relayed with all of its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub card: Option<CardDetails>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    pub brand: String,
    pub last4: String,
    pub exp_month: u32,
    pub exp_year: u32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodList {
    pub data: Vec<PaymentMethod>,
    #[serde(default)]
    pub has_more: bool,
}

/// A subscription with the client secret of its first payment, when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub id: String,
}

/// A charge, relayed with all of its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A card attached to a customer as a source, relayed with all of its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSource {
    pub id: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

// ════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════

/// Payment provider error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error classification.
    pub code: PaymentErrorCode,

    /// Message from the provider, safe to relay to the caller.
    pub message: String,

    /// Provider-specific error code (e.g. `resource_missing`).
    pub provider_code: Option<String>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a card declined error.
    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("No such {}", resource),
        )
    }

    /// Create a generic provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Card was declined.
    CardDeclined,

    /// Request parameters were rejected.
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Classifies a provider HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => PaymentErrorCode::InvalidRequest,
            401 => PaymentErrorCode::AuthenticationError,
            402 => PaymentErrorCode::CardDeclined,
            404 => PaymentErrorCode::NotFound,
            429 => PaymentErrorCode::RateLimitExceeded,
            _ => PaymentErrorCode::ProviderError,
        }
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
