//! HTTP DTOs (Data Transfer Objects) for payment endpoints.
//!
//! Request bodies are lenient: every field is optional here and required
//! fields are enforced by the command handlers, so a missing field yields the
//! operation's own validation message. Field names follow what the client
//! apps already send, including the camelCase ones.

use serde::{Deserialize, Serialize};

use crate::application::{
    AttachTokenCommand, ChargeTokenCommand, ConfirmPaymentCommand, CreateCustomerCommand,
    CreatePaymentIntentCommand, CreatePaymentWithSavedMethodCommand, CreateProductCommand,
    CreateProductResult, CreateSetupIntentCommand, CreateSetupIntentResult,
    CreateSubscriptionCommand, DeletePaymentMethodCommand, GetEphemeralKeyCommand,
    ListPaymentMethodsCommand, RetrieveSetupIntentCommand, UpdateCvcTokenCommand,
};
use crate::ports::{
    CardSource, Charge, Customer, Metadata, PaymentIntent, PaymentMethod, PaymentMethodList,
    SetupIntent, Subscription,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a payment intent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePaymentIntentRequest {
    /// Amount in major units.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
}

impl From<CreatePaymentIntentRequest> for CreatePaymentIntentCommand {
    fn from(r: CreatePaymentIntentRequest) -> Self {
        Self {
            amount: r.amount,
            currency: r.currency,
            customer_email: r.customer_email,
            payment_method: r.payment_method,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: Option<String>,
}

impl From<ConfirmPaymentRequest> for ConfirmPaymentCommand {
    fn from(r: ConfirmPaymentRequest) -> Self {
        Self {
            payment_intent_id: r.payment_intent_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSetupIntentRequest {
    pub customer_email: Option<String>,
    pub usage: Option<String>,
}

impl From<CreateSetupIntentRequest> for CreateSetupIntentCommand {
    fn from(r: CreateSetupIntentRequest) -> Self {
        Self {
            customer_email: r.customer_email,
            usage: r.usage,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RetrieveSetupIntentRequest {
    pub setup_intent_id: Option<String>,
}

impl From<RetrieveSetupIntentRequest> for RetrieveSetupIntentCommand {
    fn from(r: RetrieveSetupIntentRequest) -> Self {
        Self {
            setup_intent_id: r.setup_intent_id,
        }
    }
}

/// Request to pay with a previously saved payment method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SavedMethodPaymentRequest {
    pub payment_method_id: Option<String>,
    /// Amount in major units.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,
}

impl From<SavedMethodPaymentRequest> for CreatePaymentWithSavedMethodCommand {
    fn from(r: SavedMethodPaymentRequest) -> Self {
        Self {
            payment_method_id: r.payment_method_id,
            amount: r.amount,
            currency: r.currency,
            customer_id: r.customer_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateCustomerRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<CreateCustomerRequest> for CreateCustomerCommand {
    fn from(r: CreateCustomerRequest) -> Self {
        Self {
            email: r.email,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EphemeralKeyRequest {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
}

impl From<EphemeralKeyRequest> for GetEphemeralKeyCommand {
    fn from(r: EphemeralKeyRequest) -> Self {
        Self {
            customer_id: r.customer_id,
        }
    }
}

/// Request body shared by both payment method listing routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerPaymentMethodsRequest {
    pub customer_id: Option<String>,
}

impl From<CustomerPaymentMethodsRequest> for ListPaymentMethodsCommand {
    fn from(r: CustomerPaymentMethodsRequest) -> Self {
        Self {
            customer_id: r.customer_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeletePaymentMethodRequest {
    pub payment_method_id: Option<String>,
}

impl From<DeletePaymentMethodRequest> for DeletePaymentMethodCommand {
    fn from(r: DeletePaymentMethodRequest) -> Self {
        Self {
            payment_method_id: r.payment_method_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSubscriptionRequest {
    pub customer_id: Option<String>,
    pub price_id: Option<String>,
    pub payment_method_id: Option<String>,
}

impl From<CreateSubscriptionRequest> for CreateSubscriptionCommand {
    fn from(r: CreateSubscriptionRequest) -> Self {
        Self {
            customer_id: r.customer_id,
            price_id: r.price_id,
            payment_method_id: r.payment_method_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Price in major units.
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
}

impl From<CreateProductRequest> for CreateProductCommand {
    fn from(r: CreateProductRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            currency: r.currency,
            interval: r.interval,
        }
    }
}

/// Request to charge a card token. The amount is already in minor units.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChargeTokenRequest {
    #[serde(rename = "tokenId")]
    pub token_id: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub description: Option<String>,
}

impl From<ChargeTokenRequest> for ChargeTokenCommand {
    fn from(r: ChargeTokenRequest) -> Self {
        Self {
            token_id: r.token_id,
            amount: r.amount,
            currency: r.currency,
            description: r.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AttachTokenRequest {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "tokenId")]
    pub token_id: Option<String>,
}

impl From<AttachTokenRequest> for AttachTokenCommand {
    fn from(r: AttachTokenRequest) -> Self {
        Self {
            customer_id: r.customer_id,
            token_id: r.token_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCvcTokenRequest {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    #[serde(rename = "cardId")]
    pub card_id: Option<String>,
    pub token: Option<String>,
}

impl From<UpdateCvcTokenRequest> for UpdateCvcTokenCommand {
    fn from(r: UpdateCvcTokenRequest) -> Self {
        Self {
            customer_id: r.customer_id,
            card_id: r.card_id,
            token: r.token,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentCreatedResponse {
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
}

impl From<PaymentIntent> for PaymentIntentCreatedResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub payment_method: Option<String>,
}

impl From<PaymentIntent> for PaymentStatusResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
            payment_method: intent.payment_method,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetupIntentCreatedResponse {
    pub client_secret: Option<String>,
    pub setup_intent_id: String,
    pub customer_id: Option<String>,
}

impl From<CreateSetupIntentResult> for SetupIntentCreatedResponse {
    fn from(result: CreateSetupIntentResult) -> Self {
        Self {
            client_secret: result.setup_intent.client_secret,
            setup_intent_id: result.setup_intent.id,
            customer_id: result.customer_id,
        }
    }
}

/// A setup intent without its client secret.
#[derive(Debug, Clone, Serialize)]
pub struct SetupIntentResponse {
    pub id: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub customer: Option<String>,
    pub usage: Option<String>,
    pub created: i64,
    pub metadata: Metadata,
}

impl From<SetupIntent> for SetupIntentResponse {
    fn from(intent: SetupIntent) -> Self {
        Self {
            id: intent.id,
            status: intent.status,
            payment_method: intent.payment_method,
            customer: intent.customer,
            usage: intent.usage,
            created: intent.created,
            metadata: intent.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedMethodPaymentResponse {
    pub payment_intent_id: String,
    pub status: String,
    pub amount: i64,
    pub client_secret: Option<String>,
}

impl From<PaymentIntent> for SavedMethodPaymentResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            payment_intent_id: intent.id,
            status: intent.status,
            amount: intent.amount,
            client_secret: intent.client_secret,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerReadyResponse {
    #[serde(rename = "customerId")]
    pub customer_id: String,
    pub email: Option<String>,
    pub message: &'static str,
}

impl From<Customer> for CustomerReadyResponse {
    fn from(customer: Customer) -> Self {
        Self {
            customer_id: customer.id,
            email: customer.email,
            message: "Customer ready",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EphemeralKeyResponse {
    #[serde(rename = "ephemeralKey")]
    pub ephemeral_key: String,
}

/// Full payment method objects, as Stripe returned them.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodsResponse {
    pub payment_methods: Vec<PaymentMethod>,
}

impl From<PaymentMethodList> for PaymentMethodsResponse {
    fn from(list: PaymentMethodList) -> Self {
        Self {
            payment_methods: list.data,
        }
    }
}

/// Display fields of a saved card.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodSummary {
    pub id: String,
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub exp_month: Option<u32>,
    pub exp_year: Option<u32>,
    pub created: i64,
}

impl From<PaymentMethod> for PaymentMethodSummary {
    fn from(pm: PaymentMethod) -> Self {
        let card = pm.card;
        Self {
            id: pm.id,
            brand: card.as_ref().map(|c| c.brand.clone()),
            last4: card.as_ref().map(|c| c.last4.clone()),
            exp_month: card.as_ref().map(|c| c.exp_month),
            exp_year: card.as_ref().map(|c| c.exp_year),
            created: pm.created,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodSummariesResponse {
    pub payment_methods: Vec<PaymentMethodSummary>,
    pub has_more: bool,
}

impl From<PaymentMethodList> for PaymentMethodSummariesResponse {
    fn from(list: PaymentMethodList) -> Self {
        Self {
            payment_methods: list.data.into_iter().map(Into::into).collect(),
            has_more: list.has_more,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodDeletedResponse {
    pub message: &'static str,
    pub payment_method_id: String,
}

impl From<PaymentMethod> for PaymentMethodDeletedResponse {
    fn from(pm: PaymentMethod) -> Self {
        Self {
            message: "Payment method deleted successfully",
            payment_method_id: pm.id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionCreatedResponse {
    pub subscription_id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

impl From<Subscription> for SubscriptionCreatedResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            subscription_id: subscription.id,
            client_secret: subscription.client_secret,
            status: subscription.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductCreatedResponse {
    pub product_id: String,
    pub price_id: String,
    pub name: String,
    /// Echo of the requested price, in major units.
    pub price: f64,
    pub interval: String,
}

impl From<CreateProductResult> for ProductCreatedResponse {
    fn from(result: CreateProductResult) -> Self {
        Self {
            product_id: result.product.id,
            price_id: result.price.id,
            name: result.product.name,
            price: result.amount,
            interval: result.interval,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChargeResponse {
    pub success: bool,
    pub charge: Charge,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardResponse {
    pub success: bool,
    pub card: CardSource,
    pub message: &'static str,
}
