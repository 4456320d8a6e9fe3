//! Payment intent handlers - create, confirm, and pay with a saved method.

use std::sync::Arc;

use crate::domain::payments::{require, Currency, MinorUnits, PaymentsError};
use crate::ports::{CreatePaymentIntent, Metadata, PaymentIntent, PaymentProvider};

const AMOUNT_REQUIRED: &str = "Amount is required and must be greater than 0";
const PAYMENT_INTENT_ID_REQUIRED: &str = "Payment Intent ID is required";
const SAVED_METHOD_FIELDS_REQUIRED: &str = "Payment method ID and amount are required";

// ════════════════════════════════════════════════════════════════════════════
// Create
// ════════════════════════════════════════════════════════════════════════════

/// Command to create a payment intent for a one-off payment.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentIntentCommand {
    /// Amount in major units (e.g. 19.99).
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    /// Payment method type; `card` when omitted.
    pub payment_method: Option<String>,
}

pub struct CreatePaymentIntentHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<PaymentIntent, PaymentsError> {
        let amount = cmd
            .amount
            .and_then(MinorUnits::from_major)
            .ok_or_else(|| PaymentsError::validation(AMOUNT_REQUIRED))?;

        let method_type = cmd
            .payment_method
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "card".to_string());

        let mut metadata = Metadata::new();
        metadata.insert(
            "customer_email".to_string(),
            cmd.customer_email
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "unknown".to_string()),
        );
        metadata.insert(
            "order_id".to_string(),
            format!("order_{}", chrono::Utc::now().timestamp_millis()),
        );

        let currency = Currency::or_default(cmd.currency.as_deref());
        let mut request = CreatePaymentIntent::new(amount, currency);
        request.payment_method_types = vec![method_type];
        request.metadata = metadata;

        let intent = self.provider.create_payment_intent(request).await?;

        tracing::info!(
            payment_intent_id = %intent.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );

        Ok(intent)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Confirm
// ════════════════════════════════════════════════════════════════════════════

/// Query for the current state of a payment intent.
#[derive(Debug, Clone, Default)]
pub struct ConfirmPaymentCommand {
    pub payment_intent_id: Option<String>,
}

pub struct ConfirmPaymentHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl ConfirmPaymentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: ConfirmPaymentCommand) -> Result<PaymentIntent, PaymentsError> {
        let id = require(cmd.payment_intent_id, PAYMENT_INTENT_ID_REQUIRED)?;

        let intent = self.provider.retrieve_payment_intent(&id).await?;

        tracing::debug!(
            payment_intent_id = %intent.id,
            status = %intent.status,
            "Payment intent retrieved"
        );

        Ok(intent)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pay with saved method
// ════════════════════════════════════════════════════════════════════════════

/// Command to charge a previously saved payment method.
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentWithSavedMethodCommand {
    pub payment_method_id: Option<String>,
    /// Amount in major units.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub customer_id: Option<String>,
}

/// Creates and immediately confirms a payment intent against a saved method.
pub struct CreatePaymentWithSavedMethodHandler {
    provider: Arc<dyn PaymentProvider>,
    return_url: String,
}

impl CreatePaymentWithSavedMethodHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, return_url: impl Into<String>) -> Self {
        Self {
            provider,
            return_url: return_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentWithSavedMethodCommand,
    ) -> Result<PaymentIntent, PaymentsError> {
        let payment_method_id = require(cmd.payment_method_id, SAVED_METHOD_FIELDS_REQUIRED)?;
        let amount = cmd
            .amount
            .and_then(MinorUnits::from_major)
            .ok_or_else(|| PaymentsError::validation(SAVED_METHOD_FIELDS_REQUIRED))?;

        let mut metadata = Metadata::new();
        metadata.insert("payment_type".to_string(), "saved_method".to_string());
        metadata.insert("created_at".to_string(), chrono::Utc::now().to_rfc3339());

        let currency = Currency::or_default(cmd.currency.as_deref());
        let mut request = CreatePaymentIntent::new(amount, currency);
        request.payment_method = Some(payment_method_id);
        request.customer = cmd.customer_id.filter(|c| !c.is_empty());
        request.confirm = true;
        request.return_url = Some(self.return_url.clone());
        request.metadata = metadata;

        let intent = self.provider.create_payment_intent(request).await?;

        tracing::info!(
            payment_intent_id = %intent.id,
            status = %intent.status,
            amount = intent.amount,
            "Payment with saved method created"
        );

        Ok(intent)
    }
}
