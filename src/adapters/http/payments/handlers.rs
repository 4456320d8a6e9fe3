//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.
//! Every route takes its body as `Result<Json<_>, JsonRejection>` so that a
//! malformed body is reported in the route's own error style.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};

use crate::adapters::http::error::{ApiError, ErrorStyle};
use crate::adapters::http::state::AppState;

use super::dto::{
    AttachTokenRequest, CardResponse, ChargeResponse, ChargeTokenRequest, ConfirmPaymentRequest,
    CreateCustomerRequest, CreatePaymentIntentRequest, CreateProductRequest,
    CreateSetupIntentRequest, CreateSubscriptionRequest, CustomerPaymentMethodsRequest,
    CustomerReadyResponse, DeletePaymentMethodRequest, EphemeralKeyRequest, EphemeralKeyResponse,
    PaymentIntentCreatedResponse, PaymentMethodDeletedResponse, PaymentMethodSummariesResponse,
    PaymentMethodsResponse, PaymentStatusResponse, ProductCreatedResponse,
    RetrieveSetupIntentRequest, SavedMethodPaymentRequest, SavedMethodPaymentResponse,
    SetupIntentCreatedResponse, SetupIntentResponse, SubscriptionCreatedResponse,
    UpdateCvcTokenRequest,
};

type Body<T> = Result<Json<T>, JsonRejection>;

fn body<T>(payload: Body<T>, style: ErrorStyle) -> Result<T, ApiError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| ApiError::rejected(rejection, style))
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment Intents
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-payment-intent
pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Body<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntentCreatedResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to create payment intent");
    let request = body(payload, STYLE)?;

    let intent = state
        .create_payment_intent_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(intent.into()))
}

/// POST /confirm-payment - Reports the current status of a payment intent
pub async fn confirm_payment(
    State(state): State<AppState>,
    payload: Body<ConfirmPaymentRequest>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to confirm payment");
    let request = body(payload, STYLE)?;

    let intent = state
        .confirm_payment_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(intent.into()))
}

/// POST /create-payment-with-saved-method
pub async fn create_payment_with_saved_method(
    State(state): State<AppState>,
    payload: Body<SavedMethodPaymentRequest>,
) -> Result<Json<SavedMethodPaymentResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to create payment with saved method");
    let request = body(payload, STYLE)?;

    let intent = state
        .saved_method_payment_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(intent.into()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Setup Intents
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-setup-intent
pub async fn create_setup_intent(
    State(state): State<AppState>,
    payload: Body<CreateSetupIntentRequest>,
) -> Result<Json<SetupIntentCreatedResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to create setup intent");
    let request = body(payload, STYLE)?;

    let result = state
        .create_setup_intent_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(result.into()))
}

/// POST /retrieve-setup-intent
pub async fn retrieve_setup_intent(
    State(state): State<AppState>,
    payload: Body<RetrieveSetupIntentRequest>,
) -> Result<Json<SetupIntentResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to retrieve setup intent");
    let request = body(payload, STYLE)?;

    let intent = state
        .retrieve_setup_intent_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(intent.into()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Customers & Payment Methods
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-customer - Find or create a customer by email
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Body<CreateCustomerRequest>,
) -> Result<Json<CustomerReadyResponse>, ApiError> {
    let request = body(payload, ErrorStyle::Bare)?;

    let customer = state
        .create_customer_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, ErrorStyle::Bare))?;

    Ok(Json(customer.into()))
}

/// POST /get-ephemeral-key
pub async fn get_ephemeral_key(
    State(state): State<AppState>,
    payload: Body<EphemeralKeyRequest>,
) -> Result<Json<EphemeralKeyResponse>, ApiError> {
    let request = body(payload, ErrorStyle::Bare)?;

    let key = state
        .ephemeral_key_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, ErrorStyle::Bare))?;

    Ok(Json(EphemeralKeyResponse {
        ephemeral_key: key.secret,
    }))
}

/// POST /get-payment-methods - Full payment method objects
pub async fn get_payment_methods(
    State(state): State<AppState>,
    payload: Body<CustomerPaymentMethodsRequest>,
) -> Result<Json<PaymentMethodsResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to retrieve payment methods");
    let request = body(payload, STYLE)?;

    let list = state
        .list_payment_methods_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(list.into()))
}

/// POST /list-payment-methods - Card display fields only
pub async fn list_payment_methods(
    State(state): State<AppState>,
    payload: Body<CustomerPaymentMethodsRequest>,
) -> Result<Json<PaymentMethodSummariesResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to list payment methods");
    let request = body(payload, STYLE)?;

    let list = state
        .list_payment_methods_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(list.into()))
}

/// POST /delete-payment-method
pub async fn delete_payment_method(
    State(state): State<AppState>,
    payload: Body<DeletePaymentMethodRequest>,
) -> Result<Json<PaymentMethodDeletedResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to delete payment method");
    let request = body(payload, STYLE)?;

    let detached = state
        .delete_payment_method_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(detached.into()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Subscriptions
// ════════════════════════════════════════════════════════════════════════════════

/// POST /create-subscription
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Body<CreateSubscriptionRequest>,
) -> Result<Json<SubscriptionCreatedResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to create subscription");
    let request = body(payload, STYLE)?;

    let subscription = state
        .create_subscription_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(subscription.into()))
}

/// POST /create-product - Product plus a recurring price
pub async fn create_product(
    State(state): State<AppState>,
    payload: Body<CreateProductRequest>,
) -> Result<Json<ProductCreatedResponse>, ApiError> {
    const STYLE: ErrorStyle = ErrorStyle::Described("Failed to create product");
    let request = body(payload, STYLE)?;

    let result = state
        .create_product_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, STYLE))?;

    Ok(Json(result.into()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Card Tokens
// ════════════════════════════════════════════════════════════════════════════════

/// POST /charge-token
pub async fn charge_token(
    State(state): State<AppState>,
    payload: Body<ChargeTokenRequest>,
) -> Result<Json<ChargeResponse>, ApiError> {
    let request = body(payload, ErrorStyle::Flagged)?;

    let charge = state
        .charge_token_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, ErrorStyle::Flagged))?;

    Ok(Json(ChargeResponse {
        success: true,
        charge,
    }))
}

/// POST /attach-token-to-customer
pub async fn attach_token_to_customer(
    State(state): State<AppState>,
    payload: Body<AttachTokenRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    let request = body(payload, ErrorStyle::Flagged)?;

    let card = state
        .attach_token_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, ErrorStyle::Flagged))?;

    Ok(Json(CardResponse {
        success: true,
        card,
        message: "Card added to customer successfully",
    }))
}

/// POST /update-cvc-token
pub async fn update_cvc_token(
    State(state): State<AppState>,
    payload: Body<UpdateCvcTokenRequest>,
) -> Result<Json<CardResponse>, ApiError> {
    let request = body(payload, ErrorStyle::Flagged)?;

    let card = state
        .update_cvc_token_handler()
        .handle(request.into())
        .await
        .map_err(|e| ApiError::new(e, ErrorStyle::Flagged))?;

    Ok(Json(CardResponse {
        success: true,
        card,
        message: "Card updated to customer successfully",
    }))
}
