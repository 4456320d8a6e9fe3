//! Axum router configuration for payment endpoints.

use axum::{routing::post, Router};

use crate::adapters::http::state::AppState;

use super::handlers::{
    attach_token_to_customer, charge_token, confirm_payment, create_customer,
    create_payment_intent, create_payment_with_saved_method, create_product, create_setup_intent,
    create_subscription, delete_payment_method, get_ephemeral_key, get_payment_methods,
    list_payment_methods, retrieve_setup_intent, update_cvc_token,
};

/// Create the payment API router.
///
/// All routes are `POST` with a JSON body, mounted at the root so existing
/// client apps keep their paths.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        // Payment intents
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/confirm-payment", post(confirm_payment))
        .route(
            "/create-payment-with-saved-method",
            post(create_payment_with_saved_method),
        )
        // Setup intents
        .route("/create-setup-intent", post(create_setup_intent))
        .route("/retrieve-setup-intent", post(retrieve_setup_intent))
        // Customers and saved payment methods
        .route("/create-customer", post(create_customer))
        .route("/get-ephemeral-key", post(get_ephemeral_key))
        .route("/get-payment-methods", post(get_payment_methods))
        .route("/list-payment-methods", post(list_payment_methods))
        .route("/delete-payment-method", post(delete_payment_method))
        // Subscriptions
        .route("/create-subscription", post(create_subscription))
        .route("/create-product", post(create_product))
        // Card tokens
        .route("/charge-token", post(charge_token))
        .route("/attach-token-to-customer", post(attach_token_to_customer))
        .route("/update-cvc-token", post(update_cvc_token))
}
