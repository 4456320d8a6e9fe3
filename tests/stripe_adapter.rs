//! Integration tests for the Stripe adapter against a mock HTTP server.
//!
//! These check the wire contract: paths, form encoding, auth and version
//! headers, response decoding, and error mapping.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use payment_facade::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use payment_facade::domain::payments::{Currency, MinorUnits};
use payment_facade::ports::{
    CreateCustomer, CreatePaymentIntent, CreateSubscription, PaymentErrorCode, PaymentProvider,
};

async fn adapter() -> (MockServer, StripePaymentAdapter) {
    let server = MockServer::start().await;
    let adapter = StripePaymentAdapter::new(
        StripeConfig::new("sk_test_key")
            .with_base_url(server.uri())
            .with_api_version("2023-10-16"),
    );
    (server, adapter)
}

// =============================================================================
// Requests
// =============================================================================

#[tokio::test]
async fn create_payment_intent_posts_form_with_auth_and_version() {
    let (server, adapter) = adapter().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(header("authorization", "Basic c2tfdGVzdF9rZXk6"))
        .and(header("stripe-version", "2023-10-16"))
        .and(body_string_contains("amount=1999"))
        .and(body_string_contains("currency=usd"))
        .and(body_string_contains("payment_method_types%5B0%5D=card"))
        .and(body_string_contains("metadata%5Bcustomer_email%5D=a%40b.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_123",
            "object": "payment_intent",
            "client_secret": "pi_123_secret_abc",
            "status": "requires_payment_method",
            "amount": 1999,
            "currency": "usd",
            "payment_method": null,
            "metadata": {"customer_email": "a@b.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CreatePaymentIntent::new(
        MinorUnits::try_new(1999).unwrap(),
        Currency::or_default(Some("USD")),
    );
    request.payment_method_types = vec!["card".to_string()];
    request
        .metadata
        .insert("customer_email".to_string(), "a@b.com".to_string());

    let intent = adapter.create_payment_intent(request).await.unwrap();

    assert_eq!(intent.id, "pi_123");
    assert_eq!(intent.client_secret.as_deref(), Some("pi_123_secret_abc"));
    assert_eq!(intent.amount, 1999);
}

#[tokio::test]
async fn find_customer_by_email_queries_with_limit_one() {
    let (server, adapter) = adapter().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .and(query_param("email", "a@b.com"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"id": "cus_1", "email": "a@b.com", "phone": null}],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let customer = adapter.find_customer_by_email("a@b.com").await.unwrap();

    assert_eq!(customer.map(|c| c.id), Some("cus_1".to_string()));
}

#[tokio::test]
async fn find_customer_by_email_returns_none_for_empty_list() {
    let (server, adapter) = adapter().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [], "has_more": false})),
        )
        .mount(&server)
        .await;

    assert_eq!(adapter.find_customer_by_email("x@y.com").await.unwrap(), None);
}

#[tokio::test]
async fn create_customer_includes_phone_only_when_given() {
    let (server, adapter) = adapter().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(body_string_contains("email=a%40b.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "cus_2", "email": "a@b.com"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let customer = adapter
        .create_customer(CreateCustomer {
            email: "a@b.com".to_string(),
            phone: None,
        })
        .await
        .unwrap();

    assert_eq!(customer.id, "cus_2");
    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(!body.contains("phone"));
}

#[tokio::test]
async fn ids_are_escaped_into_a_single_path_segment() {
    let (server, adapter) = adapter().await;

    Mock::given(method("GET"))
        .and(path("/v1/payment_intents/pi_1%2Fcancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_1",
            "status": "canceled",
            "amount": 100,
            "currency": "usd"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let intent = adapter.retrieve_payment_intent("pi_1/cancel").await.unwrap();

    assert_eq!(intent.status, "canceled");
}

#[tokio::test]
async fn subscription_client_secret_comes_from_expanded_invoice() {
    let (server, adapter) = adapter().await;

    Mock::given(method("POST"))
        .and(path("/v1/subscriptions"))
        .and(body_string_contains("items%5B0%5D%5Bprice%5D=price_1"))
        .and(body_string_contains("payment_behavior=default_incomplete"))
        .and(body_string_contains(
            "expand%5B0%5D=latest_invoice.payment_intent",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub_1",
            "status": "incomplete",
            "latest_invoice": {
                "id": "in_1",
                "payment_intent": {"id": "pi_9", "client_secret": "pi_9_secret"}
            }
        })))
        .mount(&server)
        .await;

    let subscription = adapter
        .create_subscription(CreateSubscription {
            customer: "cus_1".to_string(),
            price: "price_1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(subscription.id, "sub_1");
    assert_eq!(subscription.client_secret.as_deref(), Some("pi_9_secret"));
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn card_error_keeps_message_and_decline_code() {
    let (server, adapter) = adapter().await;

    Mock::given(method("POST"))
        .and(path("/v1/payment_methods/pm_1/detach"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "decline_code": "insufficient_funds",
                "message": "Your card has insufficient funds."
            }
        })))
        .mount(&server)
        .await;

    let err = adapter.detach_payment_method("pm_1").await.unwrap_err();

    assert_eq!(err.code, PaymentErrorCode::CardDeclined);
    assert_eq!(err.message, "Your card has insufficient funds.");
    assert_eq!(err.provider_code.as_deref(), Some("insufficient_funds"));
}

#[tokio::test]
async fn missing_resource_maps_to_not_found() {
    let (server, adapter) = adapter().await;

    Mock::given(method("GET"))
        .and(path("/v1/setup_intents/seti_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "invalid_request_error",
                "code": "resource_missing",
                "message": "No such setupintent: 'seti_missing'"
            }
        })))
        .mount(&server)
        .await;

    let err = adapter.retrieve_setup_intent("seti_missing").await.unwrap_err();

    assert_eq!(err.code, PaymentErrorCode::NotFound);
    assert_eq!(err.message, "No such setupintent: 'seti_missing'");
}

#[tokio::test]
async fn non_json_error_body_still_maps_by_status() {
    let (server, adapter) = adapter().await;

    Mock::given(method("POST"))
        .and(path("/v1/ephemeral_keys"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = adapter.create_ephemeral_key("cus_1").await.unwrap_err();

    assert_eq!(err.code, PaymentErrorCode::ProviderError);
    assert!(err.message.contains("503"));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let adapter = StripePaymentAdapter::new(
        StripeConfig::new("sk_test_key").with_base_url("http://127.0.0.1:1"),
    );

    let err = adapter.retrieve_payment_intent("pi_1").await.unwrap_err();

    assert_eq!(err.code, PaymentErrorCode::NetworkError);
    assert!(err.provider_code.is_none());
}
