//! Stripe response shapes that do not map one-to-one onto port types.
//!
//! Most responses deserialize straight into the port's types; these cover
//! list envelopes, error bodies and expanded objects.

use serde::Deserialize;

use crate::ports::{PaymentError, PaymentErrorCode, Subscription};

/// A page of a Stripe list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body Stripe returns with every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub decline_code: Option<String>,
}

/// Maps a failed response into a `PaymentError`.
///
/// The status decides the error class; Stripe's `code` (or `decline_code`
/// for card errors) is kept as the provider code.
pub fn decode_error(status: u16, body: &str) -> PaymentError {
    let code = PaymentErrorCode::from_status(status);

    match serde_json::from_str::<StripeErrorEnvelope>(body) {
        Ok(envelope) => {
            let message = envelope
                .error
                .message
                .unwrap_or_else(|| format!("Stripe API error (status {})", status));
            let err = PaymentError::new(code, message);
            match envelope.error.decline_code.or(envelope.error.code) {
                Some(provider_code) => err.with_provider_code(provider_code),
                None => err,
            }
        }
        Err(_) => PaymentError::new(code, format!("Stripe API error (status {})", status)),
    }
}

/// Subscription created with `expand[]=latest_invoice.payment_intent`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub latest_invoice: Option<ExpandedInvoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpandedInvoice {
    #[serde(default)]
    pub payment_intent: Option<ExpandedPaymentIntent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpandedPaymentIntent {
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl From<StripeSubscription> for Subscription {
    fn from(sub: StripeSubscription) -> Self {
        let client_secret = sub
            .latest_invoice
            .and_then(|invoice| invoice.payment_intent)
            .and_then(|intent| intent.client_secret);

        Subscription {
            id: sub.id,
            status: sub.status,
            client_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Customer;

    // ══════════════════════════════════════════════════════════════
    // Error Decoding Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn decodes_invalid_request_error() {
        let body = r#"{"error":{"message":"No such customer: 'cus_x'","type":"invalid_request_error","code":"resource_missing","param":"customer"}}"#;

        let err = decode_error(404, body);

        assert_eq!(err.code, PaymentErrorCode::NotFound);
        assert_eq!(err.message, "No such customer: 'cus_x'");
        assert_eq!(err.provider_code.as_deref(), Some("resource_missing"));
    }

    #[test]
    fn card_errors_prefer_decline_code() {
        let body = r#"{"error":{"message":"Your card has insufficient funds.","type":"card_error","code":"card_declined","decline_code":"insufficient_funds"}}"#;

        let err = decode_error(402, body);

        assert_eq!(err.code, PaymentErrorCode::CardDeclined);
        assert_eq!(err.provider_code.as_deref(), Some("insufficient_funds"));
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        let err = decode_error(502, "<html>Bad gateway</html>");

        assert_eq!(err.code, PaymentErrorCode::ProviderError);
        assert_eq!(err.message, "Stripe API error (status 502)");
        assert!(err.provider_code.is_none());
    }

    #[test]
    fn rate_limit_status_is_classified() {
        let body = r#"{"error":{"message":"Too many requests","type":"rate_limit_error"}}"#;

        let err = decode_error(429, body);

        assert_eq!(err.code, PaymentErrorCode::RateLimitExceeded);
        assert_eq!(err.message, "Too many requests");
    }

    // ══════════════════════════════════════════════════════════════
    // Response Shape Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn list_envelope_decodes() {
        let body = r#"{"object":"list","url":"/v1/customers","has_more":false,"data":[{"id":"cus_1","email":"a@b.c"}]}"#;

        let list: StripeList<Customer> = serde_json::from_str(body).unwrap();

        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn expanded_subscription_exposes_client_secret() {
        let body = r#"{"id":"sub_1","status":"incomplete","latest_invoice":{"id":"in_1","payment_intent":{"id":"pi_1","client_secret":"pi_1_secret_x"}}}"#;

        let sub: Subscription = serde_json::from_str::<StripeSubscription>(body).unwrap().into();

        assert_eq!(sub.client_secret.as_deref(), Some("pi_1_secret_x"));
        assert_eq!(sub.status, "incomplete");
    }

    #[test]
    fn subscription_without_payment_intent_has_no_secret() {
        let body = r#"{"id":"sub_1","status":"active","latest_invoice":{"id":"in_1","payment_intent":null}}"#;

        let sub: Subscription = serde_json::from_str::<StripeSubscription>(body).unwrap().into();

        assert!(sub.client_secret.is_none());
    }
}
