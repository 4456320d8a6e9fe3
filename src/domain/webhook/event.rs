//! Stripe webhook event types.
//!
//! Defines the structures for decoding verified webhook payloads.
//! Only the envelope is typed; `data.object` stays opaque until a handler
//! asks for a concrete view of it.

use serde::{Deserialize, Serialize};

/// A verified Stripe event.
///
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WebhookEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type tag from Stripe's open-ended vocabulary (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: i64,

    /// Object containing event-specific data.
    pub data: EventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl WebhookEvent {
    /// The recognized kind of this event, if any.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_type(&self.event_type)
    }

    /// The payload object, exactly as decoded.
    pub fn payload(&self) -> &serde_json::Value {
        &self.data.object
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }
}

/// Event types that have a dedicated handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A payment intent completed successfully.
    PaymentIntentSucceeded,
    /// A payment attempt on a payment intent failed.
    PaymentIntentPaymentFailed,
    /// A setup intent saved a payment method.
    SetupIntentSucceeded,
    /// A setup intent failed to save a payment method.
    SetupIntentSetupFailed,
    /// An invoice was paid.
    InvoicePaymentSucceeded,
    /// An invoice payment attempt failed.
    InvoicePaymentFailed,
    /// A subscription was cancelled.
    CustomerSubscriptionDeleted,
}

impl EventKind {
    /// Every kind with a dedicated handler.
    pub const ALL: [EventKind; 7] = [
        EventKind::PaymentIntentSucceeded,
        EventKind::PaymentIntentPaymentFailed,
        EventKind::SetupIntentSucceeded,
        EventKind::SetupIntentSetupFailed,
        EventKind::InvoicePaymentSucceeded,
        EventKind::InvoicePaymentFailed,
        EventKind::CustomerSubscriptionDeleted,
    ];

    /// Exact match on the Stripe type tag. Unrecognized tags yield `None`.
    pub fn from_type(s: &str) -> Option<Self> {
        match s {
            "payment_intent.succeeded" => Some(Self::PaymentIntentSucceeded),
            "payment_intent.payment_failed" => Some(Self::PaymentIntentPaymentFailed),
            "setup_intent.succeeded" => Some(Self::SetupIntentSucceeded),
            "setup_intent.setup_failed" => Some(Self::SetupIntentSetupFailed),
            "invoice.payment_succeeded" => Some(Self::InvoicePaymentSucceeded),
            "invoice.payment_failed" => Some(Self::InvoicePaymentFailed),
            "customer.subscription.deleted" => Some(Self::CustomerSubscriptionDeleted),
            _ => None,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            Self::SetupIntentSucceeded => "setup_intent.succeeded",
            Self::SetupIntentSetupFailed => "setup_intent.setup_failed",
            Self::InvoicePaymentSucceeded => "invoice.payment_succeeded",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for creating test WebhookEvent instances.
#[cfg(test)]
pub struct WebhookEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
}

#[cfg(test)]
impl Default for WebhookEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({"id": "pi_test_123"}),
        }
    }
}

#[cfg(test)]
impl WebhookEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> WebhookEvent {
        WebhookEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: EventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: false,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_type_tag() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_type(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_type_is_not_a_kind() {
        assert_eq!(EventKind::from_type("foo.bar"), None);
        assert_eq!(EventKind::from_type("payment_intent.created"), None);
    }

    #[test]
    fn type_matching_is_exact() {
        assert_eq!(EventKind::from_type("Payment_Intent.Succeeded"), None);
        assert_eq!(EventKind::from_type(" payment_intent.succeeded"), None);
    }

    #[test]
    fn decodes_minimal_stripe_envelope() {
        let json = r#"{
            "id": "evt_1",
            "object": "event",
            "type": "invoice.payment_failed",
            "created": 1704067200,
            "data": {"object": {"id": "in_1", "amount_due": 500}},
            "livemode": false,
            "pending_webhooks": 1
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.kind(), Some(EventKind::InvoicePaymentFailed));
        assert_eq!(event.payload()["amount_due"], 500);
        assert!(event.api_version.is_none());
    }

    #[test]
    fn envelope_without_data_fails_to_decode() {
        let json = r#"{"id": "evt_1", "type": "invoice.paid"}"#;
        assert!(serde_json::from_str::<WebhookEvent>(json).is_err());
    }

    #[test]
    fn deserialize_object_reads_payload() {
        #[derive(Deserialize)]
        struct PaymentIntentRef {
            id: String,
        }

        let event = WebhookEventBuilder::new()
            .object(serde_json::json!({"id": "pi_42", "amount": 100}))
            .build();

        let intent: PaymentIntentRef = event.deserialize_object().unwrap();
        assert_eq!(intent.id, "pi_42");
    }
}
