//! Typed views over the `data.object` of recognized events.
//!
//! Only the fields the handlers read are modelled; everything else in the
//! Stripe object is ignored. `id` is always required.

use std::collections::HashMap;

use serde::Deserialize;

/// Payment intent as carried by `payment_intent.*` events.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PaymentIntentObject {
    pub id: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub last_payment_error: Option<serde_json::Value>,
}

impl PaymentIntentObject {
    pub fn customer_email(&self) -> Option<&str> {
        self.metadata.get("customer_email").map(String::as_str)
    }

    pub fn order_id(&self) -> Option<&str> {
        self.metadata.get("order_id").map(String::as_str)
    }

    pub fn last_error_message(&self) -> Option<&str> {
        self.last_payment_error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
    }
}

/// Setup intent as carried by `setup_intent.*` events.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SetupIntentObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub last_setup_error: Option<serde_json::Value>,
}

impl SetupIntentObject {
    pub fn last_error_message(&self) -> Option<&str> {
        self.last_setup_error
            .as_ref()
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
    }
}

/// Invoice as carried by `invoice.*` events.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InvoiceObject {
    pub id: String,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub amount_paid: Option<i64>,
    #[serde(default)]
    pub amount_due: Option<i64>,
}

/// Subscription as carried by `customer.subscription.*` events.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubscriptionObject {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub ended_at: Option<i64>,
}
