//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
///
/// Secrets are wrapped in [`SecretString`] so that `Debug` output and
/// tracing fields never contain key material.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...)
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret (whsec_...)
    pub stripe_webhook_secret: SecretString,

    /// Publishable key handed to clients by `GET /config`
    pub publishable_key: Option<String>,

    /// Redirect target after a successful checkout
    #[serde(default = "default_success_url")]
    pub success_url: String,

    /// Redirect target after an abandoned checkout
    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,

    /// Return URL required by some payment methods on confirmed intents
    #[serde(default = "default_return_url")]
    pub return_url: String,

    /// Base URL for the Stripe API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Pinned Stripe API version (sent as `Stripe-Version`, used for ephemeral keys)
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl PaymentConfig {
    /// Build a config from the two required secrets, defaults elsewhere.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            stripe_api_key: SecretString::new(api_key.into()),
            stripe_webhook_secret: SecretString::new(webhook_secret.into()),
            publishable_key: None,
            success_url: default_success_url(),
            cancel_url: default_cancel_url(),
            return_url: default_return_url(),
            api_base_url: default_api_base_url(),
            api_version: default_api_version(),
        }
    }

    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        for (field, value) in [
            ("success_url", &self.success_url),
            ("cancel_url", &self.cancel_url),
            ("return_url", &self.return_url),
            ("api_base_url", &self.api_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ValidationError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }
}

fn default_success_url() -> String {
    "http://localhost:3000/success".to_string()
}

fn default_cancel_url() -> String {
    "http://localhost:3000/cancel".to_string()
}

fn default_return_url() -> String {
    "https://your-website.com/return".to_string()
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn default_api_version() -> String {
    "2023-10-16".to_string()
}
