//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API.
//! Every call is a single form-encoded request authenticated with the
//! secret key and pinned to the configured API version.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::from_payment_config(&app_config.payment);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Method, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::PaymentConfig;
use crate::ports::{
    CardSource, Charge, CreateCharge, CreateCustomer, CreatePaymentIntent, CreatePrice,
    CreateProduct, CreateSetupIntent, CreateSubscription, Customer, EphemeralKey, PaymentError,
    PaymentIntent, PaymentMethod, PaymentMethodList, PaymentProvider, Price, Product,
    SetupIntent, Subscription,
};

use super::form::FormParams;
use super::wire_types::{decode_error, StripeList, StripeSubscription};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Value of the `Stripe-Version` header.
    api_version: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            api_version: "2023-10-16".to_string(),
        }
    }

    /// Create configuration from the loaded application config.
    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.stripe_api_key.clone(),
            api_base_url: config.api_base_url.clone(),
            api_version: config.api_version.clone(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Pin a different API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Builds `{base}/v1/{segments...}`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url, PaymentError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| PaymentError::provider(format!("Invalid Stripe base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::provider("Invalid Stripe base URL"))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
        query: FormParams,
    ) -> Result<T, PaymentError> {
        self.send(operation, Method::GET, segments, query).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
        params: FormParams,
    ) -> Result<T, PaymentError> {
        self.send(operation, Method::POST, segments, params).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        params: FormParams,
    ) -> Result<T, PaymentError> {
        let url = self.url(segments)?;

        let mut request = self
            .http_client
            .request(method.clone(), url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Stripe-Version", &self.config.api_version);

        request = if method == Method::GET {
            request.query(params.as_pairs())
        } else {
            request.form(params.as_pairs())
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Stripe request failed to send");
            PaymentError::network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = decode_error(status.as_u16(), &body);
            tracing::warn!(
                operation,
                status = status.as_u16(),
                code = %err.code,
                provider_code = ?err.provider_code,
                "Stripe API error"
            );
            return Err(err);
        }

        response.json().await.map_err(|e| {
            tracing::error!(operation, error = %e, "Failed to parse Stripe response");
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut params = FormParams::new()
            .push("amount", request.amount)
            .push("currency", request.currency)
            .push_list("payment_method_types", &request.payment_method_types)
            .push_opt("payment_method", request.payment_method)
            .push_opt("customer", request.customer);

        if request.confirm {
            params = params
                .push("confirmation_method", "manual")
                .push("confirm", "true");
        }

        let params = params
            .push_opt("return_url", request.return_url)
            .push_map("metadata", &request.metadata);

        self.post("create_payment_intent", &["payment_intents"], params)
            .await
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        self.get(
            "retrieve_payment_intent",
            &["payment_intents", id],
            FormParams::new(),
        )
        .await
    }

    async fn create_setup_intent(
        &self,
        request: CreateSetupIntent,
    ) -> Result<SetupIntent, PaymentError> {
        let params = FormParams::new()
            .push_opt("customer", request.customer)
            .push("usage", request.usage)
            .push_list("payment_method_types", &request.payment_method_types)
            .push_map("metadata", &request.metadata);

        self.post("create_setup_intent", &["setup_intents"], params)
            .await
    }

    async fn retrieve_setup_intent(&self, id: &str) -> Result<SetupIntent, PaymentError> {
        self.get(
            "retrieve_setup_intent",
            &["setup_intents", id],
            FormParams::new(),
        )
        .await
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError> {
        let query = FormParams::new().push("email", email).push("limit", 1);

        let list: StripeList<Customer> = self
            .get("find_customer_by_email", &["customers"], query)
            .await?;

        Ok(list.data.into_iter().next())
    }

    async fn create_customer(&self, request: CreateCustomer) -> Result<Customer, PaymentError> {
        let params = FormParams::new()
            .push("email", request.email)
            .push_opt("phone", request.phone);

        self.post("create_customer", &["customers"], params).await
    }

    async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<Customer, PaymentError> {
        let params = FormParams::new().push(
            "invoice_settings[default_payment_method]",
            payment_method_id,
        );

        self.post(
            "set_default_payment_method",
            &["customers", customer_id],
            params,
        )
        .await
    }

    async fn create_ephemeral_key(&self, customer_id: &str) -> Result<EphemeralKey, PaymentError> {
        let params = FormParams::new().push("customer", customer_id);

        self.post("create_ephemeral_key", &["ephemeral_keys"], params)
            .await
    }

    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<PaymentMethodList, PaymentError> {
        let query = FormParams::new()
            .push("customer", customer_id)
            .push("type", "card");

        self.get("list_payment_methods", &["payment_methods"], query)
            .await
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        let params = FormParams::new().push("customer", customer_id);

        self.post(
            "attach_payment_method",
            &["payment_methods", payment_method_id, "attach"],
            params,
        )
        .await
    }

    async fn detach_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        self.post(
            "detach_payment_method",
            &["payment_methods", payment_method_id, "detach"],
            FormParams::new(),
        )
        .await
    }

    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> Result<Subscription, PaymentError> {
        let params = FormParams::new()
            .push("customer", request.customer)
            .push("items[0][price]", request.price)
            .push("payment_behavior", "default_incomplete")
            .push(
                "payment_settings[save_default_payment_method]",
                "on_subscription",
            )
            .push_list("expand", &["latest_invoice.payment_intent"]);

        let subscription: StripeSubscription = self
            .post("create_subscription", &["subscriptions"], params)
            .await?;

        Ok(subscription.into())
    }

    async fn create_product(&self, request: CreateProduct) -> Result<Product, PaymentError> {
        let params = FormParams::new()
            .push("name", request.name)
            .push_opt("description", request.description);

        self.post("create_product", &["products"], params).await
    }

    async fn create_price(&self, request: CreatePrice) -> Result<Price, PaymentError> {
        let params = FormParams::new()
            .push("unit_amount", request.unit_amount)
            .push("currency", request.currency)
            .push("recurring[interval]", request.interval)
            .push("product", request.product);

        self.post("create_price", &["prices"], params).await
    }

    async fn create_charge(&self, request: CreateCharge) -> Result<Charge, PaymentError> {
        let params = FormParams::new()
            .push("amount", request.amount)
            .push("currency", request.currency)
            .push("source", request.source)
            .push("description", request.description);

        self.post("create_charge", &["charges"], params).await
    }

    async fn create_customer_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> Result<CardSource, PaymentError> {
        let params = FormParams::new().push("source", token);

        self.post(
            "create_customer_source",
            &["customers", customer_id, "sources"],
            params,
        )
        .await
    }

    async fn update_customer_source_cvc(
        &self,
        customer_id: &str,
        card_id: &str,
        cvc_update_token: &str,
    ) -> Result<CardSource, PaymentError> {
        let params = FormParams::new().push("cvc_update_token", cvc_update_token);

        self.post(
            "update_customer_source_cvc",
            &["customers", customer_id, "sources", card_id],
            params,
        )
        .await
    }
}
