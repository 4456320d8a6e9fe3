//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::{
    AttachTokenHandler, ChargeTokenHandler, ConfirmPaymentHandler, CreateCustomerHandler,
    CreatePaymentIntentHandler, CreatePaymentWithSavedMethodHandler, CreateProductHandler,
    CreateSetupIntentHandler, CreateSubscriptionHandler, DeletePaymentMethodHandler,
    GetEphemeralKeyHandler, HandleWebhookHandler, ListPaymentMethodsHandler,
    RetrieveSetupIntentHandler, UpdateCvcTokenHandler,
};
use crate::config::{AppConfig, PaymentConfig};
use crate::domain::webhook::{
    default_registry, WebhookDispatcher, WebhookVerifier, WebhookVerifierConfig,
};
use crate::ports::{HandlerFailureSink, PaymentProvider};

/// Settings that are safe to hand to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicSettings {
    pub publishable_key: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    /// Return URL sent with confirmed payment intents.
    pub return_url: String,
}

impl PublicSettings {
    pub fn from_config(payment: &PaymentConfig) -> Self {
        Self {
            publishable_key: payment.publishable_key.clone(),
            success_url: payment.success_url.clone(),
            cancel_url: payment.cancel_url.clone(),
            return_url: payment.return_url.clone(),
        }
    }
}

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct AppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub webhook_verifier: Arc<WebhookVerifier>,
    pub webhook_dispatcher: WebhookDispatcher,
    pub settings: Arc<PublicSettings>,
}

impl AppState {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        webhook_verifier: WebhookVerifier,
        webhook_dispatcher: WebhookDispatcher,
        settings: PublicSettings,
    ) -> Self {
        Self {
            payment_provider,
            webhook_verifier: Arc::new(webhook_verifier),
            webhook_dispatcher,
            settings: Arc::new(settings),
        }
    }

    /// Wires the default webhook handlers and verifier from configuration.
    pub fn from_config(
        config: &AppConfig,
        payment_provider: Arc<dyn PaymentProvider>,
        failures: Arc<dyn HandlerFailureSink>,
    ) -> Self {
        let verifier = WebhookVerifier::from_config(WebhookVerifierConfig::new(
            &config.payment,
            &config.webhook,
        ));
        let dispatcher = WebhookDispatcher::from_config(
            default_registry(),
            failures,
            &config.webhook,
            config.server.request_timeout(),
        );

        Self::new(
            payment_provider,
            verifier,
            dispatcher,
            PublicSettings::from_config(&config.payment),
        )
    }

    // Handlers are cheap to build, so they are created per request.

    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.payment_provider.clone())
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(self.payment_provider.clone())
    }

    pub fn create_setup_intent_handler(&self) -> CreateSetupIntentHandler {
        CreateSetupIntentHandler::new(self.payment_provider.clone())
    }

    pub fn retrieve_setup_intent_handler(&self) -> RetrieveSetupIntentHandler {
        RetrieveSetupIntentHandler::new(self.payment_provider.clone())
    }

    pub fn saved_method_payment_handler(&self) -> CreatePaymentWithSavedMethodHandler {
        CreatePaymentWithSavedMethodHandler::new(
            self.payment_provider.clone(),
            self.settings.return_url.clone(),
        )
    }

    pub fn create_customer_handler(&self) -> CreateCustomerHandler {
        CreateCustomerHandler::new(self.payment_provider.clone())
    }

    pub fn ephemeral_key_handler(&self) -> GetEphemeralKeyHandler {
        GetEphemeralKeyHandler::new(self.payment_provider.clone())
    }

    pub fn list_payment_methods_handler(&self) -> ListPaymentMethodsHandler {
        ListPaymentMethodsHandler::new(self.payment_provider.clone())
    }

    pub fn delete_payment_method_handler(&self) -> DeletePaymentMethodHandler {
        DeletePaymentMethodHandler::new(self.payment_provider.clone())
    }

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(self.payment_provider.clone())
    }

    pub fn create_product_handler(&self) -> CreateProductHandler {
        CreateProductHandler::new(self.payment_provider.clone())
    }

    pub fn charge_token_handler(&self) -> ChargeTokenHandler {
        ChargeTokenHandler::new(self.payment_provider.clone())
    }

    pub fn attach_token_handler(&self) -> AttachTokenHandler {
        AttachTokenHandler::new(self.payment_provider.clone())
    }

    pub fn update_cvc_token_handler(&self) -> UpdateCvcTokenHandler {
        UpdateCvcTokenHandler::new(self.payment_provider.clone())
    }

    pub fn webhook_handler(&self) -> HandleWebhookHandler {
        HandleWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.webhook_dispatcher.clone(),
        )
    }
}
