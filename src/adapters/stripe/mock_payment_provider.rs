//! Mock payment provider for testing.
//!
//! Provides an in-memory implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Objects that behave like Stripe's (create, then retrieve or list)
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::json;

use crate::ports::{
    CardDetails, CardSource, Charge, CreateCharge, CreateCustomer, CreatePaymentIntent,
    CreatePrice, CreateProduct, CreateSetupIntent, CreateSubscription, Customer, EphemeralKey,
    ExtraFields, PaymentError, PaymentIntent, PaymentMethod, PaymentMethodList, PaymentProvider,
    Price, Product, SetupIntent, Subscription,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Seed state
/// mock.add_customer(Customer { id: "cus_123".into(), email: Some("a@b.c".into()), phone: None });
///
/// // Inject errors
/// mock.set_method_error("create_charge", PaymentError::card_declined("Test decline"));
///
/// // Use in tests
/// let result = mock.create_customer(request).await;
/// assert_eq!(mock.call_count("create_customer"), 1);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Counter for generated ids.
    next_id: u64,

    customers: Vec<Customer>,
    payment_intents: HashMap<String, PaymentIntent>,
    setup_intents: HashMap<String, SetupIntent>,

    /// Attached payment methods by customer id.
    payment_methods: HashMap<String, Vec<PaymentMethod>>,

    /// Requests received, for assertions on what was sent.
    payment_intent_requests: Vec<CreatePaymentIntent>,
    setup_intent_requests: Vec<CreateSetupIntent>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

impl MockState {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_mock_{}", prefix, self.next_id)
    }
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A card payment method with the given display fields.
    pub fn card(id: &str, brand: &str, last4: &str) -> PaymentMethod {
        let mut extra = ExtraFields::new();
        extra.insert("object".to_string(), json!("payment_method"));
        extra.insert("type".to_string(), json!("card"));
        PaymentMethod {
            id: id.to_string(),
            created: 1_704_067_200,
            card: Some(CardDetails {
                brand: brand.to_string(),
                last4: last4.to_string(),
                exp_month: 12,
                exp_year: 2030,
                extra: ExtraFields::new(),
            }),
            extra,
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a customer to the "database".
    pub fn add_customer(&self, customer: Customer) {
        self.state().customers.push(customer);
    }

    /// Attach a payment method to a customer.
    pub fn add_payment_method(&self, customer_id: &str, payment_method: PaymentMethod) {
        self.state()
            .payment_methods
            .entry(customer_id.to_string())
            .or_default()
            .push(payment_method);
    }

    /// Add a payment intent so it can be retrieved.
    pub fn add_payment_intent(&self, intent: PaymentIntent) {
        self.state()
            .payment_intents
            .insert(intent.id.clone(), intent);
    }

    /// Add a setup intent so it can be retrieved.
    pub fn add_setup_intent(&self, intent: SetupIntent) {
        self.state().setup_intents.insert(intent.id.clone(), intent);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Payment intent creation requests, in order.
    pub fn payment_intent_requests(&self) -> Vec<CreatePaymentIntent> {
        self.state().payment_intent_requests.clone()
    }

    /// Setup intent creation requests, in order.
    pub fn setup_intent_requests(&self) -> Vec<CreateSetupIntent> {
        self.state().setup_intent_requests.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    /// Records the call, then returns any injected error.
    fn enter(
        &self,
        method: &str,
        args: &[&str],
    ) -> Result<MutexGuard<'_, MockState>, PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(state)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntent,
    ) -> Result<PaymentIntent, PaymentError> {
        let amount = request.amount.to_string();
        let mut state = self.enter("create_payment_intent", &[&amount, request.currency.as_str()])?;
        state.payment_intent_requests.push(request.clone());

        let id = state.id("pi");
        let intent = PaymentIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            status: if request.confirm {
                "succeeded".to_string()
            } else {
                "requires_payment_method".to_string()
            },
            amount: request.amount.value(),
            currency: request.currency.to_string(),
            payment_method: request.payment_method,
            metadata: request.metadata,
            id,
        };
        state
            .payment_intents
            .insert(intent.id.clone(), intent.clone());

        Ok(intent)
    }

    async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let state = self.enter("retrieve_payment_intent", &[id])?;
        state
            .payment_intents
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(&format!("payment_intent: '{}'", id)))
    }

    async fn create_setup_intent(
        &self,
        request: CreateSetupIntent,
    ) -> Result<SetupIntent, PaymentError> {
        let customer = request.customer.clone().unwrap_or_default();
        let mut state = self.enter("create_setup_intent", &[&customer, &request.usage])?;
        state.setup_intent_requests.push(request.clone());

        let id = state.id("seti");
        let intent = SetupIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            status: "requires_payment_method".to_string(),
            payment_method: None,
            customer: request.customer,
            usage: Some(request.usage),
            created: chrono::Utc::now().timestamp(),
            metadata: request.metadata,
            id,
        };
        state.setup_intents.insert(intent.id.clone(), intent.clone());

        Ok(intent)
    }

    async fn retrieve_setup_intent(&self, id: &str) -> Result<SetupIntent, PaymentError> {
        let state = self.enter("retrieve_setup_intent", &[id])?;
        state
            .setup_intents
            .get(id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(&format!("setup_intent: '{}'", id)))
    }

    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError> {
        let state = self.enter("find_customer_by_email", &[email])?;
        Ok(state
            .customers
            .iter()
            .find(|c| c.email.as_deref() == Some(email))
            .cloned())
    }

    async fn create_customer(&self, request: CreateCustomer) -> Result<Customer, PaymentError> {
        let mut state = self.enter("create_customer", &[&request.email])?;

        let customer = Customer {
            id: state.id("cus"),
            email: Some(request.email),
            phone: request.phone,
        };
        state.customers.push(customer.clone());

        Ok(customer)
    }

    async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<Customer, PaymentError> {
        let state = self.enter(
            "set_default_payment_method",
            &[customer_id, payment_method_id],
        )?;
        state
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(&format!("customer: '{}'", customer_id)))
    }

    async fn create_ephemeral_key(&self, customer_id: &str) -> Result<EphemeralKey, PaymentError> {
        let mut state = self.enter("create_ephemeral_key", &[customer_id])?;
        let id = state.id("ephkey");
        Ok(EphemeralKey {
            secret: format!("ek_test_{}", id),
            expires: None,
            id,
        })
    }

    async fn list_card_payment_methods(
        &self,
        customer_id: &str,
    ) -> Result<PaymentMethodList, PaymentError> {
        let state = self.enter("list_card_payment_methods", &[customer_id])?;
        Ok(PaymentMethodList {
            data: state
                .payment_methods
                .get(customer_id)
                .cloned()
                .unwrap_or_default(),
            has_more: false,
        })
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        let mut state = self.enter("attach_payment_method", &[payment_method_id, customer_id])?;
        let payment_method = Self::card(payment_method_id, "visa", "4242");
        state
            .payment_methods
            .entry(customer_id.to_string())
            .or_default()
            .push(payment_method.clone());
        Ok(payment_method)
    }

    async fn detach_payment_method(
        &self,
        payment_method_id: &str,
    ) -> Result<PaymentMethod, PaymentError> {
        let mut state = self.enter("detach_payment_method", &[payment_method_id])?;
        for methods in state.payment_methods.values_mut() {
            if let Some(index) = methods.iter().position(|pm| pm.id == payment_method_id) {
                return Ok(methods.remove(index));
            }
        }
        Err(PaymentError::not_found(&format!(
            "payment_method: '{}'",
            payment_method_id
        )))
    }

    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> Result<Subscription, PaymentError> {
        let mut state = self.enter("create_subscription", &[&request.customer, &request.price])?;
        let intent_id = state.id("pi");
        Ok(Subscription {
            id: state.id("sub"),
            status: "incomplete".to_string(),
            client_secret: Some(format!("{}_secret_mock", intent_id)),
        })
    }

    async fn create_product(&self, request: CreateProduct) -> Result<Product, PaymentError> {
        let mut state = self.enter("create_product", &[&request.name])?;
        Ok(Product {
            id: state.id("prod"),
            name: request.name,
        })
    }

    async fn create_price(&self, request: CreatePrice) -> Result<Price, PaymentError> {
        let amount = request.unit_amount.to_string();
        let mut state = self.enter(
            "create_price",
            &[&request.product, &amount, request.currency.as_str(), &request.interval],
        )?;
        Ok(Price {
            id: state.id("price"),
        })
    }

    async fn create_charge(&self, request: CreateCharge) -> Result<Charge, PaymentError> {
        let amount = request.amount.to_string();
        let mut state = self.enter(
            "create_charge",
            &[&request.source, &amount, request.currency.as_str()],
        )?;

        let mut extra = ExtraFields::new();
        extra.insert("object".to_string(), json!("charge"));
        extra.insert("currency".to_string(), json!(request.currency));
        extra.insert("description".to_string(), json!(request.description));
        extra.insert("paid".to_string(), json!(true));

        Ok(Charge {
            id: state.id("ch"),
            amount: request.amount.value(),
            status: Some("succeeded".to_string()),
            extra,
        })
    }

    async fn create_customer_source(
        &self,
        customer_id: &str,
        token: &str,
    ) -> Result<CardSource, PaymentError> {
        let mut state = self.enter("create_customer_source", &[customer_id, token])?;
        Ok(card_source(state.id("card"), customer_id))
    }

    async fn update_customer_source_cvc(
        &self,
        customer_id: &str,
        card_id: &str,
        cvc_update_token: &str,
    ) -> Result<CardSource, PaymentError> {
        let _state = self.enter(
            "update_customer_source_cvc",
            &[customer_id, card_id, cvc_update_token],
        )?;
        Ok(card_source(card_id.to_string(), customer_id))
    }
}

fn card_source(id: String, customer_id: &str) -> CardSource {
    let mut extra = ExtraFields::new();
    extra.insert("object".to_string(), json!("card"));
    extra.insert("customer".to_string(), json!(customer_id));
    extra.insert("brand".to_string(), json!("Visa"));
    extra.insert("last4".to_string(), json!("4242"));
    CardSource { id, extra }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payments::{Currency, MinorUnits};

    fn intent_request() -> CreatePaymentIntent {
        CreatePaymentIntent::new(MinorUnits::try_new(2000).unwrap(), Currency::default())
    }

    #[tokio::test]
    async fn created_payment_intent_can_be_retrieved() {
        let mock = MockPaymentProvider::new();

        let created = mock.create_payment_intent(intent_request()).await.unwrap();
        let retrieved = mock.retrieve_payment_intent(&created.id).await.unwrap();

        assert_eq!(created, retrieved);
        assert_eq!(retrieved.amount, 2000);
        assert_eq!(mock.payment_intent_requests().len(), 1);
    }

    #[tokio::test]
    async fn unknown_payment_intent_is_not_found() {
        let mock = MockPaymentProvider::new();

        let err = mock.retrieve_payment_intent("pi_missing").await.unwrap_err();

        assert_eq!(err.message, "No such payment_intent: 'pi_missing'");
    }

    #[tokio::test]
    async fn find_customer_matches_email() {
        let mock = MockPaymentProvider::new();
        let created = mock
            .create_customer(CreateCustomer {
                email: "a@b.c".to_string(),
                phone: None,
            })
            .await
            .unwrap();

        let found = mock.find_customer_by_email("a@b.c").await.unwrap();
        let missing = mock.find_customer_by_email("x@y.z").await.unwrap();

        assert_eq!(found, Some(created));
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn method_error_is_returned_and_call_recorded() {
        let mock = MockPaymentProvider::new();
        mock.set_method_error("create_charge", PaymentError::card_declined("declined"));

        let result = mock
            .create_charge(CreateCharge {
                amount: MinorUnits::try_new(500).unwrap(),
                currency: Currency::or_default(Some("inr")),
                source: "tok_visa".to_string(),
                description: "test".to_string(),
            })
            .await;

        assert!(result.is_err());
        assert!(mock.was_called("create_charge"));
        assert_eq!(mock.calls()[0].args, vec!["tok_visa", "500", "inr"]);
    }

    #[tokio::test]
    async fn global_error_is_consumed_once() {
        let mock = MockPaymentProvider::new();
        mock.set_error(PaymentError::network("reset"));

        assert!(mock.create_ephemeral_key("cus_1").await.is_err());
        assert!(mock.create_ephemeral_key("cus_1").await.is_ok());
        assert_eq!(mock.call_count("create_ephemeral_key"), 2);
    }

    #[tokio::test]
    async fn detach_removes_payment_method() {
        let mock = MockPaymentProvider::new();
        mock.add_payment_method("cus_1", MockPaymentProvider::card("pm_1", "visa", "4242"));

        let detached = mock.detach_payment_method("pm_1").await.unwrap();
        let remaining = mock.list_card_payment_methods("cus_1").await.unwrap();

        assert_eq!(detached.id, "pm_1");
        assert!(remaining.data.is_empty());
        assert!(mock.detach_payment_method("pm_1").await.is_err());
    }

    #[tokio::test]
    async fn clear_errors_restores_success() {
        let mock = MockPaymentProvider::new();
        mock.set_method_error("create_product", PaymentError::provider("boom"));
        mock.clear_errors();

        let product = mock
            .create_product(CreateProduct {
                name: "Pro".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(product.name, "Pro");
    }
}
