//! Subscription handlers - recurring products and subscriptions to them.

use std::sync::Arc;

use crate::domain::payments::{Currency, MinorUnits, PaymentsError};
use crate::ports::{
    CreatePrice, CreateProduct, CreateSubscription, PaymentProvider, Price, Product, Subscription,
};

const CUSTOMER_AND_PRICE_REQUIRED: &str = "Customer ID and Price ID are required";
const NAME_AND_PRICE_REQUIRED: &str = "Name and price are required";

// ════════════════════════════════════════════════════════════════════════════
// Subscriptions
// ════════════════════════════════════════════════════════════════════════════

/// Command to subscribe a customer to a price.
#[derive(Debug, Clone, Default)]
pub struct CreateSubscriptionCommand {
    pub customer_id: Option<String>,
    pub price_id: Option<String>,
    /// When set, attached to the customer and made the invoice default first.
    pub payment_method_id: Option<String>,
}

pub struct CreateSubscriptionHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreateSubscriptionHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<Subscription, PaymentsError> {
        let (customer_id, price_id) = match (
            cmd.customer_id.filter(|c| !c.is_empty()),
            cmd.price_id.filter(|p| !p.is_empty()),
        ) {
            (Some(customer_id), Some(price_id)) => (customer_id, price_id),
            _ => return Err(PaymentsError::validation(CUSTOMER_AND_PRICE_REQUIRED)),
        };

        if let Some(payment_method_id) = cmd.payment_method_id.filter(|p| !p.is_empty()) {
            self.provider
                .attach_payment_method(&payment_method_id, &customer_id)
                .await?;
            self.provider
                .set_default_payment_method(&customer_id, &payment_method_id)
                .await?;
            tracing::debug!(
                customer_id = %customer_id,
                payment_method_id = %payment_method_id,
                "Default payment method set"
            );
        }

        let subscription = self
            .provider
            .create_subscription(CreateSubscription {
                customer: customer_id.clone(),
                price: price_id,
            })
            .await?;

        tracing::info!(
            subscription_id = %subscription.id,
            customer_id = %customer_id,
            status = %subscription.status,
            "Subscription created"
        );

        Ok(subscription)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Products
// ════════════════════════════════════════════════════════════════════════════

/// Command to create a product with a recurring price.
#[derive(Debug, Clone, Default)]
pub struct CreateProductCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Price in major units.
    pub price: Option<f64>,
    pub currency: Option<String>,
    /// Billing interval; `month` when omitted.
    pub interval: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProductResult {
    pub product: Product,
    pub price: Price,
    /// The price as the caller sent it, in major units.
    pub amount: f64,
    pub interval: String,
}

pub struct CreateProductHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreateProductHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CreateProductCommand,
    ) -> Result<CreateProductResult, PaymentsError> {
        let name = cmd.name.filter(|n| !n.is_empty());
        let unit_amount = cmd.price.and_then(MinorUnits::from_major);
        let (name, amount, unit_amount) = match (name, cmd.price, unit_amount) {
            (Some(name), Some(amount), Some(unit_amount)) => (name, amount, unit_amount),
            _ => return Err(PaymentsError::validation(NAME_AND_PRICE_REQUIRED)),
        };
        let interval = cmd
            .interval
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| "month".to_string());

        let product = self
            .provider
            .create_product(CreateProduct {
                name,
                description: cmd.description.filter(|d| !d.is_empty()),
            })
            .await?;

        let price = self
            .provider
            .create_price(CreatePrice {
                product: product.id.clone(),
                unit_amount,
                currency: Currency::or_default(cmd.currency.as_deref()),
                interval: interval.clone(),
            })
            .await?;

        tracing::info!(
            product_id = %product.id,
            price_id = %price.id,
            unit_amount = %unit_amount,
            interval = %interval,
            "Product created"
        );

        Ok(CreateProductResult {
            product,
            price,
            amount,
            interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::{Customer, PaymentError};

    fn provider_with_customer() -> Arc<MockPaymentProvider> {
        let provider = Arc::new(MockPaymentProvider::new());
        provider.add_customer(Customer {
            id: "cus_1".to_string(),
            email: Some("a@b.c".to_string()),
            phone: None,
        });
        provider
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Subscription Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn subscription_without_payment_method_skips_attach() {
        let provider = provider_with_customer();

        let subscription = CreateSubscriptionHandler::new(provider.clone())
            .handle(CreateSubscriptionCommand {
                customer_id: Some("cus_1".to_string()),
                price_id: Some("price_1".to_string()),
                payment_method_id: None,
            })
            .await
            .unwrap();

        assert_eq!(subscription.status, "incomplete");
        assert!(subscription.client_secret.is_some());
        assert!(!provider.was_called("attach_payment_method"));
    }

    #[tokio::test]
    async fn subscription_attaches_and_defaults_payment_method_first() {
        let provider = provider_with_customer();

        CreateSubscriptionHandler::new(provider.clone())
            .handle(CreateSubscriptionCommand {
                customer_id: Some("cus_1".to_string()),
                price_id: Some("price_1".to_string()),
                payment_method_id: Some("pm_1".to_string()),
            })
            .await
            .unwrap();

        let methods: Vec<String> = provider.calls().into_iter().map(|c| c.method).collect();
        assert_eq!(
            methods,
            vec![
                "attach_payment_method",
                "set_default_payment_method",
                "create_subscription"
            ]
        );
    }

    #[tokio::test]
    async fn attach_failure_stops_before_subscribing() {
        let provider = provider_with_customer();
        provider.set_method_error(
            "attach_payment_method",
            PaymentError::card_declined("Your card was declined."),
        );

        let err = CreateSubscriptionHandler::new(provider.clone())
            .handle(CreateSubscriptionCommand {
                customer_id: Some("cus_1".to_string()),
                price_id: Some("price_1".to_string()),
                payment_method_id: Some("pm_1".to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Your card was declined.");
        assert!(!provider.was_called("create_subscription"));
    }

    #[tokio::test]
    async fn subscription_requires_customer_and_price() {
        let handler = CreateSubscriptionHandler::new(Arc::new(MockPaymentProvider::new()));

        let err = handler
            .handle(CreateSubscriptionCommand {
                customer_id: Some("cus_1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), CUSTOMER_AND_PRICE_REQUIRED);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Product Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn product_gets_recurring_price_with_defaults() {
        let provider = Arc::new(MockPaymentProvider::new());

        let result = CreateProductHandler::new(provider.clone())
            .handle(CreateProductCommand {
                name: Some("Pro".to_string()),
                price: Some(9.99),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.product.name, "Pro");
        assert_eq!(result.amount, 9.99);
        assert_eq!(result.interval, "month");
        let price_call = provider
            .calls()
            .into_iter()
            .find(|c| c.method == "create_price")
            .unwrap();
        assert_eq!(price_call.args, vec![result.product.id.as_str(), "999", "usd", "month"]);
    }

    #[tokio::test]
    async fn product_requires_name_and_positive_price() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = CreateProductHandler::new(provider.clone());

        for cmd in [
            CreateProductCommand {
                price: Some(5.0),
                ..Default::default()
            },
            CreateProductCommand {
                name: Some("Pro".to_string()),
                ..Default::default()
            },
            CreateProductCommand {
                name: Some("Pro".to_string()),
                price: Some(0.0),
                ..Default::default()
            },
        ] {
            let err = handler.handle(cmd).await.unwrap_err();
            assert_eq!(err.message(), NAME_AND_PRICE_REQUIRED);
        }
        assert!(!provider.was_called("create_product"));
    }
}
