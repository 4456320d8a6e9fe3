//! Saved payment method handlers - list and delete.

use std::sync::Arc;

use crate::domain::payments::{require, PaymentsError};
use crate::ports::{PaymentMethod, PaymentMethodList, PaymentProvider};

const CUSTOMER_ID_REQUIRED: &str = "Customer ID is required";
const PAYMENT_METHOD_ID_REQUIRED: &str = "Payment method ID is required";

/// Query for a customer's saved cards.
#[derive(Debug, Clone, Default)]
pub struct ListPaymentMethodsCommand {
    pub customer_id: Option<String>,
}

pub struct ListPaymentMethodsHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl ListPaymentMethodsHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: ListPaymentMethodsCommand,
    ) -> Result<PaymentMethodList, PaymentsError> {
        let customer_id = require(cmd.customer_id, CUSTOMER_ID_REQUIRED)?;

        let list = self.provider.list_card_payment_methods(&customer_id).await?;

        tracing::debug!(
            customer_id = %customer_id,
            count = list.data.len(),
            has_more = list.has_more,
            "Payment methods listed"
        );

        Ok(list)
    }
}

/// Command to detach a saved payment method from its customer.
#[derive(Debug, Clone, Default)]
pub struct DeletePaymentMethodCommand {
    pub payment_method_id: Option<String>,
}

pub struct DeletePaymentMethodHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl DeletePaymentMethodHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: DeletePaymentMethodCommand,
    ) -> Result<PaymentMethod, PaymentsError> {
        let id = require(cmd.payment_method_id, PAYMENT_METHOD_ID_REQUIRED)?;

        let detached = self.provider.detach_payment_method(&id).await?;

        tracing::info!(payment_method_id = %detached.id, "Payment method detached");

        Ok(detached)
    }
}
