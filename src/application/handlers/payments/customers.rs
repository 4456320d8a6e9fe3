//! Customer handlers - find-or-create and ephemeral keys.

use std::sync::Arc;

use crate::domain::payments::{require, PaymentsError};
use crate::ports::{CreateCustomer, Customer, EphemeralKey, PaymentError, PaymentProvider};

const EMAIL_REQUIRED: &str = "Email is required";
const CUSTOMER_ID_REQUIRED: &str = "Customer ID is required";

/// Returns the existing customer with this email, or creates one.
pub(crate) async fn find_or_create_customer(
    provider: &dyn PaymentProvider,
    email: &str,
    phone: Option<String>,
) -> Result<Customer, PaymentError> {
    if let Some(customer) = provider.find_customer_by_email(email).await? {
        tracing::debug!(customer_id = %customer.id, "Reusing existing customer");
        return Ok(customer);
    }

    let customer = provider
        .create_customer(CreateCustomer {
            email: email.to_string(),
            phone,
        })
        .await?;

    tracing::info!(customer_id = %customer.id, "Customer created");

    Ok(customer)
}

/// Command to ensure a customer exists for an email.
#[derive(Debug, Clone, Default)]
pub struct CreateCustomerCommand {
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct CreateCustomerHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreateCustomerHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: CreateCustomerCommand) -> Result<Customer, PaymentsError> {
        let email = require(cmd.email, EMAIL_REQUIRED)?;
        let phone = cmd.phone.filter(|p| !p.is_empty());

        Ok(find_or_create_customer(self.provider.as_ref(), &email, phone).await?)
    }
}

/// Command to mint an ephemeral key for a customer.
#[derive(Debug, Clone, Default)]
pub struct GetEphemeralKeyCommand {
    pub customer_id: Option<String>,
}

pub struct GetEphemeralKeyHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl GetEphemeralKeyHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: GetEphemeralKeyCommand) -> Result<EphemeralKey, PaymentsError> {
        let customer_id = require(cmd.customer_id, CUSTOMER_ID_REQUIRED)?;

        let key = self.provider.create_ephemeral_key(&customer_id).await?;

        tracing::debug!(customer_id = %customer_id, key_id = %key.id, "Ephemeral key created");

        Ok(key)
    }
}
