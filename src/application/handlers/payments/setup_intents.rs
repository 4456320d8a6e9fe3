//! Setup intent handlers - save a payment method for later use.

use std::sync::Arc;

use crate::domain::payments::{require, PaymentsError};
use crate::ports::{CreateSetupIntent, Metadata, PaymentProvider, SetupIntent};

use super::customers::find_or_create_customer;

const SETUP_INTENT_ID_REQUIRED: &str = "Setup Intent ID is required";

/// Command to start saving a card.
#[derive(Debug, Clone, Default)]
pub struct CreateSetupIntentCommand {
    /// When set, the setup intent is bound to this customer (found or created).
    pub customer_email: Option<String>,
    /// `off_session` (default) or `on_session`.
    pub usage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSetupIntentResult {
    pub setup_intent: SetupIntent,
    pub customer_id: Option<String>,
}

pub struct CreateSetupIntentHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl CreateSetupIntentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: CreateSetupIntentCommand,
    ) -> Result<CreateSetupIntentResult, PaymentsError> {
        let email = cmd.customer_email.filter(|e| !e.is_empty());

        let customer_id = match &email {
            Some(email) => Some(
                find_or_create_customer(self.provider.as_ref(), email, None)
                    .await?
                    .id,
            ),
            None => None,
        };

        let mut metadata = Metadata::new();
        metadata.insert(
            "customer_email".to_string(),
            email.unwrap_or_else(|| "unknown".to_string()),
        );
        metadata.insert("created_at".to_string(), chrono::Utc::now().to_rfc3339());

        let setup_intent = self
            .provider
            .create_setup_intent(CreateSetupIntent {
                customer: customer_id.clone(),
                usage: cmd
                    .usage
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| "off_session".to_string()),
                payment_method_types: vec!["card".to_string()],
                metadata,
            })
            .await?;

        tracing::info!(
            setup_intent_id = %setup_intent.id,
            customer_id = ?customer_id,
            "Setup intent created"
        );

        Ok(CreateSetupIntentResult {
            setup_intent,
            customer_id,
        })
    }
}

/// Query for a setup intent.
#[derive(Debug, Clone, Default)]
pub struct RetrieveSetupIntentCommand {
    pub setup_intent_id: Option<String>,
}

pub struct RetrieveSetupIntentHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl RetrieveSetupIntentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(
        &self,
        cmd: RetrieveSetupIntentCommand,
    ) -> Result<SetupIntent, PaymentsError> {
        let id = require(cmd.setup_intent_id, SETUP_INTENT_ID_REQUIRED)?;
        Ok(self.provider.retrieve_setup_intent(&id).await?)
    }
}
