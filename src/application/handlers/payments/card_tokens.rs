//! Card token handlers - charges and legacy customer sources from client tokens.

use std::sync::Arc;

use crate::domain::payments::{Currency, MinorUnits, PaymentsError};
use crate::ports::{CardSource, Charge, CreateCharge, PaymentProvider};

const CHARGE_FIELDS_REQUIRED: &str = "Token ID, amount and currency are required";
const ATTACH_FIELDS_REQUIRED: &str = "Customer ID and token ID are required";
const UPDATE_CVC_FIELDS_REQUIRED: &str = "Customer ID, card ID and token are required";
const DEFAULT_CHARGE_DESCRIPTION: &str = "Custom token payment";

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Command to charge a card token directly.
#[derive(Debug, Clone, Default)]
pub struct ChargeTokenCommand {
    pub token_id: Option<String>,
    /// Amount in minor units, as the client computed it.
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub description: Option<String>,
}

pub struct ChargeTokenHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl ChargeTokenHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: ChargeTokenCommand) -> Result<Charge, PaymentsError> {
        let (source, amount, currency) = match (
            present(cmd.token_id),
            cmd.amount.and_then(MinorUnits::try_new),
            present(cmd.currency),
        ) {
            (Some(source), Some(amount), Some(currency)) => (source, amount, currency),
            _ => return Err(PaymentsError::validation(CHARGE_FIELDS_REQUIRED)),
        };

        let charge = self
            .provider
            .create_charge(CreateCharge {
                amount,
                currency: Currency::or_default(Some(&currency)),
                source,
                description: present(cmd.description)
                    .unwrap_or_else(|| DEFAULT_CHARGE_DESCRIPTION.to_string()),
            })
            .await?;

        tracing::info!(charge_id = %charge.id, amount = charge.amount, "Token charged");

        Ok(charge)
    }
}

/// Command to save a card token on a customer as a source.
#[derive(Debug, Clone, Default)]
pub struct AttachTokenCommand {
    pub customer_id: Option<String>,
    pub token_id: Option<String>,
}

pub struct AttachTokenHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl AttachTokenHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: AttachTokenCommand) -> Result<CardSource, PaymentsError> {
        let (customer_id, token_id) = match (present(cmd.customer_id), present(cmd.token_id)) {
            (Some(customer_id), Some(token_id)) => (customer_id, token_id),
            _ => return Err(PaymentsError::validation(ATTACH_FIELDS_REQUIRED)),
        };

        let card = self
            .provider
            .create_customer_source(&customer_id, &token_id)
            .await?;

        tracing::info!(customer_id = %customer_id, card_id = %card.id, "Card attached to customer");

        Ok(card)
    }
}

/// Command to refresh the CVC of a saved card from a CVC update token.
#[derive(Debug, Clone, Default)]
pub struct UpdateCvcTokenCommand {
    pub customer_id: Option<String>,
    pub card_id: Option<String>,
    pub token: Option<String>,
}

pub struct UpdateCvcTokenHandler {
    provider: Arc<dyn PaymentProvider>,
}

impl UpdateCvcTokenHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: UpdateCvcTokenCommand) -> Result<CardSource, PaymentsError> {
        let (customer_id, card_id, token) = match (
            present(cmd.customer_id),
            present(cmd.card_id),
            present(cmd.token),
        ) {
            (Some(customer_id), Some(card_id), Some(token)) => (customer_id, card_id, token),
            _ => return Err(PaymentsError::validation(UPDATE_CVC_FIELDS_REQUIRED)),
        };

        let card = self
            .provider
            .update_customer_source_cvc(&customer_id, &card_id, &token)
            .await?;

        tracing::info!(customer_id = %customer_id, card_id = %card.id, "Card CVC updated");

        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentError;

    // ════════════════════════════════════════════════════════════════════════════
    // Charge Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn charge_uses_minor_units_as_given() {
        let provider = Arc::new(MockPaymentProvider::new());

        let charge = ChargeTokenHandler::new(provider.clone())
            .handle(ChargeTokenCommand {
                token_id: Some("tok_visa".to_string()),
                amount: Some(5000),
                currency: Some("INR".to_string()),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(charge.amount, 5000);
        assert_eq!(charge.extra["description"], DEFAULT_CHARGE_DESCRIPTION);
        assert_eq!(provider.calls()[0].args, vec!["tok_visa", "5000", "inr"]);
    }

    #[tokio::test]
    async fn charge_requires_token_amount_and_currency() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = ChargeTokenHandler::new(provider.clone());

        for cmd in [
            ChargeTokenCommand {
                amount: Some(100),
                currency: Some("usd".to_string()),
                ..Default::default()
            },
            ChargeTokenCommand {
                token_id: Some("tok_visa".to_string()),
                amount: Some(0),
                currency: Some("usd".to_string()),
                ..Default::default()
            },
            ChargeTokenCommand {
                token_id: Some("tok_visa".to_string()),
                amount: Some(100),
                ..Default::default()
            },
        ] {
            let err = handler.handle(cmd).await.unwrap_err();
            assert_eq!(err.message(), CHARGE_FIELDS_REQUIRED);
        }
        assert!(!provider.was_called("create_charge"));
    }

    #[tokio::test]
    async fn charge_decline_is_provider_error() {
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_method_error(
            "create_charge",
            PaymentError::card_declined("Your card has insufficient funds."),
        );

        let err = ChargeTokenHandler::new(provider)
            .handle(ChargeTokenCommand {
                token_id: Some("tok_chargeDeclined".to_string()),
                amount: Some(100),
                currency: Some("usd".to_string()),
                description: Some("Order 7".to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Your card has insufficient funds.");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Source Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn attach_creates_customer_source() {
        let provider = Arc::new(MockPaymentProvider::new());

        let card = AttachTokenHandler::new(provider.clone())
            .handle(AttachTokenCommand {
                customer_id: Some("cus_1".to_string()),
                token_id: Some("tok_visa".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(card.extra["customer"], "cus_1");
        assert_eq!(provider.calls()[0].args, vec!["cus_1", "tok_visa"]);
    }

    #[tokio::test]
    async fn attach_requires_both_ids() {
        let err = AttachTokenHandler::new(Arc::new(MockPaymentProvider::new()))
            .handle(AttachTokenCommand {
                customer_id: Some("cus_1".to_string()),
                token_id: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), ATTACH_FIELDS_REQUIRED);
    }

    #[tokio::test]
    async fn update_cvc_targets_card() {
        let provider = Arc::new(MockPaymentProvider::new());

        let card = UpdateCvcTokenHandler::new(provider.clone())
            .handle(UpdateCvcTokenCommand {
                customer_id: Some("cus_1".to_string()),
                card_id: Some("card_1".to_string()),
                token: Some("cvctok_1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(card.id, "card_1");
        assert_eq!(provider.calls()[0].args, vec!["cus_1", "card_1", "cvctok_1"]);
    }

    #[tokio::test]
    async fn update_cvc_requires_all_fields() {
        let err = UpdateCvcTokenHandler::new(Arc::new(MockPaymentProvider::new()))
            .handle(UpdateCvcTokenCommand {
                customer_id: Some("cus_1".to_string()),
                card_id: Some("card_1".to_string()),
                token: Some(String::new()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.message(), UPDATE_CVC_FIELDS_REQUIRED);
    }
}
