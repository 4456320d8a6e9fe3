//! HandleWebhookHandler - Verifies an inbound Stripe webhook and dispatches it.

use std::sync::Arc;

use crate::domain::webhook::{DispatchOutcome, WebhookDispatcher, WebhookError, WebhookVerifier};

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if present.
    pub signature: Option<String>,
}

/// Handler for Stripe webhook deliveries.
///
/// Verification errors are returned to the caller. Everything after
/// verification (including handler failures) is reported through the
/// dispatch outcome and never fails the request.
pub struct HandleWebhookHandler {
    verifier: Arc<WebhookVerifier>,
    dispatcher: WebhookDispatcher,
}

impl HandleWebhookHandler {
    pub fn new(verifier: Arc<WebhookVerifier>, dispatcher: WebhookDispatcher) -> Self {
        Self {
            verifier,
            dispatcher,
        }
    }

    pub async fn handle(&self, cmd: HandleWebhookCommand) -> Result<DispatchOutcome, WebhookError> {
        let event = match self
            .verifier
            .verify(&cmd.payload, cmd.signature.as_deref())
        {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind(), "Webhook rejected");
                return Err(e);
            }
        };

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook verified"
        );

        Ok(self.dispatcher.dispatch(event).await)
    }
}
