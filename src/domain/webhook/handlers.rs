//! Log-only handlers for the recognized event kinds.
//!
//! Each handler decodes the fields it cares about and records them. A
//! payload missing those fields is a handler failure.

use std::sync::Arc;

use async_trait::async_trait;

use super::dispatcher::{HandlerRegistry, WebhookEventHandler};
use super::errors::HandlerError;
use super::event::{EventKind, WebhookEvent};
use super::objects::{InvoiceObject, PaymentIntentObject, SetupIntentObject, SubscriptionObject};

/// `payment_intent.succeeded`
pub struct PaymentSucceededHandler;

#[async_trait]
impl WebhookEventHandler for PaymentSucceededHandler {
    fn kind(&self) -> EventKind {
        EventKind::PaymentIntentSucceeded
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let intent: PaymentIntentObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            payment_intent_id = %intent.id,
            amount = ?intent.amount,
            customer_email = ?intent.customer_email(),
            order_id = ?intent.order_id(),
            "Payment succeeded"
        );
        Ok(())
    }
}

/// `payment_intent.payment_failed`
pub struct PaymentFailedHandler;

#[async_trait]
impl WebhookEventHandler for PaymentFailedHandler {
    fn kind(&self) -> EventKind {
        EventKind::PaymentIntentPaymentFailed
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let intent: PaymentIntentObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            payment_intent_id = %intent.id,
            last_payment_error = ?intent.last_error_message(),
            "Payment failed"
        );
        Ok(())
    }
}

/// `setup_intent.succeeded`
pub struct SetupSucceededHandler;

#[async_trait]
impl WebhookEventHandler for SetupSucceededHandler {
    fn kind(&self) -> EventKind {
        EventKind::SetupIntentSucceeded
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let intent: SetupIntentObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            setup_intent_id = %intent.id,
            customer = ?intent.customer,
            payment_method = ?intent.payment_method,
            usage = ?intent.usage,
            "Setup intent succeeded, payment method saved"
        );
        Ok(())
    }
}

/// `setup_intent.setup_failed`
pub struct SetupFailedHandler;

#[async_trait]
impl WebhookEventHandler for SetupFailedHandler {
    fn kind(&self) -> EventKind {
        EventKind::SetupIntentSetupFailed
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let intent: SetupIntentObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            setup_intent_id = %intent.id,
            last_setup_error = ?intent.last_error_message(),
            "Setup intent failed"
        );
        Ok(())
    }
}

/// `invoice.payment_succeeded`
pub struct InvoicePaidHandler;

#[async_trait]
impl WebhookEventHandler for InvoicePaidHandler {
    fn kind(&self) -> EventKind {
        EventKind::InvoicePaymentSucceeded
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let invoice: InvoiceObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            invoice_id = %invoice.id,
            subscription = ?invoice.subscription,
            amount_paid = ?invoice.amount_paid,
            "Invoice payment succeeded"
        );
        Ok(())
    }
}

/// `invoice.payment_failed`
pub struct InvoiceFailedHandler;

#[async_trait]
impl WebhookEventHandler for InvoiceFailedHandler {
    fn kind(&self) -> EventKind {
        EventKind::InvoicePaymentFailed
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let invoice: InvoiceObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            invoice_id = %invoice.id,
            subscription = ?invoice.subscription,
            amount_due = ?invoice.amount_due,
            "Invoice payment failed"
        );
        Ok(())
    }
}

/// `customer.subscription.deleted`
pub struct SubscriptionCancelledHandler;

#[async_trait]
impl WebhookEventHandler for SubscriptionCancelledHandler {
    fn kind(&self) -> EventKind {
        EventKind::CustomerSubscriptionDeleted
    }

    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
        let subscription: SubscriptionObject = event.deserialize_object()?;
        tracing::info!(
            event_id = %event.id,
            subscription_id = %subscription.id,
            customer = ?subscription.customer,
            ended_at = ?subscription.ended_at,
            "Subscription cancelled"
        );
        Ok(())
    }
}

/// Registry with a log-only handler for every recognized kind.
pub fn default_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .register(Arc::new(PaymentSucceededHandler))
        .register(Arc::new(PaymentFailedHandler))
        .register(Arc::new(SetupSucceededHandler))
        .register(Arc::new(SetupFailedHandler))
        .register(Arc::new(InvoicePaidHandler))
        .register(Arc::new(InvoiceFailedHandler))
        .register(Arc::new(SubscriptionCancelledHandler))
}
