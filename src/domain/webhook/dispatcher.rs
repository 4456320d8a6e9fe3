//! Webhook dispatcher - Routes verified events to their handler.
//!
//! Handlers are registered once at startup, keyed by [`EventKind`]. Each
//! dispatch runs exactly one handler (or none for unrecognized types).
//! Handler errors and panics are captured and reported to a
//! [`HandlerFailureSink`]; they never reach the caller.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{DispatchMode, WebhookConfig};
use crate::ports::{HandlerFailure, HandlerFailureSink};

use super::errors::HandlerError;
use super::event::{EventKind, WebhookEvent};

/// Handler for a specific type of Stripe webhook event.
///
/// Implementations should be stateless and focus on a single event type.
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    /// The event kind this handler processes.
    fn kind(&self) -> EventKind;

    /// Performs the side effect for a verified event.
    async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError>;
}

/// Mapping from event kind to handler.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Arc<dyn WebhookEventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its own kind, replacing any previous one.
    pub fn register(mut self, handler: Arc<dyn WebhookEventHandler>) -> Self {
        self.handlers.insert(handler.kind(), handler);
        self
    }

    pub fn get(&self, kind: EventKind) -> Option<Arc<dyn WebhookEventHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// What happened to a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion before dispatch returned.
    Handled(EventKind),
    /// The handler was spawned and may still be running.
    Scheduled(EventKind),
    /// The handler failed; the failure has been recorded.
    HandlerFailed { kind: EventKind, reason: String },
    /// No handler is registered for this type. Not an error.
    Unhandled(String),
}

/// Routes verified events to registered handlers.
#[derive(Clone)]
pub struct WebhookDispatcher {
    registry: Arc<HandlerRegistry>,
    failures: Arc<dyn HandlerFailureSink>,
    mode: DispatchMode,
    /// Upper bound on an awaited handler. Unused in `Background` mode.
    handler_timeout: Option<Duration>,
}

impl WebhookDispatcher {
    pub fn new(
        registry: HandlerRegistry,
        failures: Arc<dyn HandlerFailureSink>,
        mode: DispatchMode,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            failures,
            mode,
            handler_timeout: None,
        }
    }

    /// Dispatcher for the configured mode.
    ///
    /// Inline handlers get four fifths of the request timeout, so the
    /// acknowledgment always goes out before the timeout layer answers 408.
    pub fn from_config(
        registry: HandlerRegistry,
        failures: Arc<dyn HandlerFailureSink>,
        webhook: &WebhookConfig,
        request_timeout: Duration,
    ) -> Self {
        Self::new(registry, failures, webhook.dispatch_mode)
            .with_handler_timeout(request_timeout * 4 / 5)
    }

    /// Bounds how long an inline dispatch waits for its handler.
    ///
    /// A handler that overruns is recorded as failed and left running.
    pub fn with_handler_timeout(mut self, limit: Duration) -> Self {
        self.handler_timeout = Some(limit);
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Dispatches an event to its handler.
    ///
    /// In `Background` mode the handler is spawned and this returns
    /// immediately with `Scheduled`. In `Inline` mode the handler is awaited.
    /// Either way the handler runs on its own task so a panic is contained.
    pub async fn dispatch(&self, event: WebhookEvent) -> DispatchOutcome {
        let Some(kind) = event.kind() else {
            tracing::info!(
                event_id = %event.id,
                event_type = %event.event_type,
                "Unhandled event type"
            );
            return DispatchOutcome::Unhandled(event.event_type);
        };

        let Some(handler) = self.registry.get(kind) else {
            tracing::info!(
                event_id = %event.id,
                event_type = %kind,
                "No handler registered for event type"
            );
            return DispatchOutcome::Unhandled(event.event_type);
        };

        tracing::debug!(event_id = %event.id, event_type = %kind, "Dispatching webhook event");

        let failures = Arc::clone(&self.failures);
        match self.mode {
            DispatchMode::Background => {
                tokio::spawn(run_supervised(handler, event, failures, None));
                DispatchOutcome::Scheduled(kind)
            }
            DispatchMode::Inline => {
                let limit = self.handler_timeout;
                match run_supervised(handler, event, failures, limit).await {
                    None => DispatchOutcome::Handled(kind),
                    Some(reason) => DispatchOutcome::HandlerFailed { kind, reason },
                }
            }
        }
    }
}

/// Runs the handler on its own task and records any failure.
///
/// Returns the failure reason, if any.
async fn run_supervised(
    handler: Arc<dyn WebhookEventHandler>,
    event: WebhookEvent,
    failures: Arc<dyn HandlerFailureSink>,
    limit: Option<Duration>,
) -> Option<String> {
    let kind = handler.kind();
    let event = Arc::new(event);

    let task = {
        let event = Arc::clone(&event);
        tokio::spawn(async move { handler.handle(&event).await })
    };

    let joined = match limit {
        Some(limit) => tokio::time::timeout(limit, task).await.ok(),
        None => Some(task.await),
    };

    let (reason, panicked) = match joined {
        Some(Ok(Ok(()))) => return None,
        Some(Ok(Err(e))) => (e.to_string(), false),
        Some(Err(e)) if e.is_panic() => (panic_message(e.into_panic()), true),
        Some(Err(e)) => (e.to_string(), false),
        None => (
            format!(
                "handler did not finish within {}ms",
                limit.unwrap_or_default().as_millis()
            ),
            false,
        ),
    };

    failures
        .record(HandlerFailure {
            event_id: event.id.clone(),
            kind,
            reason: reason.clone(),
            panicked,
        })
        .await;

    Some(reason)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("handler panicked: {}", s)
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::event::WebhookEventBuilder;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    // ══════════════════════════════════════════════════════════════
    // Test Infrastructure
    // ══════════════════════════════════════════════════════════════

    #[derive(Clone, Copy)]
    enum Behaviour {
        Succeed,
        Fail,
        Panic,
        Stall,
    }

    /// Mock handler that tracks invocations.
    struct MockHandler {
        kind: EventKind,
        behaviour: Behaviour,
        call_count: AtomicU32,
        seen: Mutex<Vec<serde_json::Value>>,
    }

    impl MockHandler {
        fn new(kind: EventKind, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                kind,
                behaviour,
                call_count: AtomicU32::new(0),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WebhookEventHandler for MockHandler {
        fn kind(&self) -> EventKind {
            self.kind
        }

        async fn handle(&self, event: &WebhookEvent) -> Result<(), HandlerError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(event.payload().clone());
            match self.behaviour {
                Behaviour::Succeed => Ok(()),
                Behaviour::Fail => Err(HandlerError::side_effect("downstream unavailable")),
                Behaviour::Panic => panic!("handler exploded"),
                Behaviour::Stall => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(())
                }
            }
        }
    }

    /// Sink that forwards failures to a channel.
    struct ChannelSink(mpsc::UnboundedSender<HandlerFailure>);

    #[async_trait]
    impl HandlerFailureSink for ChannelSink {
        async fn record(&self, failure: HandlerFailure) {
            let _ = self.0.send(failure);
        }
    }

    fn dispatcher_with(
        handler: Arc<MockHandler>,
        mode: DispatchMode,
    ) -> (WebhookDispatcher, mpsc::UnboundedReceiver<HandlerFailure>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let registry = HandlerRegistry::new().register(handler);
        (
            WebhookDispatcher::new(registry, Arc::new(ChannelSink(tx)), mode),
            rx,
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Registry Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn registry_keys_handlers_by_kind() {
        let handler = MockHandler::new(EventKind::InvoicePaymentFailed, Behaviour::Succeed);
        let registry = HandlerRegistry::new().register(handler);

        assert_eq!(registry.len(), 1);
        assert!(registry.get(EventKind::InvoicePaymentFailed).is_some());
        assert!(registry.get(EventKind::InvoicePaymentSucceeded).is_none());
    }

    #[test]
    fn registering_same_kind_replaces_handler() {
        let registry = HandlerRegistry::new()
            .register(MockHandler::new(EventKind::SetupIntentSucceeded, Behaviour::Succeed))
            .register(MockHandler::new(EventKind::SetupIntentSucceeded, Behaviour::Fail));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry() {
        assert!(HandlerRegistry::new().is_empty());
    }

    // ══════════════════════════════════════════════════════════════
    // Inline Dispatch Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn inline_dispatch_runs_matching_handler_once_with_payload() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Succeed);
        let (dispatcher, mut failures) = dispatcher_with(handler.clone(), DispatchMode::Inline);
        let payload = serde_json::json!({"id": "pi_1", "amount": 500, "metadata": {}});
        let event = WebhookEventBuilder::new().object(payload.clone()).build();

        let outcome = dispatcher.dispatch(event).await;

        assert_eq!(outcome, DispatchOutcome::Handled(EventKind::PaymentIntentSucceeded));
        assert_eq!(handler.calls(), 1);
        assert_eq!(handler.seen.lock().unwrap()[0], payload);
        assert!(failures.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_type_runs_no_handler() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Succeed);
        let (dispatcher, _failures) = dispatcher_with(handler.clone(), DispatchMode::Inline);
        let event = WebhookEventBuilder::new().event_type("foo.bar").build();

        let outcome = dispatcher.dispatch(event).await;

        assert_eq!(outcome, DispatchOutcome::Unhandled("foo.bar".to_string()));
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn recognized_type_without_registered_handler_is_unhandled() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Succeed);
        let (dispatcher, _failures) = dispatcher_with(handler.clone(), DispatchMode::Inline);
        let event = WebhookEventBuilder::new()
            .event_type("invoice.payment_failed")
            .build();

        let outcome = dispatcher.dispatch(event).await;

        assert_eq!(
            outcome,
            DispatchOutcome::Unhandled("invoice.payment_failed".to_string())
        );
        assert_eq!(handler.calls(), 0);
    }

    #[tokio::test]
    async fn inline_handler_error_is_recorded() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Fail);
        let (dispatcher, mut failures) = dispatcher_with(handler, DispatchMode::Inline);
        let event = WebhookEventBuilder::new().id("evt_fail").build();

        let outcome = dispatcher.dispatch(event).await;

        assert!(matches!(outcome, DispatchOutcome::HandlerFailed { .. }));
        let failure = failures.try_recv().unwrap();
        assert_eq!(failure.event_id, "evt_fail");
        assert_eq!(failure.kind, EventKind::PaymentIntentSucceeded);
        assert_eq!(failure.reason, "downstream unavailable");
        assert!(!failure.panicked);
    }

    #[tokio::test]
    async fn inline_handler_panic_is_contained_and_recorded() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Panic);
        let (dispatcher, mut failures) = dispatcher_with(handler, DispatchMode::Inline);

        let outcome = dispatcher.dispatch(WebhookEventBuilder::new().build()).await;

        assert!(matches!(outcome, DispatchOutcome::HandlerFailed { .. }));
        let failure = failures.try_recv().unwrap();
        assert!(failure.panicked);
        assert!(failure.reason.contains("handler exploded"));
    }

    #[tokio::test]
    async fn inline_handler_overrunning_its_limit_is_recorded() {
        let handler = MockHandler::new(EventKind::InvoicePaymentSucceeded, Behaviour::Stall);
        let (dispatcher, mut failures) = dispatcher_with(handler.clone(), DispatchMode::Inline);
        let dispatcher = dispatcher.with_handler_timeout(Duration::from_millis(50));
        let event = WebhookEventBuilder::new()
            .id("evt_slow")
            .event_type("invoice.payment_succeeded")
            .build();

        let outcome = tokio::time::timeout(Duration::from_secs(5), dispatcher.dispatch(event))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::HandlerFailed {
                kind: EventKind::InvoicePaymentSucceeded,
                reason: "handler did not finish within 50ms".to_string(),
            }
        );
        let failure = failures.try_recv().unwrap();
        assert_eq!(failure.event_id, "evt_slow");
        assert!(!failure.panicked);
        assert_eq!(handler.calls(), 1);
    }

    #[test]
    fn from_config_bounds_inline_handlers_below_request_timeout() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let webhook = WebhookConfig {
            dispatch_mode: DispatchMode::Inline,
            ..Default::default()
        };

        let dispatcher = WebhookDispatcher::from_config(
            HandlerRegistry::new(),
            Arc::new(ChannelSink(tx)),
            &webhook,
            Duration::from_secs(30),
        );

        assert_eq!(dispatcher.mode(), DispatchMode::Inline);
        assert_eq!(dispatcher.handler_timeout, Some(Duration::from_secs(24)));
    }

    // ══════════════════════════════════════════════════════════════
    // Background Dispatch Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn background_dispatch_schedules_handler() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Succeed);
        let (dispatcher, _failures) = dispatcher_with(handler.clone(), DispatchMode::Background);

        let outcome = dispatcher.dispatch(WebhookEventBuilder::new().build()).await;
        assert_eq!(outcome, DispatchOutcome::Scheduled(EventKind::PaymentIntentSucceeded));

        for _ in 0..100 {
            if handler.calls() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(handler.calls(), 1);
    }

    #[tokio::test]
    async fn background_failure_reaches_sink() {
        let handler = MockHandler::new(EventKind::PaymentIntentSucceeded, Behaviour::Panic);
        let (dispatcher, mut failures) = dispatcher_with(handler, DispatchMode::Background);

        let outcome = dispatcher.dispatch(WebhookEventBuilder::new().build()).await;
        assert!(matches!(outcome, DispatchOutcome::Scheduled(_)));

        let failure = tokio::time::timeout(Duration::from_secs(2), failures.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(failure.panicked);
    }

    #[test]
    fn panic_message_handles_common_payloads() {
        assert_eq!(
            panic_message(Box::new("static")),
            "handler panicked: static"
        );
        assert_eq!(
            panic_message(Box::new(String::from("owned"))),
            "handler panicked: owned"
        );
        assert_eq!(panic_message(Box::new(42u8)), "handler panicked");
    }
}
