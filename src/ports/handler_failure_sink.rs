//! HandlerFailureSink port - Where failed webhook handlers are reported.
//!
//! Handler failures never reach the caller: the webhook is acknowledged
//! regardless. A sink is the single place those failures become observable,
//! whether that is a log line, a metric, or a durable retry queue.

use async_trait::async_trait;

use crate::domain::webhook::{EventKind, WebhookError};

/// A handler that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    /// Stripe event id (evt_xxx).
    pub event_id: String,
    /// Kind of the event whose handler failed.
    pub kind: EventKind,
    /// Error text or panic message.
    pub reason: String,
    /// Whether the handler panicked rather than returning an error.
    pub panicked: bool,
}

impl HandlerFailure {
    /// The failure expressed in the webhook error taxonomy.
    pub fn to_error(&self) -> WebhookError {
        WebhookError::HandlerFailed {
            event_type: self.kind.as_str().to_string(),
            reason: self.reason.clone(),
        }
    }
}

/// Port for recording handler failures.
///
/// Implementations must not fail; a sink that cannot record should log
/// and move on.
#[async_trait]
pub trait HandlerFailureSink: Send + Sync {
    async fn record(&self, failure: HandlerFailure);
}
