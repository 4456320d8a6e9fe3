//! Reports webhook handler failures as error-level log events.

use async_trait::async_trait;

use crate::ports::{HandlerFailure, HandlerFailureSink};

/// Default sink: one `error!` per failed handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureSink;

impl TracingFailureSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HandlerFailureSink for TracingFailureSink {
    async fn record(&self, failure: HandlerFailure) {
        tracing::error!(
            event_id = %failure.event_id,
            event_type = %failure.kind,
            panicked = failure.panicked,
            error = %failure.to_error(),
            "Webhook handler failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::EventKind;
    use std::sync::Arc;

    #[tokio::test]
    async fn records_without_panicking() {
        let sink: Arc<dyn HandlerFailureSink> = Arc::new(TracingFailureSink::new());

        sink.record(HandlerFailure {
            event_id: "evt_1".to_string(),
            kind: EventKind::PaymentIntentSucceeded,
            reason: "boom".to_string(),
            panicked: true,
        })
        .await;
    }
}
