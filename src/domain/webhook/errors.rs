//! Webhook error types for Stripe webhook handling.
//!
//! Defines every way an inbound webhook can fail, grouped into the three
//! outcomes the endpoint distinguishes, with HTTP status code mapping.

use http::StatusCode;
use thiserror::Error;

/// Errors that occur while verifying or handling a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request carried no signature header.
    #[error("Missing Stripe-Signature header")]
    MissingSignature,

    /// The signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),

    /// None of the supplied signatures matched the payload.
    #[error("No signatures found matching the expected signature for payload")]
    SignatureMismatch,

    /// The signed timestamp is older than the tolerance window.
    #[error("Timestamp outside the tolerance window ({age_secs}s old)")]
    TimestampOutOfRange { age_secs: i64 },

    /// The signed timestamp is further in the future than clock skew allows.
    #[error("Timestamp is {ahead_secs}s in the future")]
    TimestampInFuture { ahead_secs: i64 },

    /// The signature was valid but the payload is not a Stripe event.
    #[error("Malformed event payload: {0}")]
    MalformedEvent(String),

    /// A dispatched handler failed. Never surfaced to the caller.
    #[error("Handler for {event_type} failed: {reason}")]
    HandlerFailed { event_type: String, reason: String },
}

/// Outcome classes for webhook failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookErrorKind {
    /// Authenticity could not be established.
    Unauthorized,
    /// Authentic, but not decodable.
    MalformedEvent,
    /// Authentic and decoded; the side effect failed.
    HandlerFailure,
}

impl WebhookError {
    /// Classifies this error into one of the endpoint's outcomes.
    pub fn kind(&self) -> WebhookErrorKind {
        match self {
            WebhookError::MissingSignature
            | WebhookError::MalformedSignature(_)
            | WebhookError::SignatureMismatch
            | WebhookError::TimestampOutOfRange { .. }
            | WebhookError::TimestampInFuture { .. } => WebhookErrorKind::Unauthorized,
            WebhookError::MalformedEvent(_) => WebhookErrorKind::MalformedEvent,
            WebhookError::HandlerFailed { .. } => WebhookErrorKind::HandlerFailure,
        }
    }

    /// Maps the error to an HTTP status code.
    ///
    /// Stripe redelivers on any non-2xx response, so handler failures are
    /// acknowledged with 200 while rejected requests get 400.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            WebhookErrorKind::Unauthorized | WebhookErrorKind::MalformedEvent => {
                StatusCode::BAD_REQUEST
            }
            WebhookErrorKind::HandlerFailure => StatusCode::OK,
        }
    }

    /// Diagnostic safe to return to the caller.
    ///
    /// Verification details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self.kind() {
            WebhookErrorKind::Unauthorized => "signature verification failed",
            WebhookErrorKind::MalformedEvent => "malformed event payload",
            WebhookErrorKind::HandlerFailure => "handler failed",
        }
    }
}

/// Error returned by an individual event handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The payload lacked the fields the handler needs.
    #[error("Unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The handler's side effect failed.
    #[error("{0}")]
    SideEffect(String),
}

impl HandlerError {
    pub fn side_effect(message: impl Into<String>) -> Self {
        HandlerError::SideEffect(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Classification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verification_failures_are_unauthorized() {
        let errors = [
            WebhookError::MissingSignature,
            WebhookError::MalformedSignature("missing timestamp".to_string()),
            WebhookError::SignatureMismatch,
            WebhookError::TimestampOutOfRange { age_secs: 301 },
            WebhookError::TimestampInFuture { ahead_secs: 120 },
        ];

        for err in errors {
            assert_eq!(err.kind(), WebhookErrorKind::Unauthorized, "{}", err);
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn malformed_event_is_bad_request() {
        let err = WebhookError::MalformedEvent("expected value".to_string());
        assert_eq!(err.kind(), WebhookErrorKind::MalformedEvent);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn handler_failure_is_acknowledged() {
        let err = WebhookError::HandlerFailed {
            event_type: "invoice.payment_failed".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.kind(), WebhookErrorKind::HandlerFailure);
        assert_eq!(err.status_code(), StatusCode::OK);
    }

    // ══════════════════════════════════════════════════════════════
    // Message Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn public_message_hides_verification_details() {
        let err = WebhookError::TimestampOutOfRange { age_secs: 999 };
        assert_eq!(err.public_message(), "signature verification failed");
        assert!(!err.public_message().contains("999"));
    }

    #[test]
    fn display_includes_detail_for_logs() {
        let err = WebhookError::TimestampOutOfRange { age_secs: 301 };
        assert_eq!(
            err.to_string(),
            "Timestamp outside the tolerance window (301s old)"
        );
    }

    #[test]
    fn handler_error_wraps_serde_errors() {
        let serde_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err: HandlerError = serde_err.into();
        assert!(err.to_string().starts_with("Unexpected payload"));
    }
}
