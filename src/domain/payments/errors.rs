//! Errors for the facade operations.

use thiserror::Error;

use crate::ports::PaymentError;

/// Failure of a facade operation.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// The request was missing or had invalid fields. Never reaches the provider.
    #[error("{0}")]
    Validation(String),

    /// The provider rejected or failed the call.
    #[error(transparent)]
    Provider(#[from] PaymentError),
}

impl PaymentsError {
    pub fn validation(message: impl Into<String>) -> Self {
        PaymentsError::Validation(message.into())
    }

    /// Message suitable for the response body.
    pub fn message(&self) -> &str {
        match self {
            PaymentsError::Validation(message) => message,
            PaymentsError::Provider(err) => &err.message,
        }
    }
}

/// Returns the value if present and non-empty, otherwise a validation error.
pub fn require(value: Option<String>, message: &str) -> Result<String, PaymentsError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PaymentsError::validation(message))
}
