//! API error type that converts application errors to HTTP responses.
//!
//! Routes disagree on the shape of their error bodies, so each handler picks
//! an [`ErrorStyle`] and the same [`PaymentsError`] renders accordingly.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::payments::PaymentsError;

/// Error body layout used by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStyle {
    /// Provider failures: `{error: <context>, message}`. Validation: `{error}`.
    Described(&'static str),
    /// `{error}` for every failure.
    Bare,
    /// `{success: false, error}` for every failure.
    Flagged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Described { error: String, message: String },
    Flagged { success: bool, error: String },
    Bare { error: String },
}

/// An error response: status plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// Renders an application error in the given style.
    pub fn new(err: PaymentsError, style: ErrorStyle) -> Self {
        match err {
            PaymentsError::Validation(message) => Self::invalid(message, style),
            PaymentsError::Provider(provider) => {
                tracing::error!(
                    code = %provider.code,
                    provider_code = ?provider.provider_code,
                    error = %provider.message,
                    "Provider call failed"
                );
                let body = match style {
                    ErrorStyle::Described(context) => ErrorBody::Described {
                        error: context.to_string(),
                        message: provider.message,
                    },
                    ErrorStyle::Bare => ErrorBody::Bare {
                        error: provider.message,
                    },
                    ErrorStyle::Flagged => ErrorBody::Flagged {
                        success: false,
                        error: provider.message,
                    },
                };
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body,
                }
            }
        }
    }

    /// A request body that could not be decoded as JSON of the expected shape.
    pub fn rejected(rejection: JsonRejection, style: ErrorStyle) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        Self::invalid(format!("Invalid request body: {}", rejection.body_text()), style)
    }

    fn invalid(message: String, style: ErrorStyle) -> Self {
        let body = match style {
            ErrorStyle::Flagged => ErrorBody::Flagged {
                success: false,
                error: message,
            },
            ErrorStyle::Described(_) | ErrorStyle::Bare => ErrorBody::Bare { error: message },
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            body,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
