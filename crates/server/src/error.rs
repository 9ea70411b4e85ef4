//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Error bodies are JSON `{"error": message}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use commerce_fields_core::FieldValueError;
use serde_json::json;
use thiserror::Error;

use crate::magento::MagentoError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Magento API operation failed and the service does not fail open.
    #[error("Magento error: {0}")]
    Magento(#[from] MagentoError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<FieldValueError> for AppError {
    fn from(err: FieldValueError) -> Self {
        match err {
            FieldValueError::UnknownKind(_) => Self::NotFound(err.to_string()),
            FieldValueError::InvalidJson { .. } | FieldValueError::InvalidShape { .. } => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Magento(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Magento(_) = self {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Upstream messages are passed through so the widget can show them
        let message = match self {
            Self::Magento(err) => err.to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
