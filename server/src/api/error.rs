//! API Error Types
//!
//! One error taxonomy for protected handlers. Permission and validation
//! errors are translated into structured JSON error bodies at the boundary;
//! internal failures are logged and their details redacted from responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::events::EventError;
use crate::permissions::PermissionError;

/// Handler-facing error taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No identity resolved.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Identity resolved but lacks the required permission.
    #[error("{0}")]
    Forbidden(String),

    /// Operation key not registered; programmer error, fails loudly.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Runtime operation registration hit an existing key.
    #[error("Operation already registered: {0}")]
    DuplicateOperation(String),

    /// Malformed request body.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Entity is in a state the operation does not accept.
    #[error("{0}")]
    InvalidState(String),

    /// Internal server error; underlying message stays in the logs.
    #[error("Internal server error")]
    Internal(String),
}

impl From<PermissionError> for ApiError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::UnknownOperation(key) => Self::UnknownOperation(key),
            other => Self::Forbidden(other.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unknown(key) => Self::UnknownOperation(key),
            CatalogError::Duplicate(key) => Self::DuplicateOperation(key),
            CatalogError::InvalidKey(e) => Self::Validation(e.to_string()),
        }
    }
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::UnknownOperation(key) => Self::UnknownOperation(key),
            EventError::InvalidPattern(p) => Self::Validation(format!("invalid pattern: {p}")),
        }
    }
}

impl From<mb_common::Error> for ApiError {
    fn from(err: mb_common::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            // A missing catalog entry is a server-side wiring bug, not a
            // caller mistake.
            Self::UnknownOperation(key) => {
                tracing::error!(operation = %key, "Permission check on unregistered operation");
                (StatusCode::INTERNAL_SERVER_ERROR, "UNKNOWN_OPERATION")
            }
            Self::DuplicateOperation(_) => (StatusCode::CONFLICT, "OPERATION_EXISTS"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidState(_) => (StatusCode::CONFLICT, "INVALID_STATE"),
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            // Redact internals from the response body.
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}
