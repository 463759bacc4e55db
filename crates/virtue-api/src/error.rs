//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps errors from `virtue-core` and `virtue-state` to HTTP status codes
//! and the `{success: false, error, code}` envelope. Internal details are
//! logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use virtue_core::ValidationError;
use virtue_state::{AccountError, StoreError, SubmissionError, VerificationError};

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code (e.g. `NOT_FOUND`, `INVALID_STATE`).
    pub code: String,
}

/// Application-level error type.
///
/// The `Display` text of client errors is returned verbatim as the
/// envelope's `error` field.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Request input failed validation (400).
    #[error("{0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("{0}")]
    BadRequest(String),

    /// The target is not in a state that allows the operation (400).
    #[error("{0}")]
    InvalidState(String),

    /// Missing or invalid admin token (401).
    #[error("{0}")]
    Unauthorized(String),

    /// The operation took effect but a follow-up step did not (409).
    #[error("{0}")]
    PartialFailure(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::PartialFailure(_) => (StatusCode::CONFLICT, "PARTIAL_FAILURE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            Self::PartialFailure(_) => {
                tracing::warn!(error = %self, "partial failure");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            success: false,
            error: message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => Self::Validation(err.to_string()),
            StoreError::DuplicateId(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(e) => e.into(),
            AccountError::Store(e) => e.into(),
            AccountError::UnknownAccount | AccountError::ProfileNotFound => {
                Self::NotFound(err.to_string())
            }
            AccountError::WrongPassword => Self::Validation(err.to_string()),
            AccountError::Hashing(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(e) => e.into(),
            SubmissionError::UnknownUser(_) => Self::NotFound(err.to_string()),
            SubmissionError::Store(e) => e.into(),
        }
    }
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::NotFound(_) => Self::NotFound(err.to_string()),
            VerificationError::InvalidState { .. } => Self::InvalidState(err.to_string()),
            VerificationError::InvalidArgument(e) => e.into(),
            VerificationError::PartialFailure { .. } => Self::PartialFailure(err.to_string()),
        }
    }
}
