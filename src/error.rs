//! Application error type and its HTTP representation.
//!
//! Every failure is surfaced synchronously to the caller of the originating
//! request; nothing in the service retries on its own.
//!
//! # Response Body
//!
//! ```json
//! {
//!   "error": {
//!     "code": "not_ready",
//!     "message": "Id allocator is not ready, try again later",
//!     "details": {}
//!   }
//! }
//! ```

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::id_allocator::AllocatorError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by services and handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or empty required input.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The short code does not resolve to a record.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The id allocator has not been seeded from the store yet.
    #[error("{message}")]
    NotReady { message: String, details: Value },

    /// A unique constraint rejected the write.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Store or infrastructure failure.
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn not_ready(message: impl Into<String>, details: Value) -> Self {
        Self::NotReady {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    ///
    /// An unresolvable short code is reported as `400`, matching the redirect
    /// endpoint's contract.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::BAD_REQUEST,
            AppError::NotReady { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::NotReady { message, details } => ("not_ready", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request parameters", details)
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::bad_request("Invalid query string", json!({ "reason": e.body_text() }))
    }
}

impl From<AllocatorError> for AppError {
    fn from(e: AllocatorError) -> Self {
        match e {
            AllocatorError::NotReady => AppError::not_ready(
                "Id allocator is not ready, try again later",
                json!({}),
            ),
            AllocatorError::Exhausted => {
                AppError::internal("Id space exhausted", json!({ "reason": e.to_string() }))
            }
        }
    }
}
