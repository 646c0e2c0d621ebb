//! Unified error handling
//!
//! Application error type and response structure for the HTTP layer:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response envelope
//!
//! Engine-level `CommandError`s are classified into HTTP statuses through
//! their [`ErrorClass`]: validation → 400, state conflict → 409,
//! resource conflict → 409, not found → 404, everything else → 500 with a
//! generic body (details stay in the server log).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::tab::types::{CommandError, ErrorClass};
use tracing::error;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code ("0000" means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business logic errors (4xx) ==========
    #[error("Resource not found: {0}")]
    /// Resource does not exist or is not visible to the tenant (404)
    NotFound(String),

    #[error("Conflict: {0}")]
    /// State or resource conflict - caller holds a stale view (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// Caller-correctable input problem (400)
    Validation(String),

    // ========== System errors (5xx) ==========
    #[error("Storage error: {0}")]
    /// Storage failure (500)
    Storage(String),

    #[error("Internal server error: {0}")]
    /// Unexpected failure (500)
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Storage error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        match err.code.class() {
            ErrorClass::Validation => AppError::Validation(err.message),
            ErrorClass::StateConflict | ErrorClass::ResourceConflict => {
                AppError::Conflict(err.message)
            }
            ErrorClass::NotFound => AppError::NotFound(err.message),
            ErrorClass::Internal => AppError::Internal(err.message),
        }
    }
}

impl From<crate::tabs::storage::StorageError> for AppError {
    fn from(err: crate::tabs::storage::StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}
