//! # API Error Type
//!
//! Unified error type for HTTP handlers, and the only place a status code is
//! chosen.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  handler ──► Result<Json<T>, ApiError>                                  │
//! │                     │                                                   │
//! │   ServiceError::NotFound ───────────────► 404 NOT_FOUND                 │
//! │   ServiceError::Validation ─────────────► 400 VALIDATION_ERROR          │
//! │   ValidationError::UsernameTaken ───────► 409 CONFLICT                  │
//! │   ServiceError::Conflict ───────────────► 409 CONFLICT                  │
//! │   ServiceError::Auth / AuthError ───────► 401 UNAUTHORIZED              │
//! │   token subject ≠ path user ────────────► 403 FORBIDDEN                 │
//! │   Storage / Hashing / Signing ──────────► 500 INTERNAL (logged)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Body
//! ```json
//! { "code": "NOT_FOUND", "message": "User not found: bob" }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use storefront_core::{AuthError, ValidationError};
use storefront_service::ServiceError;

/// Error body returned by every failing request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Duplicate or concurrently modified resource (409)
    Conflict,

    /// Missing, malformed, forged or expired credentials (401)
    Unauthorized,

    /// Authenticated, but acting on another user's data (403)
    Forbidden,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::unauthorized(err.to_string())
    }
}

/// Converts service errors to API errors.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_internal() {
            // Log the actual error but return a generic message
            error!(error = %err, "Request failed with internal error");
            return ApiError::internal("Internal server error");
        }

        match err {
            ServiceError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            ServiceError::Validation(ref e @ ValidationError::UsernameTaken { .. }) => {
                ApiError::new(ErrorCode::Conflict, e.to_string())
            }
            ServiceError::Validation(e) => ApiError::new(ErrorCode::ValidationError, e.to_string()),
            ServiceError::Auth(e) => e.into(),
            ServiceError::Conflict(message) => ApiError::new(ErrorCode::Conflict, message),
            ServiceError::Storage(_) | ServiceError::Hashing(_) | ServiceError::Signing(_) => {
                ApiError::internal("Internal server error")
            }
        }
    }
}
