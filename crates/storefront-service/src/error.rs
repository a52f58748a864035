//! # Service Error Types
//!
//! The single error type every service returns. Lower layer errors are
//! folded into it so handlers only ever match on one enum.
//!
//! ```text
//! CoreError ──┐
//! DbError ────┼──► ServiceError ──► ApiError (status code chosen there)
//! jwt/argon2 ─┘
//! ```

use storefront_core::{AuthError, CoreError, ValidationError};
use storefront_db::DbError;
use thiserror::Error;

/// Errors returned by the storefront services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A user, item or cart the caller referenced does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A unique key is already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(DbError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl ServiceError {
    pub fn not_found(entity: impl Into<String>, key: impl ToString) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    pub fn user_not_found(username: &str) -> Self {
        CoreError::UserNotFound(username.to_string()).into()
    }

    pub fn item_not_found(id: i64) -> Self {
        CoreError::ItemNotFound(id.to_string()).into()
    }

    /// True for failures the client cannot fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ServiceError::Storage(_) | ServiceError::Hashing(_) | ServiceError::Signing(_)
        )
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UserNotFound(key) => ServiceError::not_found("User", key),
            CoreError::ItemNotFound(key) => ServiceError::not_found("Item", key),
            CoreError::Validation(e) => ServiceError::Validation(e),
            CoreError::Auth(e) => ServiceError::Auth(e),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::NotFound { entity, key: id },
            DbError::Rejected(core) => core.into(),
            DbError::UniqueViolation { .. } => ServiceError::Conflict(err.to_string()),
            other => ServiceError::Storage(other),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
