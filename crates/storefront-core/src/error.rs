//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - NotFound / Validation / Auth taxonomy          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── AuthError        - Bearer token and credential failures           │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  storefront-service errors                                             │
//! │  └── ServiceError     - What a service call returns                    │
//! │                                                                         │
//! │  storefront-api errors                                                 │
//! │  └── ApiError         - What the HTTP client sees (status + JSON)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every failure a service can report to its caller falls in one of three
/// families: something is absent, the input was rejected, or the caller could
/// not be authenticated.
#[derive(Debug, Error)]
pub enum CoreError {
    /// User cannot be found by username or id.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Catalog item cannot be found.
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication error (wraps AuthError).
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything is persisted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., whitespace inside a username).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Password and its confirmation differ.
    #[error("password and confirmation do not match")]
    PasswordMismatch,

    /// Another account already owns this username.
    #[error("username '{username}' already exists")]
    UsernameTaken { username: String },

    /// Quantity outside the accepted range.
    #[error("quantity {quantity} is invalid (must be between 1 and {max})")]
    InvalidQuantity { quantity: i64, max: i64 },

    /// The cart would hold more units than allowed.
    #[error("cart cannot hold more than {max} items")]
    CartFull { max: usize },

    /// The cart total would not fit in the cents range.
    #[error("cart total is out of range")]
    TotalOutOfRange,
}

// =============================================================================
// Auth Error
// =============================================================================

/// Authentication failures.
///
/// ## When This Occurs
/// ```text
/// Authorization: Bearer <token>
///      │
///      ├── header absent / no "Bearer " prefix ──► MissingCredentials
///      ├── token not decodable ─────────────────► Malformed
///      ├── HMAC does not verify ────────────────► InvalidSignature
///      ├── now >= exp ──────────────────────────► Expired
///      └── OK ──► subject (username)
///
/// POST /login with wrong username or password ──► BadCredentials
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credentials")]
    MissingCredentials,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("invalid username or password")]
    BadCredentials,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
