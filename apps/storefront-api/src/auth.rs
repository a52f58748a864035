//! # Bearer Authentication
//!
//! Middleware for the protected routes: reads `Authorization: Bearer <jwt>`,
//! validates it and stores the subject in the request extensions.
//!
//! ```text
//! request ──► Authorization header? ──no──► 401
//!                   │
//!                   ▼
//!             "Bearer " prefix? ──no──► 401
//!                   │
//!                   ▼
//!             TokenService::validate ──err──► 401
//!                   │
//!                   ▼
//!             extensions.insert(AuthenticatedUser) ──► handler
//! ```

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;
use storefront_core::AuthError;
use storefront_service::{extract_bearer_token, AUTH_HEADER};

/// The username a valid token was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

impl AuthenticatedUser {
    /// Cart and order routes may only act on the caller's own data.
    pub fn ensure_is(&self, username: &str) -> Result<(), ApiError> {
        if self.username == username {
            return Ok(());
        }
        warn!(
            caller = %self.username,
            target = %username,
            "Rejected request on another user's data"
        );
        Err(ApiError::forbidden(format!(
            "{} may not act on behalf of {username}",
            self.username
        )))
    }
}

pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = authenticate(&state, &request).map_err(|e| {
        warn!(path = %request.uri().path(), reason = %e, "Unauthenticated request");
        ApiError::from(e)
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { username });

    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, request: &Request) -> Result<String, AuthError> {
    let value = request
        .headers()
        .get(AUTH_HEADER)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::Malformed("header is not valid ASCII".to_string()))?;

    let token = extract_bearer_token(value)?;
    state.services.tokens.validate(token)
}
