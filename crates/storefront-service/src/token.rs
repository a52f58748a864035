//! # Token Service
//!
//! Stateless bearer tokens: HS256 JWTs carrying the username as subject.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  issue("dave") @ t0                                                     │
//! │       │   { sub: "dave", iat: t0, exp: t0 + validity, jti: uuid }      │
//! │       ▼                                                                 │
//! │  "Authorization: Bearer eyJhbGciOi..."                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate(token) @ now                                                  │
//! │       ├── bad HMAC ──────────► AuthError::InvalidSignature              │
//! │       ├── undecodable ───────► AuthError::Malformed                     │
//! │       ├── now >= exp ────────► AuthError::Expired                       │
//! │       └── ok ────────────────► "dave"                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is stored server side, so there is no revocation: a token is
//! good until `exp`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use storefront_core::AuthError;

/// Scheme prefix of the `Authorization` header value.
pub const TOKEN_PREFIX: &str = "Bearer ";

/// Header carrying the bearer token.
pub const AUTH_HEADER: &str = "Authorization";

/// Default token lifetime in seconds (about 5.8 days).
pub const DEFAULT_TOKEN_VALIDITY_SECS: i64 = 500_000;

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Absolute expiry (unix seconds).
    pub exp: i64,
    /// Random token id.
    pub jti: String,
}

/// A freshly signed token and when it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_secs: i64,
}

impl IssuedToken {
    /// `Bearer <token>`, ready for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{TOKEN_PREFIX}{}", self.token)
    }
}

/// Issues and validates bearer tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("validity_secs", &self.validity.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: impl AsRef<[u8]>, validity: Duration) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        TokenService {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Signs a token for `username` valid from now.
    pub fn issue(&self, username: &str) -> ServiceResult<IssuedToken> {
        self.issue_at(username, Utc::now())
    }

    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> ServiceResult<IssuedToken> {
        let expires_at = now
            .checked_add_signed(self.validity)
            .ok_or_else(|| ServiceError::Signing("token expiry is out of range".to_string()))?;
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ServiceError::Signing(e.to_string()))?;

        info!(username = %username, expires_at = %expires_at, "Issued bearer token");

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in_secs: self.validity.num_seconds(),
        })
    }

    /// Returns the token's subject if it is authentic and unexpired.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            }
        })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }
        if claims.sub.is_empty() {
            return Err(AuthError::Malformed("token has no subject".to_string()));
        }

        Ok(claims.sub)
    }
}

/// Strips the `Bearer ` scheme from an `Authorization` header value.
pub fn extract_bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let token = header_value
        .strip_prefix(TOKEN_PREFIX)
        .ok_or_else(|| AuthError::Malformed("expected Bearer scheme".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}
