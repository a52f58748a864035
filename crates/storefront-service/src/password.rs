//! # Password Encoding
//!
//! One-way hashing of user passwords. Services depend on the
//! [`PasswordEncoder`] trait so tests can swap in a cheap encoder.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{ServiceError, ServiceResult};

/// Hashes and verifies passwords.
pub trait PasswordEncoder: Send + Sync {
    /// Produces an opaque hash of `raw`. Must never return `raw` itself.
    fn encode(&self, raw: &str) -> ServiceResult<String>;

    /// Checks `raw` against a hash previously produced by [`encode`].
    ///
    /// [`encode`]: PasswordEncoder::encode
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Argon2id with a random salt per password, stored as a PHC string.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordEncoder;

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Argon2PasswordEncoder
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> ServiceResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::Hashing(e.to_string()))
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        // An unparsable stored hash simply never matches.
        match PasswordHash::new(encoded) {
            Ok(parsed) => Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
