//! # User Service
//!
//! Sign up, lookup and password login.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::password::PasswordEncoder;
use storefront_core::validation::{validate_new_password, validate_username};
use storefront_core::{AuthError, User, ValidationError};
use storefront_db::{DbError, UserRepository};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        UserService { users, encoder }
    }

    /// Registers a user together with an empty cart.
    ///
    /// Checks run in order: username format, password length, confirmation,
    /// then uniqueness. Nothing is written unless all of them pass.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> ServiceResult<User> {
        validate_username(username)?;
        validate_new_password(password, confirm_password)?;

        if self.users.find_by_username(username).await?.is_some() {
            warn!(username = %username, "Sign up rejected: username taken");
            return Err(username_taken(username));
        }

        let password_hash = self.encoder.encode(password)?;

        // Two sign ups can both pass the check above; the UNIQUE index
        // decides, and the loser gets the same error.
        let user = self
            .users
            .create(username, &password_hash)
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => username_taken(username),
                other => other.into(),
            })?;

        info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(username))
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Verifies a login. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<User> {
        let user = self.users.find_by_username(username).await?;

        match user {
            Some(user) if self.encoder.matches(password, &user.password_hash) => Ok(user),
            _ => {
                warn!(username = %username, "Login rejected");
                Err(AuthError::BadCredentials.into())
            }
        }
    }
}

fn username_taken(username: &str) -> ServiceError {
    ValidationError::UsernameTaken {
        username: username.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use crate::Argon2PasswordEncoder;

    #[tokio::test]
    async fn test_create_user_stores_hash_not_plaintext() {
        let h = harness().await;

        let user = h
            .users
            .create_user("alice", "somepassword", "somepassword")
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "somepassword");
        assert_eq!(user.password_hash, "hashed:somepassword");
        assert_eq!(h.users.find_by_id(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_password_mismatch_persists_nothing() {
        let h = harness().await;

        let err = h
            .users
            .create_user("alice", "somepassword", "otherpassword")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::PasswordMismatch)
        ));
        assert!(matches!(
            h.users.find_by_username("alice").await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let h = harness().await;

        let err = h.users.create_user("alice", "short", "short").await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::TooShort { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_mismatched_password_reports_mismatch() {
        let h = harness().await;

        let err = h.users.create_user("x", "abc", "abcd").await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let h = harness().await;
        let first = h
            .users
            .create_user("alice", "somepassword", "somepassword")
            .await
            .unwrap();

        let err = h
            .users
            .create_user("alice", "different1", "different1")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::UsernameTaken { .. })
        ));
        let found = h.users.find_by_username("alice").await.unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.password_hash, "hashed:somepassword");
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let h = harness().await;
        assert!(matches!(
            h.users.find_by_id(42).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let h = harness().await;
        h.users
            .create_user("alice", "somepassword", "somepassword")
            .await
            .unwrap();

        assert_eq!(
            h.users.authenticate("alice", "somepassword").await.unwrap().username,
            "alice"
        );
        assert!(matches!(
            h.users.authenticate("alice", "wrongpassword").await,
            Err(ServiceError::Auth(AuthError::BadCredentials))
        ));
        assert!(matches!(
            h.users.authenticate("nobody", "somepassword").await,
            Err(ServiceError::Auth(AuthError::BadCredentials))
        ));
    }

    #[tokio::test]
    async fn test_argon2_encoder_end_to_end() {
        let h = harness().await;
        let users = UserService::new(Arc::new(h.db.users()), Arc::new(Argon2PasswordEncoder::new()));

        let user = users
            .create_user("erin", "correct horse", "correct horse")
            .await
            .unwrap();

        assert!(user.password_hash.starts_with("$argon2"));
        assert!(users.authenticate("erin", "correct horse").await.is_ok());
    }
}
