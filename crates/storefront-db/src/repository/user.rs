//! # User Repository
//!
//! Database operations for user accounts.
//!
//! A user row never exists without its cart row: both are written in the
//! same transaction by [`SqliteUserRepository::create`].

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::UserRepository;
use crate::error::{DbError, DbResult};
use storefront_core::User;

const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.password_hash, c.id AS cart_id
    FROM users u
    INNER JOIN carts c ON c.user_id = u.id
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    cart_id: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            cart_id: row.cart_id,
        }
    }
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new SqliteUserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> DbResult<User> {
        debug!(username = %username, "Creating user with empty cart");

        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: username.to_string(),
            },
            other => other,
        })?
        .last_insert_rowid();

        let cart_id = sqlx::query("INSERT INTO carts (user_id, version) VALUES (?1, 0)")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        tx.commit().await?;

        Ok(User {
            id: user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            cart_id,
        })
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{SELECT_USER} WHERE u.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER} WHERE u.username = ?1"))
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }
}
