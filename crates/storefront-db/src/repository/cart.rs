//! # Cart Repository
//!
//! Database operations for carts.
//!
//! ## Atomic Update
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       update(user_id, mutation)                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE carts SET version = version + 1 WHERE user_id = ?            │
//! │      │                                                                  │
//! │      ├── 0 rows ──► ROLLBACK ──► DbError::NotFound                      │
//! │      │                                                                  │
//! │      └── 1 row  ──► SELECT lines ──► mutation(&mut cart)                │
//! │                          │                                              │
//! │                          ├── Err ──► ROLLBACK ──► DbError::Rejected     │
//! │                          │                                              │
//! │                          └── Ok ──► DELETE cart_items                   │
//! │                                     INSERT one row per unit             │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The UPDATE is the first statement of the transaction, so it takes
//! SQLite's write lock before the lines are read. A second update of the
//! same cart waits on the busy timeout and then reads the first one's
//! committed lines, so both mutations land.

use async_trait::async_trait;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use super::item::ItemRow;
use super::{CartMutation, CartRepository};
use crate::error::{DbError, DbResult};
use storefront_core::{Cart, Item};

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i64,
    user_id: i64,
    version: i64,
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct SqliteCartRepository {
    pool: SqlitePool,
}

impl SqliteCartRepository {
    /// Creates a new SqliteCartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCartRepository { pool }
    }
}

/// Cart lines in insertion order, priced from the live catalog.
async fn load_items<'e, E>(executor: E, cart_id: i64) -> DbResult<Vec<Item>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT i.id, i.name, i.description, i.price_cents
        FROM cart_items ci
        INNER JOIN items i ON i.id = ci.item_id
        WHERE ci.cart_id = ?1
        ORDER BY ci.position, ci.id
        "#,
    )
    .bind(cart_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Item::from).collect())
}

#[async_trait]
impl CartRepository for SqliteCartRepository {
    async fn find_by_user_id(&self, user_id: i64) -> DbResult<Option<Cart>> {
        // Header and lines come from one read snapshot.
        let mut tx = self.pool.begin().await?;

        let header: Option<CartRow> =
            sqlx::query_as("SELECT id, user_id, version FROM carts WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let items = load_items(&mut *tx, header.id).await?;
        tx.commit().await?;

        Ok(Some(Cart::from_parts(
            header.id,
            header.user_id,
            items,
            header.version,
        )))
    }

    async fn update(&self, user_id: i64, mutation: CartMutation) -> DbResult<Cart> {
        let mut tx = self.pool.begin().await?;

        let header: Option<CartRow> = sqlx::query_as(
            r#"
            UPDATE carts SET version = version + 1
            WHERE user_id = ?1
            RETURNING id, user_id, version
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(header) = header else {
            return Err(DbError::not_found("Cart", user_id));
        };

        let items = load_items(&mut *tx, header.id).await?;
        let mut cart = Cart::from_parts(header.id, header.user_id, items, header.version);

        // Dropping `tx` on a rejected mutation rolls the version bump back.
        mutation(&mut cart)?;

        debug!(
            cart_id = cart.id(),
            version = cart.version(),
            items = cart.len(),
            "Saving cart"
        );

        sqlx::query("DELETE FROM cart_items WHERE cart_id = ?1")
            .bind(cart.id())
            .execute(&mut *tx)
            .await?;

        for (position, item) in cart.items().iter().enumerate() {
            sqlx::query("INSERT INTO cart_items (cart_id, position, item_id) VALUES (?1, ?2, ?3)")
                .bind(cart.id())
                .bind(position as i64)
                .bind(item.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(cart)
    }
}
