//! # Item Repository
//!
//! Read access to the catalog, plus `insert` for seeding.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use super::ItemRepository;
use crate::error::DbResult;
use storefront_core::Item;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price_cents: i64,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
        }
    }
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct SqliteItemRepository {
    pool: SqlitePool,
}

impl SqliteItemRepository {
    /// Creates a new SqliteItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteItemRepository { pool }
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn find_all(&self) -> DbResult<Vec<Item>> {
        let rows: Vec<ItemRow> =
            sqlx::query_as("SELECT id, name, description, price_cents FROM items ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, description, price_cents FROM items WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Item::from))
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>> {
        debug!(name = %name, "Looking up items by name");

        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, name, description, price_cents FROM items WHERE name = ?1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn insert(&self, name: &str, description: &str, price_cents: i64) -> DbResult<Item> {
        let id = sqlx::query(
            "INSERT INTO items (name, description, price_cents) VALUES (?1, ?2, ?3)",
        )
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Item {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price_cents,
        })
    }
}
