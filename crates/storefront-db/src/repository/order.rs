//! # Order Repository
//!
//! Database operations for submitted orders.
//!
//! Order lines are copies of the catalog data at submission time and carry
//! no reference to the live `items` table beyond the item id, so later price
//! changes never reach stored orders.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::OrderRepository;
use crate::error::DbResult;
use storefront_core::{Order, OrderItem, OrderSnapshot};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    username: String,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: i64,
    item_id: i64,
    name: String,
    description: String,
    unit_price_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            item_id: row.item_id,
            name: row.name,
            description: row.description,
            unit_price_cents: row.unit_price_cents,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    /// Creates a new SqliteOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteOrderRepository { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn create(&self, snapshot: &OrderSnapshot) -> DbResult<Order> {
        debug!(
            user_id = snapshot.user_id,
            lines = snapshot.items.len(),
            total_cents = snapshot.total_cents,
            "Storing order"
        );

        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query(
            "INSERT INTO orders (user_id, total_cents, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(snapshot.user_id)
        .bind(snapshot.total_cents)
        .bind(snapshot.created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for (position, line) in snapshot.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items
                    (order_id, position, item_id, name, description, unit_price_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(order_id)
            .bind(position as i64)
            .bind(line.item_id)
            .bind(&line.name)
            .bind(&line.description)
            .bind(line.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order::new(order_id, snapshot.clone()))
    }

    async fn find_by_user_id(&self, user_id: i64) -> DbResult<Vec<Order>> {
        let headers: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT o.id, o.user_id, u.username, o.total_cents, o.created_at
            FROM orders o
            INNER JOIN users u ON u.id = o.user_id
            WHERE o.user_id = ?1
            ORDER BY o.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let lines: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT oi.order_id, oi.item_id, oi.name, oi.description, oi.unit_price_cents
            FROM order_items oi
            INNER JOIN orders o ON o.id = oi.order_id
            WHERE o.user_id = ?1
            ORDER BY oi.order_id, oi.position
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
        for line in lines {
            by_order.entry(line.order_id).or_default().push(line.into());
        }

        Ok(headers
            .into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                Order::new(
                    row.id,
                    OrderSnapshot {
                        user_id: row.user_id,
                        username: row.username,
                        items,
                        total_cents: row.total_cents,
                        created_at: row.created_at,
                    },
                )
            })
            .collect())
    }
}
