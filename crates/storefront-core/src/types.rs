//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │      Item       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  username       │   │  name           │   │  user_id        │       │
//! │  │  password_hash  │   │  description    │   │  items (frozen) │       │
//! │  │  cart_id (1:1)  │   │  price_cents    │   │  total (frozen) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Cart lives in its own module (`cart.rs`) because it carries the       │
//! │  total invariant.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered shopper.
///
/// The password hash is never serialized: clients only ever see the id,
/// the username and the cart reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier assigned by storage.
    pub id: i64,

    /// Unique, immutable login name.
    pub username: String,

    /// Opaque one-way hash produced by the password encoder.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// The user's single cart (created together with the user).
    pub cart_id: i64,
}

// =============================================================================
// Item
// =============================================================================

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,
}

impl Item {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order.
/// Uses snapshot pattern to freeze catalog data at time of submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub item_id: i64,
    /// Item name at time of submission (frozen).
    pub name: String,
    /// Item description at time of submission (frozen).
    pub description: String,
    /// Unit price in cents at time of submission (frozen).
    pub unit_price_cents: i64,
}

impl From<&Item> for OrderItem {
    fn from(item: &Item) -> Self {
        OrderItem {
            item_id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            unit_price_cents: item.price_cents,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// The content of an order before storage assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub user_id: i64,
    pub username: String,
    pub items: Vec<OrderItem>,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderSnapshot {
    /// Copies the cart's items and total as they are right now.
    ///
    /// The copy shares nothing with the cart: later cart mutations or
    /// catalog price changes cannot reach it.
    pub fn from_cart(user: &User, cart: &Cart, now: DateTime<Utc>) -> Self {
        OrderSnapshot {
            user_id: user.id,
            username: user.username.clone(),
            items: cart.items().iter().map(OrderItem::from).collect(),
            total_cents: cart.total_cents(),
            created_at: now,
        }
    }
}

/// A submitted order. Immutable: there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: i64,
    #[serde(flatten)]
    snapshot: OrderSnapshot,
}

impl Order {
    /// Binds a stored snapshot to its identifier.
    pub fn new(id: i64, snapshot: OrderSnapshot) -> Self {
        Order { id, snapshot }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user_id(&self) -> i64 {
        self.snapshot.user_id
    }

    pub fn username(&self) -> &str {
        &self.snapshot.username
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.snapshot.items
    }

    /// Total frozen at submission time.
    pub fn total(&self) -> Money {
        Money::from_cents(self.snapshot.total_cents)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.snapshot.created_at
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
