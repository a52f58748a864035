//! # Repository Module
//!
//! Repository abstractions and their SQLite implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Service (storefront-service)                                          │
//! │       │                                                                 │
//! │       │  Arc<dyn CartRepository>                                        │
//! │       ▼                                                                 │
//! │  trait CartRepository          ← THIS MODULE (the port)                 │
//! │  ├── find_by_user_id(user_id)                                          │
//! │  └── update(user_id, mutation)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteCartRepository          ← cart.rs (the adapter)                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services only see the traits, so tests and alternative stores can inject
//! their own implementations through constructors.

use async_trait::async_trait;
use storefront_core::{Cart, CoreResult, Item, Order, OrderSnapshot, User};

use crate::error::DbResult;

pub mod cart;
pub mod item;
pub mod order;
pub mod user;

/// Persistence port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and its empty cart in a single transaction.
    ///
    /// A duplicate username fails with `DbError::UniqueViolation` and leaves
    /// nothing behind.
    async fn create(&self, username: &str, password_hash: &str) -> DbResult<User>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>>;
}

/// Persistence port for the catalog.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items ordered by id.
    async fn find_all(&self) -> DbResult<Vec<Item>>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<Item>>;

    /// Items whose name matches exactly.
    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Item>>;

    async fn insert(&self, name: &str, description: &str, price_cents: i64) -> DbResult<Item>;
}

/// A change applied to a loaded cart inside [`CartRepository::update`].
pub type CartMutation = Box<dyn FnOnce(&mut Cart) -> CoreResult<()> + Send>;

/// Persistence port for carts.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Loads the user's cart with current catalog prices.
    async fn find_by_user_id(&self, user_id: i64) -> DbResult<Option<Cart>>;

    /// Loads the user's cart, applies `mutation` and stores the result in a
    /// single transaction, returning the stored cart.
    ///
    /// Concurrent updates of the same cart run one after the other, each on
    /// top of the previous one's result. A mutation error fails with
    /// `DbError::Rejected` and writes nothing; a user without a cart fails
    /// with `DbError::NotFound`.
    async fn update(&self, user_id: i64, mutation: CartMutation) -> DbResult<Cart>;
}

/// Persistence port for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Stores the order header and its lines in a single transaction.
    async fn create(&self, snapshot: &OrderSnapshot) -> DbResult<Order>;

    /// All orders of a user in creation order.
    async fn find_by_user_id(&self, user_id: i64) -> DbResult<Vec<Order>>;
}
