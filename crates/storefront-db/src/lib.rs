//! # storefront-db: Database Layer for the Storefront
//!
//! Persistence for users, carts, the catalog and orders, on SQLite through
//! sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Data Flow                              │
//! │                                                                         │
//! │  HTTP handler ──► storefront-service (CartService::add_to_cart)        │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  user / item  │    │  (embedded)  │   │   │
//! │  │   │  SqlitePool   │◄───│  cart / order │    │ 001_init.sql │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                    SQLite Database                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository traits and SQLite implementations
//! - [`seed`] - Default catalog for fresh databases
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig, UserRepository};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! let user = db.users().create("alice", &hash).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    CartMutation, CartRepository, ItemRepository, OrderRepository, UserRepository,
};

pub use repository::cart::SqliteCartRepository;
pub use repository::item::SqliteItemRepository;
pub use repository::order::SqliteOrderRepository;
pub use repository::user::SqliteUserRepository;
