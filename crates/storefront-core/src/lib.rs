//! # storefront-core: Pure Domain Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart and
//! order rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-api (HTTP handlers)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       storefront-service (token, user, cart, order flows)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ User/Item │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │   Order   │  │           │  │  totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Item, Order)
//! - [`cart`] - The mutable Cart and its total invariant
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Item, Money};
//!
//! let widget = Item {
//!     id: 1,
//!     name: "Round Widget".to_string(),
//!     description: "A widget that is round".to_string(),
//!     price_cents: 299,
//! };
//!
//! let mut cart = Cart::from_parts(1, 1, Vec::new(), 0);
//! cart.add_item(&widget, 2).unwrap();
//!
//! assert_eq!(cart.total(), Money::from_cents(598));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{AuthError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single item added in one request.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of units a single cart may hold.
pub const MAX_CART_UNITS: usize = 10_000;

/// Minimum password length accepted at sign up.
pub const MIN_PASSWORD_LENGTH: usize = 7;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 50;
