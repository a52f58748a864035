//! # storefront-service: Business Flows
//!
//! The operations the HTTP layer exposes, independent of HTTP.
//!
//! ## Services
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TokenService   issue / validate bearer tokens (no storage)            │
//! │  UserService    create_user, find_by_*, authenticate                   │
//! │  CartService    add_to_cart, remove_from_cart, get_cart                │
//! │  OrderService   submit, get_orders_for_user                            │
//! │  ItemService    list_items, get_item, find_items_by_name               │
//! │                                                                         │
//! │  Every service takes its collaborators in `new` as Arc<dyn Trait>,     │
//! │  so tests wire in-memory databases and fake encoders directly.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod error;
pub mod item;
pub mod order;
pub mod password;
pub mod token;
pub mod user;

pub use cart::CartService;
pub use error::{ServiceError, ServiceResult};
pub use item::ItemService;
pub use order::OrderService;
pub use password::{Argon2PasswordEncoder, PasswordEncoder};
pub use token::{
    extract_bearer_token, Claims, IssuedToken, TokenService, AUTH_HEADER,
    DEFAULT_TOKEN_VALIDITY_SECS, TOKEN_PREFIX,
};
pub use user::UserService;

use std::sync::Arc;

use storefront_db::Database;

/// All services wired against one database.
#[derive(Clone)]
pub struct Services {
    pub tokens: TokenService,
    pub users: UserService,
    pub carts: CartService,
    pub orders: OrderService,
    pub items: ItemService,
}

impl Services {
    pub fn new(db: &Database, tokens: TokenService, encoder: Arc<dyn PasswordEncoder>) -> Self {
        let users = Arc::new(db.users());
        let items = Arc::new(db.items());
        let carts = Arc::new(db.carts());
        let orders = Arc::new(db.orders());

        Services {
            tokens,
            users: UserService::new(users.clone(), encoder),
            carts: CartService::new(users.clone(), items.clone(), carts.clone()),
            orders: OrderService::new(users, carts, orders),
            items: ItemService::new(items),
        }
    }

    /// See [`OrderService::clear_cart_on_submit`].
    pub fn clear_cart_on_submit(mut self, clear: bool) -> Self {
        self.orders = self.orders.clear_cart_on_submit(clear);
        self
    }
}
