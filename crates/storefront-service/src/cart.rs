//! # Cart Service
//!
//! Adds and removes catalog items in a user's cart.
//!
//! Every mutation runs inside [`CartRepository::update`]: the cart is loaded,
//! changed and stored in one transaction, so concurrent requests against the
//! same cart are applied one after the other and none of them is lost.

use std::sync::Arc;

use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use storefront_core::{Cart, CoreResult, Item, User};
use storefront_db::{CartRepository, ItemRepository, UserRepository};

#[derive(Clone)]
pub struct CartService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        carts: Arc<dyn CartRepository>,
    ) -> Self {
        CartService {
            users,
            items,
            carts,
        }
    }

    /// Appends `quantity` units of the item. Quantity must be 1..=999.
    pub async fn add_to_cart(
        &self,
        username: &str,
        item_id: i64,
        quantity: i64,
    ) -> ServiceResult<Cart> {
        let user = self.user(username).await?;
        let item = self.item(item_id).await?;

        debug!(username = %username, item_id, quantity, "Adding to cart");
        self.update(&user, move |cart| cart.add_item(&item, quantity))
            .await
    }

    /// Removes up to `quantity` units of the item; asking for more than the
    /// cart holds removes all of them.
    pub async fn remove_from_cart(
        &self,
        username: &str,
        item_id: i64,
        quantity: i64,
    ) -> ServiceResult<Cart> {
        let user = self.user(username).await?;
        let item = self.item(item_id).await?;

        debug!(username = %username, item_id, requested = quantity, "Removing from cart");
        self.update(&user, move |cart| cart.remove_item(item.id, quantity).map(drop))
            .await
    }

    pub async fn get_cart(&self, username: &str) -> ServiceResult<Cart> {
        let user = self.user(username).await?;
        self.cart_of(&user).await
    }

    async fn user(&self, username: &str) -> ServiceResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(username))
    }

    async fn item(&self, item_id: i64) -> ServiceResult<Item> {
        self.items
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| ServiceError::item_not_found(item_id))
    }

    async fn cart_of(&self, user: &User) -> ServiceResult<Cart> {
        self.carts
            .find_by_user_id(user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", user.cart_id))
    }

    async fn update<F>(&self, user: &User, mutation: F) -> ServiceResult<Cart>
    where
        F: FnOnce(&mut Cart) -> CoreResult<()> + Send + 'static,
    {
        Ok(self.carts.update(user.id, Box::new(mutation)).await?)
    }
}
