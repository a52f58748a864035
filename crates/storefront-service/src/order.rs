//! # Order Service
//!
//! Turns a cart into an immutable order and lists a user's orders.
//!
//! ```text
//! submit("carol")
//!   │
//!   ├── load user + cart
//!   ├── OrderSnapshot::from_cart   (copies items, prices, total)
//!   ├── orders.create(snapshot)    (one transaction)
//!   └── [clear_cart_on_submit] carts.update(remove the ordered units)
//! ```
//!
//! By default the cart is left as it was, so submitting twice yields two
//! identical orders.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use storefront_core::{Cart, CoreResult, Order, OrderSnapshot, User};
use storefront_db::{CartRepository, OrderRepository, UserRepository};

#[derive(Clone)]
pub struct OrderService {
    users: Arc<dyn UserRepository>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    clear_cart_on_submit: bool,
}

impl OrderService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        OrderService {
            users,
            carts,
            orders,
            clear_cart_on_submit: false,
        }
    }

    /// Empty the cart once its order is stored.
    pub fn clear_cart_on_submit(mut self, clear: bool) -> Self {
        self.clear_cart_on_submit = clear;
        self
    }

    /// Snapshots the user's cart into a new order.
    ///
    /// An empty cart produces an empty order with a zero total.
    pub async fn submit(&self, username: &str) -> ServiceResult<Order> {
        let user = self.user(username).await?;
        let cart = self
            .carts
            .find_by_user_id(user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Cart", user.cart_id))?;

        let snapshot = OrderSnapshot::from_cart(&user, &cart, Utc::now());
        let order = self.orders.create(&snapshot).await?;

        info!(
            order_id = order.id(),
            username = %username,
            lines = order.items().len(),
            total = %order.total(),
            "Order submitted"
        );

        if self.clear_cart_on_submit && !cart.is_empty() {
            // Units added after the snapshot stay in the cart.
            let ordered: Vec<i64> = cart.items().iter().map(|item| item.id).collect();
            let cleared = self
                .carts
                .update(
                    user.id,
                    Box::new(move |cart: &mut Cart| -> CoreResult<()> {
                        for item_id in ordered {
                            cart.remove_item(item_id, 1)?;
                        }
                        Ok(())
                    }),
                )
                .await;
            if let Err(e) = cleared {
                warn!(order_id = order.id(), error = %e, "Cart not cleared after submit");
            }
        }

        Ok(order)
    }

    /// All orders of the user, oldest first.
    pub async fn get_orders_for_user(&self, username: &str) -> ServiceResult<Vec<Order>> {
        let user = self.user(username).await?;
        Ok(self.orders.find_by_user_id(user.id).await?)
    }

    async fn user(&self, username: &str) -> ServiceResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::user_not_found(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use storefront_core::Money;

    #[tokio::test]
    async fn test_carol_submits_two_items() {
        let h = harness().await;
        h.signup("carol").await;
        let items = h.seed_catalog().await;
        h.carts.add_to_cart("carol", items[0].id, 1).await.unwrap();
        h.carts.add_to_cart("carol", items[1].id, 1).await.unwrap();

        let order = h.orders.submit("carol").await.unwrap();

        assert_eq!(order.items().len(), 2);
        assert_eq!(order.username(), "carol");
        assert_eq!(order.total(), Money::from_cents(299 + 199));
        assert_eq!(h.orders.get_orders_for_user("carol").await.unwrap(), vec![order]);
    }

    #[tokio::test]
    async fn test_order_is_independent_of_later_changes() {
        let h = harness().await;
        h.signup("carol").await;
        let items = h.seed_catalog().await;
        let cart = h.carts.add_to_cart("carol", items[0].id, 2).await.unwrap();

        let order = h.orders.submit("carol").await.unwrap();
        assert_eq!(order.total(), cart.total());
        assert_eq!(order.items().len(), cart.len());

        h.carts.add_to_cart("carol", items[1].id, 5).await.unwrap();
        h.carts.remove_from_cart("carol", items[0].id, 2).await.unwrap();

        let history = h.orders.get_orders_for_user("carol").await.unwrap();
        assert_eq!(history, vec![order]);
    }

    #[tokio::test]
    async fn test_cart_kept_by_default() {
        let h = harness().await;
        h.signup("carol").await;
        let items = h.seed_catalog().await;
        h.carts.add_to_cart("carol", items[0].id, 1).await.unwrap();

        let first = h.orders.submit("carol").await.unwrap();
        let second = h.orders.submit("carol").await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.items(), second.items());
        assert_eq!(h.carts.get_cart("carol").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cart_on_submit() {
        let h = harness().await;
        h.signup("carol").await;
        let items = h.seed_catalog().await;
        h.carts.add_to_cart("carol", items[0].id, 3).await.unwrap();
        let orders = h.orders.clone().clear_cart_on_submit(true);

        let order = orders.submit("carol").await.unwrap();

        assert_eq!(order.items().len(), 3);
        assert!(h.carts.get_cart("carol").await.unwrap().is_empty());
        assert_eq!(orders.get_orders_for_user("carol").await.unwrap()[0], order);
    }

    #[tokio::test]
    async fn test_empty_cart_submits_zero_order() {
        let h = harness().await;
        h.signup("carol").await;

        let order = h.orders.submit("carol").await.unwrap();

        assert!(order.items().is_empty());
        assert!(order.total().is_zero());
    }

    #[tokio::test]
    async fn test_price_change_does_not_touch_order() {
        let h = harness().await;
        h.signup("carol").await;
        let items = h.seed_catalog().await;
        h.carts.add_to_cart("carol", items[0].id, 1).await.unwrap();
        let order = h.orders.submit("carol").await.unwrap();

        sqlx::query("UPDATE items SET price_cents = 5000 WHERE id = ?1")
            .bind(items[0].id)
            .execute(h.db.pool())
            .await
            .unwrap();

        let stored = &h.orders.get_orders_for_user("carol").await.unwrap()[0];
        assert_eq!(stored.items()[0].unit_price_cents, 299);
        assert_eq!(stored.total(), order.total());
        // The live cart follows the catalog.
        assert_eq!(h.carts.get_cart("carol").await.unwrap().total_cents(), 5000);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let h = harness().await;
        assert!(matches!(
            h.orders.submit("nobody").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            h.orders.get_orders_for_user("nobody").await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
