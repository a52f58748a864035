//! # Cart
//!
//! A user's single mutable collection of selected items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_item(item, 2)     ──► items.push(item) × 2   ──► recalculate       │
//! │  remove_item(id, 5)    ──► drop ≤ 5 copies of id  ──► recalculate       │
//! │  clear()               ──► items.clear()          ──► recalculate       │
//! │                                                                         │
//! │  The total is never edited directly: it is always the sum of the        │
//! │  current items' prices.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Multiset Representation
//! Quantity is represented by repetition: adding an item three times stores
//! three copies, in insertion order.

use serde::Serialize;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Item;
use crate::validation::{validate_cart_capacity, validate_quantity, validate_removal_quantity};

/// The shopping cart.
///
/// ## Invariants
/// - `total_cents == sum(items[i].price_cents)` after every mutation
/// - Fields are private, so the invariant cannot be bypassed
/// - `version` is owned by storage and bumped on every stored update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    id: i64,
    user_id: i64,
    items: Vec<Item>,
    total_cents: i64,
    #[serde(skip_serializing)]
    version: i64,
}

impl Cart {
    /// Rebuilds a cart from stored parts. The total is always recomputed.
    pub fn from_parts(id: i64, user_id: i64, items: Vec<Item>, version: i64) -> Self {
        let mut cart = Cart {
            id,
            user_id,
            items,
            total_cents: 0,
            version,
        };
        cart.recalculate_total();
        cart
    }

    /// Appends `quantity` copies of `item`.
    ///
    /// ## Returns
    /// - `Ok(())` on success
    /// - `Err(CoreError::Validation)` if quantity is not in `1..=999`, the
    ///   cart would exceed 10 000 units, or the total would overflow
    pub fn add_item(&mut self, item: &Item, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        validate_cart_capacity(self.items.len(), quantity)?;

        item.price_cents
            .checked_mul(quantity)
            .and_then(|added| self.total().checked_add(Money::from_cents(added)))
            .ok_or(ValidationError::TotalOutOfRange)?;

        self.items
            .extend(std::iter::repeat(item).take(quantity as usize).cloned());
        self.recalculate_total();
        Ok(())
    }

    /// Removes up to `quantity` occurrences of the item, earliest first.
    ///
    /// Asking for more than present removes every occurrence; the count never
    /// goes negative.
    ///
    /// ## Returns
    /// The number of copies actually removed.
    pub fn remove_item(&mut self, item_id: i64, quantity: i64) -> CoreResult<usize> {
        validate_removal_quantity(quantity)?;

        let mut remaining = quantity;
        self.items.retain(|item| {
            if remaining > 0 && item.id == item_id {
                remaining -= 1;
                false
            } else {
                true
            }
        });
        self.recalculate_total();

        Ok((quantity - remaining) as usize)
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate_total();
    }

    fn recalculate_total(&mut self) {
        self.total_cents = self.items.iter().map(Item::price).sum::<Money>().cents();
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Items in insertion order, one entry per unit.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of copies of the given item.
    pub fn count_of(&self, item_id: i64) -> usize {
        self.items.iter().filter(|i| i.id == item_id).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    pub fn total_cents(&self) -> i64 {
        self.total_cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn test_item(id: i64, price_cents: i64) -> Item {
        Item {
            id,
            name: format!("Item #{}", id),
            description: format!("Item Description #{}", id),
            price_cents,
        }
    }

    fn empty_cart() -> Cart {
        Cart::from_parts(1, 1, Vec::new(), 0)
    }

    fn sum_of_items(cart: &Cart) -> i64 {
        cart.items().iter().map(|i| i.price_cents).sum()
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = empty_cart();
        let item = test_item(1, 999);

        cart.add_item(&item, 2).unwrap();

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.count_of(1), 2);
        assert_eq!(cart.total().to_string(), "19.98");
    }

    #[test]
    fn test_cart_remove_one_of_two() {
        let mut cart = empty_cart();
        let item = test_item(1, 999);

        cart.add_item(&item, 2).unwrap();
        let removed = cart.remove_item(1, 1).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total().to_string(), "9.99");
    }

    #[test]
    fn test_remove_more_than_present_is_clamped() {
        let mut cart = empty_cart();
        cart.add_item(&test_item(1, 100), 2).unwrap();
        cart.add_item(&test_item(2, 300), 1).unwrap();

        let removed = cart.remove_item(1, 10).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(cart.count_of(1), 0);
        assert_eq!(cart.items(), &[test_item(2, 300)]);
        assert_eq!(cart.total_cents(), 300);
    }

    #[test]
    fn test_remove_absent_item_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(&test_item(1, 100), 1).unwrap();

        assert_eq!(cart.remove_item(42, 1).unwrap(), 0);
        assert_eq!(cart.total_cents(), 100);
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        let mut cart = empty_cart();
        let item = test_item(1, 100);

        for qty in [0, -1] {
            assert!(matches!(
                cart.add_item(&item, qty),
                Err(CoreError::Validation(ValidationError::InvalidQuantity { .. }))
            ));
            assert!(cart.remove_item(1, qty).is_err());
        }
        assert!(cart.add_item(&item, crate::MAX_ITEM_QUANTITY + 1).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_unit_cap() {
        let mut cart = empty_cart();
        let item = test_item(1, 1);

        for _ in 0..10 {
            cart.add_item(&item, 999).unwrap();
        }
        assert_eq!(cart.len(), 9_990);

        assert!(matches!(
            cart.add_item(&item, 11),
            Err(CoreError::Validation(ValidationError::CartFull { max: 10_000 }))
        ));
        cart.add_item(&item, 10).unwrap();
        assert_eq!(cart.len(), crate::MAX_CART_UNITS);
        assert_eq!(cart.total_cents(), 10_000);
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let mut cart = empty_cart();
        let pricey = test_item(1, i64::MAX / 2);

        cart.add_item(&pricey, 2).unwrap();
        assert!(matches!(
            cart.add_item(&pricey, 1),
            Err(CoreError::Validation(ValidationError::TotalOutOfRange))
        ));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_total_invariant_after_every_mutation() {
        let mut cart = empty_cart();
        let items = [test_item(1, 999), test_item(2, 1), test_item(3, 12_345)];

        for (step, item) in items.iter().cycle().take(12).enumerate() {
            if step % 3 == 2 {
                cart.remove_item(item.id, (step as i64 % 4) + 1).unwrap();
            } else {
                cart.add_item(item, (step as i64 % 5) + 1).unwrap();
            }
            assert_eq!(cart.total_cents(), sum_of_items(&cart));
        }
    }

    #[test]
    fn test_add_then_remove_round_trip() {
        let mut cart = empty_cart();
        cart.add_item(&test_item(2, 450), 3).unwrap();
        let before = cart.clone();

        cart.add_item(&test_item(1, 999), 4).unwrap();
        cart.remove_item(1, 4).unwrap();

        assert_eq!(cart.items(), before.items());
        assert_eq!(cart.total(), before.total());
    }

    #[test]
    fn test_from_parts_recomputes_total() {
        let cart = Cart::from_parts(9, 4, vec![test_item(1, 250), test_item(1, 250)], 3);
        assert_eq!(cart.total_cents(), 500);
        assert_eq!(cart.version(), 3);
    }

    #[test]
    fn test_clear() {
        let mut cart = empty_cart();
        cart.add_item(&test_item(1, 250), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }
}
