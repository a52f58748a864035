//! # Item Service
//!
//! Read-only catalog lookups.

use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use storefront_core::Item;
use storefront_db::ItemRepository;

#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        ItemService { items }
    }

    pub async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        Ok(self.items.find_all().await?)
    }

    pub async fn get_item(&self, id: i64) -> ServiceResult<Item> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::item_not_found(id))
    }

    /// Items named exactly `name`; no match is `NotFound`.
    pub async fn find_items_by_name(&self, name: &str) -> ServiceResult<Vec<Item>> {
        let found = self.items.find_by_name(name).await?;
        if found.is_empty() {
            return Err(ServiceError::not_found("Item", name));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;

    #[tokio::test]
    async fn test_catalog_lookups() {
        let h = harness().await;
        let seeded = h.seed_catalog().await;

        assert_eq!(h.items.list_items().await.unwrap(), seeded);
        assert_eq!(h.items.get_item(seeded[1].id).await.unwrap(), seeded[1]);
        assert_eq!(
            h.items.find_items_by_name("Round Widget").await.unwrap(),
            vec![seeded[0].clone()]
        );
    }

    #[tokio::test]
    async fn test_missing_items_are_not_found() {
        let h = harness().await;
        h.seed_catalog().await;

        assert!(matches!(
            h.items.get_item(500).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            h.items.find_items_by_name("Triangle Widget").await,
            Err(ServiceError::NotFound { ref key, .. }) if key == "Triangle Widget"
        ));
    }
}
