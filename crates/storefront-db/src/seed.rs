//! # Catalog Seeding
//!
//! Populates an empty catalog with the default widgets so a fresh
//! deployment has something to sell.

use tracing::info;

use crate::error::DbResult;
use crate::repository::ItemRepository;

/// `(name, description, price_cents)` of the default catalog.
pub const DEFAULT_CATALOG: &[(&str, &str, i64)] = &[
    ("Round Widget", "A widget that is round", 299),
    ("Square Widget", "A widget that is square", 199),
];

/// Inserts [`DEFAULT_CATALOG`] when the catalog is empty.
///
/// Returns the number of items inserted; a catalog that already has
/// entries is left untouched and `0` is returned.
pub async fn seed_default_catalog(items: &dyn ItemRepository) -> DbResult<usize> {
    if !items.find_all().await?.is_empty() {
        return Ok(0);
    }

    for (name, description, price_cents) in DEFAULT_CATALOG {
        items.insert(name, description, *price_cents).await?;
    }

    info!(count = DEFAULT_CATALOG.len(), "Seeded default catalog");
    Ok(DEFAULT_CATALOG.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_seed_only_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let items = db.items();

        assert_eq!(seed_default_catalog(&items).await.unwrap(), 2);
        assert_eq!(seed_default_catalog(&items).await.unwrap(), 0);

        let all = items.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Round Widget");
        assert_eq!(all[1].price_cents, 199);
    }
}
