//! The available-products view.

use std::sync::Arc;

use shopkit_catalog::catalog::Product;
use shopkit_catalog::CategoryId;

use crate::store::{CatalogStore, ProductFilter, StoreResult};

/// Read-only view over products with `available = true`.
///
/// Not a separate collection: every call composes the availability
/// predicate onto the product store, so there is a single source of
/// truth for product data. Writes go through the store as usual.
#[derive(Clone)]
pub struct AvailableProducts {
    store: Arc<dyn CatalogStore>,
}

impl AvailableProducts {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Every available product, in the store's natural order.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        self.store
            .products(ProductFilter::default().available(true))
            .await
    }

    /// Available products within one category.
    pub async fn in_category(&self, category: &CategoryId) -> StoreResult<Vec<Product>> {
        self.store
            .products(
                ProductFilter::default()
                    .available(true)
                    .category(category.clone()),
            )
            .await
    }
}
