//! Navigation context supplier.
//!
//! A stateless read over the store's current content: the rendering layer
//! asks for it on every request and receives the root categories under the
//! key `categories`. No caching, by contract - root cardinality is small.

use std::sync::Arc;

use serde::Serialize;
use shopkit_catalog::catalog::Category;

use crate::store::{CatalogStore, StoreResult};

/// Context handed to the rendering boundary.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryContext {
    /// Every parentless category.
    pub categories: Vec<Category>,
}

/// Injectable supplier of the navigation context.
#[derive(Clone)]
pub struct NavCategories {
    store: Arc<dyn CatalogStore>,
}

impl NavCategories {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Query the root categories, fresh on every invocation.
    pub async fn context(&self) -> StoreResult<CategoryContext> {
        Ok(CategoryContext {
            categories: self.store.root_categories().await?,
        })
    }
}
