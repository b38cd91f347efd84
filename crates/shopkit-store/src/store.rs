//! The catalog storage trait.
//!
//! The rest of the crate (and downstream callers) depend on this trait
//! rather than on a concrete backend, so views and context suppliers can
//! be tested against any implementation.

use async_trait::async_trait;
use shopkit_catalog::catalog::{
    Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductUpdate,
};
use shopkit_catalog::{CatalogError, CategoryId, ProductId};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, CatalogError>;

/// Equality filter over product queries.
///
/// Composes predicates over the single product table; derived read paths
/// such as [`AvailableProducts`](crate::view::AvailableProducts) are built
/// from this rather than from separate tables.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to one category.
    pub category: Option<CategoryId>,
    /// Restrict by availability flag.
    pub available: Option<bool>,
}

impl ProductFilter {
    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }
}

/// Relational store for categories and products.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // Categories

    /// Insert a category, generating a slug when none is supplied.
    async fn create_category(&self, input: NewCategory) -> StoreResult<Category>;

    /// Fetch a category by id.
    async fn category(&self, id: &CategoryId) -> StoreResult<Category>;

    /// Fetch a category by slug within a parent scope.
    async fn category_by_slug(
        &self,
        slug: &str,
        parent: Option<&CategoryId>,
    ) -> StoreResult<Category>;

    /// All categories with no parent. Evaluated fresh on every call.
    async fn root_categories(&self) -> StoreResult<Vec<Category>>;

    /// Direct children of a category.
    async fn child_categories(&self, parent: &CategoryId) -> StoreResult<Vec<Category>>;

    /// Human-readable breadcrumb `Root -> ... -> Self`, walking the parent
    /// chain upward. A cycle in stored data is reported, not looped on.
    async fn category_path(&self, id: &CategoryId) -> StoreResult<String>;

    /// Apply a partial update. Re-parenting that would make a category its
    /// own ancestor is rejected.
    async fn update_category(&self, id: &CategoryId, update: CategoryUpdate)
        -> StoreResult<Category>;

    /// Delete a category, cascading to child categories and products.
    async fn delete_category(&self, id: &CategoryId) -> StoreResult<()>;

    // Products

    /// Insert a product. The category must exist.
    async fn create_product(&self, input: NewProduct) -> StoreResult<Product>;

    /// Fetch a product by id.
    async fn product(&self, id: &ProductId) -> StoreResult<Product>;

    /// Fetch a product by slug (first match; product slugs are not unique).
    async fn product_by_slug(&self, slug: &str) -> StoreResult<Product>;

    /// List products matching a filter, in the store's natural order.
    async fn products(&self, filter: ProductFilter) -> StoreResult<Vec<Product>>;

    /// Apply a partial update, always refreshing `updated_at`.
    async fn update_product(&self, id: &ProductId, update: ProductUpdate)
        -> StoreResult<Product>;

    /// Delete a product.
    async fn delete_product(&self, id: &ProductId) -> StoreResult<()>;
}
