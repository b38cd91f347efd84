//! SQLite persistence layer for the ShopKit catalog.
//!
//! Implements the [`CatalogStore`] trait over a `sqlx` SQLite pool:
//!
//! - **Categories**: tree writes with cascade delete, `(slug, parent)`
//!   uniqueness and bounded slug-retry on auto-generated slugs
//! - **Products**: CRUD with reference-integrity enforcement and an
//!   always-refreshed `updated_at`
//! - **Views**: the available-products read path and the root-category
//!   navigation context
//!
//! # Example
//!
//! ```rust,ignore
//! use shopkit_store::prelude::*;
//! use shopkit_catalog::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteCatalog::connect(StoreConfig::at("shop.db")).await?);
//!
//! let electronics = store
//!     .create_category(NewCategory::new("Electronics").slug("electronics"))
//!     .await?;
//!
//! let shown = AvailableProducts::new(store.clone()).list().await?;
//! ```

pub mod config;
pub mod context;
pub mod sqlite;
pub mod store;
pub mod view;

pub use config::StoreConfig;
pub use context::{CategoryContext, NavCategories};
pub use sqlite::SqliteCatalog;
pub use store::{CatalogStore, ProductFilter, StoreResult};
pub use view::AvailableProducts;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::context::{CategoryContext, NavCategories};
    pub use crate::sqlite::SqliteCatalog;
    pub use crate::store::{CatalogStore, ProductFilter, StoreResult};
    pub use crate::view::AvailableProducts;
}
