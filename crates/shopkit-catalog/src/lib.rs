//! Catalog domain types for ShopKit.
//!
//! This crate holds the persistence-agnostic half of the catalog:
//!
//! - **Entities**: categories (a parent-pointer tree) and products
//! - **Prices**: fixed-point, cents-based money with range validation
//! - **Slugs**: URL-safe identifiers with random-token generation
//!
//! Storage lives in `shopkit-store`; nothing here touches a database.
//!
//! # Example
//!
//! ```
//! use shopkit_catalog::prelude::*;
//!
//! let phones = NewCategory::new("Phones").slug("phones");
//! let widget = NewProduct::new(CategoryId::new("cat-1"), "Widget", "Acme", "products/widget.png")
//!     .price(Price::parse("19.99").unwrap());
//! assert_eq!(widget.title, "Widget");
//! assert!(phones.parent.is_none());
//! ```

pub mod catalog;
pub mod error;
pub mod ids;
pub mod price;
pub mod slug;

pub use error::CatalogError;
pub use ids::{CategoryId, ProductId};
pub use price::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{
        Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductUpdate,
    };
    pub use crate::error::CatalogError;
    pub use crate::ids::{CategoryId, ProductId};
    pub use crate::price::Price;
    pub use crate::slug::{generate_slug, slugify};
}
