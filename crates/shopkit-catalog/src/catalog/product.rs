//! Product types.

use crate::error::CatalogError;
use crate::ids::{CategoryId, ProductId};
use crate::price::Price;
use crate::slug::is_url_safe;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A sellable item, owned by exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier, assigned by the store at insert.
    pub id: ProductId,
    /// Owning category. Cascade-deleted with it.
    pub category: CategoryId,
    /// Display title.
    pub title: String,
    /// Brand label.
    pub brand: String,
    /// Optional long-form text.
    pub description: Option<String>,
    /// URL-safe identifier (not unique at the data level).
    pub slug: String,
    /// Fixed-point price, max 99999.99.
    pub price: Price,
    /// Reference into the external media store.
    pub image: String,
    /// Whether the product is shown to end users.
    pub available: bool,
    /// Set once at insert.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every write.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Routing path fragment for this product. Pure formatting.
    pub fn canonical_url(&self) -> String {
        format!("/product/{}/", self.slug)
    }
}

/// Build an image reference namespaced by entity kind and upload date.
///
/// The catalog only stores the reference; image bytes live in an external
/// media store.
///
/// ```
/// use chrono::NaiveDate;
/// use shopkit_catalog::catalog::image_upload_path;
/// let date = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
/// assert_eq!(
///     image_upload_path(date, "widget.png"),
///     "products/products/2024/05/03/widget.png"
/// );
/// ```
pub fn image_upload_path(uploaded: NaiveDate, file_name: &str) -> String {
    format!(
        "products/products/{}/{}",
        uploaded.format("%Y/%m/%d"),
        file_name
    )
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    /// Owning category. Must exist.
    pub category: CategoryId,
    /// Display title. Required, must be non-empty.
    pub title: String,
    /// Brand label.
    pub brand: String,
    /// Image reference.
    pub image: String,
    /// Optional long-form text.
    pub description: Option<String>,
    /// Explicit slug; slugified title when omitted.
    pub slug: Option<String>,
    /// Defaults to 99.99 when omitted.
    pub price: Option<Price>,
    /// Defaults to true when omitted.
    pub available: Option<bool>,
}

impl NewProduct {
    pub fn new(
        category: CategoryId,
        title: impl Into<String>,
        brand: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            brand: brand.into(),
            image: image.into(),
            description: None,
            slug: None,
            price: None,
            available: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Check required fields before the store writes anything.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::validation("product title is required"));
        }
        if let Some(slug) = self.slug.as_deref() {
            if !slug.is_empty() && !is_url_safe(slug) {
                return Err(CatalogError::validation(format!(
                    "slug '{slug}' contains characters that are not URL-safe"
                )));
            }
        }
        Ok(())
    }
}

/// Partial update for a product. Unset fields are left untouched;
/// `updated_at` is refreshed regardless of which fields changed.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub category: Option<CategoryId>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub available: Option<bool>,
}

impl ProductUpdate {
    pub fn category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.title.is_none()
            && self.brand.is_none()
            && self.description.is_none()
            && self.slug.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.available.is_none()
    }
}
