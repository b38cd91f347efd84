//! Category types for the catalog hierarchy.

use crate::error::CatalogError;
use crate::ids::CategoryId;
use crate::slug::is_url_safe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used when rendering a category's ancestry.
pub const PATH_SEPARATOR: &str = " -> ";

/// A node in the category tree.
///
/// `parent = None` marks a root category. The `(slug, parent)` pair is
/// unique - two categories may share a slug only under different parents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier, assigned by the store at insert.
    pub id: CategoryId,
    /// Display label (non-unique).
    pub name: String,
    /// URL-safe identifier, unique per parent.
    pub slug: String,
    /// Parent category (None for roots).
    pub parent: Option<CategoryId>,
    /// Set once at insert.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Routing path fragment for this category. Pure formatting.
    pub fn canonical_url(&self) -> String {
        format!("/category/{}/", self.slug)
    }
}

/// Join ancestry names, outermost first, into a breadcrumb string.
///
/// ```
/// use shopkit_catalog::catalog::join_path;
/// let path = join_path(&["Electronics".to_string(), "Phones".to_string()]);
/// assert_eq!(path, "Electronics -> Phones");
/// ```
pub fn join_path(names: &[String]) -> String {
    names.join(PATH_SEPARATOR)
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    /// Display label. Required, must be non-empty.
    pub name: String,
    /// Parent category; None creates a root.
    pub parent: Option<CategoryId>,
    /// Explicit slug. When None or empty, the store generates one.
    pub slug: Option<String>,
}

impl NewCategory {
    /// Start a category under no parent.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            slug: None,
        }
    }

    /// Place the category under a parent.
    pub fn parent(mut self, parent: CategoryId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Use an explicit slug instead of a generated one.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Check required fields before the store writes anything.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("category name is required"));
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

/// Partial update for a category. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New display label.
    pub name: Option<String>,
    /// New slug.
    pub slug: Option<String>,
    /// New parent: `Some(None)` re-roots the category,
    /// `Some(Some(id))` re-parents it.
    pub parent: Option<Option<CategoryId>>,
}

impl CategoryUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn parent(mut self, parent: Option<CategoryId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.parent.is_none()
    }
}
