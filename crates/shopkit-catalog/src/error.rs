//! Catalog error types.

use thiserror::Error;

/// Errors that can occur in catalog operations.
///
/// Every failure is surfaced as a distinct variant; nothing is swallowed
/// or silently truncated. There is no retry logic here - callers decide
/// whether a failed write is worth repeating.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A field failed validation (missing name, malformed price, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another category already holds this slug under the same parent.
    #[error("Duplicate slug '{slug}' under the same parent")]
    UniquenessViolation { slug: String },

    /// A product referenced a category that does not exist.
    #[error("Unknown category: {0}")]
    ReferenceIntegrity(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The parent chain loops back on itself.
    #[error("Category hierarchy cycle at: {0}")]
    HierarchyCycle(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl CatalogError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        CatalogError::Validation(msg.into())
    }
}
