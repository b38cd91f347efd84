//! SQLite implementation of [`CatalogStore`].

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{error::ErrorKind, Row};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::store::{CatalogStore, ProductFilter, StoreResult};
use shopkit_catalog::catalog::{
    join_path, Category, CategoryUpdate, NewCategory, NewProduct, Product, ProductUpdate,
};
use shopkit_catalog::slug::{generate_slug, is_url_safe, slugify};
use shopkit_catalog::{CatalogError, CategoryId, Price, ProductId};

/// How many fresh random tokens to try when an auto-generated slug
/// collides before giving up.
const SLUG_RETRY_LIMIT: u32 = 3;

/// SQLite-backed catalog store.
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Open the database, apply pragmas and run pending migrations.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CatalogError::Database(e.to_string()))?;
            }
        }

        let mut options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds));

        if config.enable_wal {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| CatalogError::Migration(e.to_string()))?;

        info!("catalog store ready at {}", config.path.display());
        Ok(Self { pool })
    }

    /// Wrap an existing pool. Migrations must already have run.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_category(row: &SqliteRow) -> StoreResult<Category> {
        let parent: Option<String> = row.try_get("parent_id").map_err(db_err)?;
        Ok(Category {
            id: CategoryId::new(row.try_get::<String, _>("id").map_err(db_err)?),
            name: row.try_get("name").map_err(db_err)?,
            slug: row.try_get("slug").map_err(db_err)?,
            parent: parent.map(CategoryId::new),
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(db_err)?)?,
        })
    }

    fn row_to_product(row: &SqliteRow) -> StoreResult<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get::<String, _>("id").map_err(db_err)?),
            category: CategoryId::new(row.try_get::<String, _>("category_id").map_err(db_err)?),
            title: row.try_get("title").map_err(db_err)?,
            brand: row.try_get("brand").map_err(db_err)?,
            description: row.try_get("description").map_err(db_err)?,
            slug: row.try_get("slug").map_err(db_err)?,
            price: Price::from_cents(row.try_get::<i64, _>("price_cents").map_err(db_err)?)?,
            image: row.try_get("image").map_err(db_err)?,
            available: row.try_get("available").map_err(db_err)?,
            created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(db_err)?)?,
            updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(db_err)?)?,
        })
    }

    /// True when `candidate` appears in the ancestor chain of `of`
    /// (including `of` itself). Bounded by a visited set.
    async fn is_self_or_ancestor(
        &self,
        candidate: &CategoryId,
        of: &CategoryId,
    ) -> StoreResult<bool> {
        let mut seen = HashSet::new();
        let mut cursor = Some(of.clone());
        while let Some(id) = cursor {
            if &id == candidate {
                return Ok(true);
            }
            if !seen.insert(id.clone()) {
                return Err(CatalogError::HierarchyCycle(id.into_inner()));
            }
            cursor = self.category(&id).await?.parent;
        }
        Ok(false)
    }

    async fn insert_category(
        &self,
        id: &CategoryId,
        input: &NewCategory,
        slug: &str,
        created_at: &DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, parent_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(&input.name)
        .bind(slug)
        .bind(input.parent.as_ref().map(|p| p.as_str()))
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| classify_write_error(e, slug, input.parent.as_ref()))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn create_category(&self, input: NewCategory) -> StoreResult<Category> {
        input.validate()?;

        let id = CategoryId::generate();
        let now = Utc::now();
        let explicit = input.slug.as_deref().filter(|s| !s.is_empty());

        // An explicit slug gets exactly one attempt; a generated slug is
        // retried with a fresh random token on collision.
        let attempts = if explicit.is_some() { 1 } else { SLUG_RETRY_LIMIT };
        let mut last_err = None;

        for attempt in 0..attempts {
            let slug = match explicit {
                Some(s) => s.to_string(),
                None => generate_slug(&input.name),
            };

            match self.insert_category(&id, &input, &slug, &now).await {
                Ok(()) => {
                    debug!("created category '{}' with slug '{}'", input.name, slug);
                    return self.category(&id).await;
                }
                Err(CatalogError::UniquenessViolation { slug })
                    if explicit.is_none() && attempt + 1 < attempts =>
                {
                    warn!("generated slug '{}' collided, retrying", slug);
                    last_err = Some(CatalogError::UniquenessViolation { slug });
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| CatalogError::Database("insert failed".to_string())))
    }

    async fn category(&self, id: &CategoryId) -> StoreResult<Category> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Self::row_to_category(&row),
            None => Err(CatalogError::CategoryNotFound(id.to_string())),
        }
    }

    async fn category_by_slug(
        &self,
        slug: &str,
        parent: Option<&CategoryId>,
    ) -> StoreResult<Category> {
        let row = match parent {
            Some(parent) => {
                sqlx::query("SELECT * FROM categories WHERE slug = ? AND parent_id = ?")
                    .bind(slug)
                    .bind(parent.as_str())
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT * FROM categories WHERE slug = ? AND parent_id IS NULL")
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(db_err)?;

        match row {
            Some(row) => Self::row_to_category(&row),
            None => Err(CatalogError::CategoryNotFound(slug.to_string())),
        }
    }

    async fn root_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories WHERE parent_id IS NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(Self::row_to_category).collect()
    }

    async fn child_categories(&self, parent: &CategoryId) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories WHERE parent_id = ?")
            .bind(parent.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(Self::row_to_category).collect()
    }

    async fn category_path(&self, id: &CategoryId) -> StoreResult<String> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id.clone());

        while let Some(current) = cursor {
            if !seen.insert(current.clone()) {
                return Err(CatalogError::HierarchyCycle(current.into_inner()));
            }
            let category = self.category(&current).await?;
            names.push(category.name);
            cursor = category.parent;
        }

        names.reverse();
        Ok(join_path(&names))
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        update: CategoryUpdate,
    ) -> StoreResult<Category> {
        let current = self.category(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        if let Some(Some(new_parent)) = &update.parent {
            // A category may not become its own ancestor.
            if self.is_self_or_ancestor(id, new_parent).await? {
                return Err(CatalogError::HierarchyCycle(id.to_string()));
            }
        }

        if let Some(slug) = update.slug.as_deref() {
            if slug.is_empty() || !is_url_safe(slug) {
                return Err(CatalogError::validation(format!(
                    "slug '{slug}' contains characters that are not URL-safe"
                )));
            }
        }
        if let Some(name) = update.name.as_deref() {
            if name.trim().is_empty() {
                return Err(CatalogError::validation("category name is required"));
            }
        }

        let mut query_parts = Vec::new();
        if update.name.is_some() {
            query_parts.push("name = ?");
        }
        if update.slug.is_some() {
            query_parts.push("slug = ?");
        }
        if update.parent.is_some() {
            query_parts.push("parent_id = ?");
        }

        let query_str = format!(
            "UPDATE categories SET {} WHERE id = ?",
            query_parts.join(", ")
        );

        let mut query = sqlx::query(&query_str);
        if let Some(ref name) = update.name {
            query = query.bind(name);
        }
        if let Some(ref slug) = update.slug {
            query = query.bind(slug);
        }
        if let Some(ref parent) = update.parent {
            query = query.bind(parent.as_ref().map(|p| p.as_str()));
        }

        let slug_for_error = update.slug.clone().unwrap_or(current.slug);
        query
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                classify_write_error(
                    e,
                    &slug_for_error,
                    update.parent.as_ref().and_then(|p| p.as_ref()),
                )
            })?;

        debug!("updated category {}", id);
        self.category(id).await
    }

    async fn delete_category(&self, id: &CategoryId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::CategoryNotFound(id.to_string()));
        }
        debug!("deleted category {} (cascading)", id);
        Ok(())
    }

    async fn create_product(&self, input: NewProduct) -> StoreResult<Product> {
        input.validate()?;

        let id = ProductId::generate();
        let now = Utc::now();
        let slug = match input.slug.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => slugify(&input.title),
        };
        let price = input.price.unwrap_or_default();
        let available = input.available.unwrap_or(true);

        sqlx::query(
            r#"
            INSERT INTO products (
                id, category_id, title, brand, description, slug,
                price_cents, image, available, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(input.category.as_str())
        .bind(&input.title)
        .bind(&input.brand)
        .bind(&input.description)
        .bind(&slug)
        .bind(price.cents())
        .bind(&input.image)
        .bind(available)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| classify_write_error(e, &slug, Some(&input.category)))?;

        debug!("created product '{}' in category {}", input.title, input.category);
        self.product(&id).await
    }

    async fn product(&self, id: &ProductId) -> StoreResult<Product> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Self::row_to_product(&row),
            None => Err(CatalogError::ProductNotFound(id.to_string())),
        }
    }

    async fn product_by_slug(&self, slug: &str) -> StoreResult<Product> {
        let row = sqlx::query("SELECT * FROM products WHERE slug = ? LIMIT 1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Self::row_to_product(&row),
            None => Err(CatalogError::ProductNotFound(slug.to_string())),
        }
    }

    async fn products(&self, filter: ProductFilter) -> StoreResult<Vec<Product>> {
        let mut clauses = Vec::new();
        if filter.category.is_some() {
            clauses.push("category_id = ?");
        }
        if filter.available.is_some() {
            clauses.push("available = ?");
        }

        let mut sql = String::from("SELECT * FROM products");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let mut query = sqlx::query(&sql);
        if let Some(ref category) = filter.category {
            query = query.bind(category.as_str());
        }
        if let Some(available) = filter.available {
            query = query.bind(available);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(db_err)?;
        let products: StoreResult<Vec<Product>> = rows.iter().map(Self::row_to_product).collect();
        let products = products?;
        debug!("retrieved {} products", products.len());
        Ok(products)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> StoreResult<Product> {
        if let Some(title) = update.title.as_deref() {
            if title.trim().is_empty() {
                return Err(CatalogError::validation("product title is required"));
            }
        }
        if let Some(slug) = update.slug.as_deref() {
            if slug.is_empty() || !is_url_safe(slug) {
                return Err(CatalogError::validation(format!(
                    "slug '{slug}' contains characters that are not URL-safe"
                )));
            }
        }

        let mut query_parts = Vec::new();
        if update.category.is_some() {
            query_parts.push("category_id = ?");
        }
        if update.title.is_some() {
            query_parts.push("title = ?");
        }
        if update.brand.is_some() {
            query_parts.push("brand = ?");
        }
        if update.description.is_some() {
            query_parts.push("description = ?");
        }
        if update.slug.is_some() {
            query_parts.push("slug = ?");
        }
        if update.price.is_some() {
            query_parts.push("price_cents = ?");
        }
        if update.image.is_some() {
            query_parts.push("image = ?");
        }
        if update.available.is_some() {
            query_parts.push("available = ?");
        }

        // The write clock advances even when no other field changes.
        query_parts.push("updated_at = ?");

        let query_str = format!("UPDATE products SET {} WHERE id = ?", query_parts.join(", "));

        let mut query = sqlx::query(&query_str);
        if let Some(ref category) = update.category {
            query = query.bind(category.as_str());
        }
        if let Some(ref title) = update.title {
            query = query.bind(title);
        }
        if let Some(ref brand) = update.brand {
            query = query.bind(brand);
        }
        if let Some(ref description) = update.description {
            query = query.bind(description);
        }
        if let Some(ref slug) = update.slug {
            query = query.bind(slug);
        }
        if let Some(price) = update.price {
            query = query.bind(price.cents());
        }
        if let Some(ref image) = update.image {
            query = query.bind(image);
        }
        if let Some(available) = update.available {
            query = query.bind(available);
        }

        let now = Utc::now();
        let result = query
            .bind(now.to_rfc3339())
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| classify_write_error(e, "", update.category.as_ref()))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound(id.to_string()));
        }

        debug!("updated product {}", id);
        self.product(id).await
    }

    async fn delete_product(&self, id: &ProductId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound(id.to_string()));
        }
        debug!("deleted product {}", id);
        Ok(())
    }
}

/// Parse an RFC 3339 timestamp out of a TEXT column.
fn parse_timestamp(s: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CatalogError::Database(format!("invalid timestamp: {s}")))
}

/// Wrap a transport-level sqlx failure.
fn db_err(e: sqlx::Error) -> CatalogError {
    CatalogError::Database(e.to_string())
}

/// Map constraint failures onto their typed catalog errors.
fn classify_write_error(
    e: sqlx::Error,
    slug: &str,
    category: Option<&CategoryId>,
) -> CatalogError {
    if let sqlx::Error::Database(db) = &e {
        match db.kind() {
            ErrorKind::UniqueViolation => {
                return CatalogError::UniquenessViolation {
                    slug: slug.to_string(),
                }
            }
            ErrorKind::ForeignKeyViolation => {
                let target = category.map(|c| c.to_string()).unwrap_or_default();
                return CatalogError::ReferenceIntegrity(target);
            }
            _ => {}
        }
    }
    db_err(e)
}
