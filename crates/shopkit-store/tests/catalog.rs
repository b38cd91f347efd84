//! Integration tests against a real SQLite database.

use std::sync::Arc;

use shopkit_catalog::catalog::{CategoryUpdate, NewCategory, NewProduct, ProductUpdate};
use shopkit_catalog::slug::is_url_safe;
use shopkit_catalog::{CatalogError, CategoryId, Price};
use shopkit_store::prelude::*;
use tempfile::TempDir;

async fn test_store() -> (SqliteCatalog, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = StoreConfig::at(dir.path().join("catalog.db"));
    let store = SqliteCatalog::connect(config).await.expect("open store");
    (store, dir)
}

fn widget(category: &CategoryId) -> NewProduct {
    NewProduct::new(
        category.clone(),
        "Widget",
        "Acme",
        "products/products/2024/05/03/widget.png",
    )
}

#[tokio::test]
async fn test_breadcrumb_walks_ancestry() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    let phones = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();
    let android = store
        .create_category(
            NewCategory::new("Android")
                .slug("android")
                .parent(phones.id.clone()),
        )
        .await
        .unwrap();

    assert_eq!(
        store.category_path(&phones.id).await.unwrap(),
        "Electronics -> Phones"
    );
    assert_eq!(
        store.category_path(&android.id).await.unwrap(),
        "Electronics -> Phones -> Android"
    );
    assert_eq!(
        store.category_path(&electronics.id).await.unwrap(),
        "Electronics"
    );
}

#[tokio::test]
async fn test_root_categories_are_exactly_the_parentless() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    let books = store
        .create_category(NewCategory::new("Books").slug("books"))
        .await
        .unwrap();
    let phones = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();

    let roots = store.root_categories().await.unwrap();
    let ids: Vec<&str> = roots.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(roots.len(), 2);
    assert!(ids.contains(&electronics.id.as_str()));
    assert!(ids.contains(&books.id.as_str()));
    assert!(!ids.contains(&phones.id.as_str()));
    assert!(roots.iter().all(|c| c.is_root()));
}

#[tokio::test]
async fn test_duplicate_slug_under_same_parent_is_rejected() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    let phones = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();
    store
        .create_product(widget(&phones.id).price(Price::parse("19.99").unwrap()))
        .await
        .unwrap();

    let err = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UniquenessViolation { .. }));
}

#[tokio::test]
async fn test_same_slug_under_different_parents_is_allowed() {
    let (store, _dir) = test_store().await;

    let a = store
        .create_category(NewCategory::new("A").slug("a"))
        .await
        .unwrap();
    let b = store
        .create_category(NewCategory::new("B").slug("b"))
        .await
        .unwrap();

    store
        .create_category(NewCategory::new("Sale").slug("sale").parent(a.id.clone()))
        .await
        .unwrap();
    store
        .create_category(NewCategory::new("Sale").slug("sale").parent(b.id.clone()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_duplicate_root_slug_is_rejected() {
    let (store, _dir) = test_store().await;

    store
        .create_category(NewCategory::new("Sale").slug("sale"))
        .await
        .unwrap();
    let err = store
        .create_category(NewCategory::new("Sale Again").slug("sale"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UniquenessViolation { .. }));
}

#[tokio::test]
async fn test_generated_slug_is_nonempty_and_url_safe() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Home & Garden"))
        .await
        .unwrap();
    assert!(is_url_safe(&category.slug));
    assert!(category.slug.ends_with("home-garden"));

    // Hostile names still yield a usable slug from the random token.
    let odd = store.create_category(NewCategory::new("***!")).await.unwrap();
    assert!(is_url_safe(&odd.slug));
}

#[tokio::test]
async fn test_available_view_filters_on_flag() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Phones").slug("phones"))
        .await
        .unwrap();
    let shown = store.create_product(widget(&category.id)).await.unwrap();
    let hidden = store
        .create_product(
            NewProduct::new(category.id.clone(), "Gadget", "Acme", "g.png").available(false),
        )
        .await
        .unwrap();

    let store: Arc<dyn CatalogStore> = Arc::new(store);
    let view = AvailableProducts::new(store.clone());

    let listed = view.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, shown.id);

    // Flipping the flag moves products in and out of the view.
    store
        .update_product(&hidden.id, ProductUpdate::default().available(true))
        .await
        .unwrap();
    store
        .update_product(&shown.id, ProductUpdate::default().available(false))
        .await
        .unwrap();

    let listed = view.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, hidden.id);
}

#[tokio::test]
async fn test_available_view_scoped_to_category() {
    let (store, _dir) = test_store().await;

    let phones = store
        .create_category(NewCategory::new("Phones").slug("phones"))
        .await
        .unwrap();
    let books = store
        .create_category(NewCategory::new("Books").slug("books"))
        .await
        .unwrap();
    store.create_product(widget(&phones.id)).await.unwrap();
    store
        .create_product(NewProduct::new(books.id.clone(), "Novel", "Pub", "n.png"))
        .await
        .unwrap();

    let phones_id = phones.id.clone();
    let view = AvailableProducts::new(Arc::new(store));
    let scoped = view.in_category(&phones_id).await.unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].title, "Widget");
}

#[tokio::test]
async fn test_product_defaults() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Phones").slug("phones"))
        .await
        .unwrap();
    let product = store.create_product(widget(&category.id)).await.unwrap();

    assert_eq!(product.price, Price::default());
    assert_eq!(product.price.to_string(), "99.99");
    assert!(product.available);
    assert_eq!(product.slug, "widget");
    assert_eq!(product.canonical_url(), "/product/widget/");
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let (store, _dir) = test_store().await;

    let err = store
        .create_product(widget(&CategoryId::new("nope")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ReferenceIntegrity(_)));
}

#[tokio::test]
async fn test_update_refreshes_updated_at() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Phones").slug("phones"))
        .await
        .unwrap();
    let product = store.create_product(widget(&category.id)).await.unwrap();

    let renamed = store
        .update_product(&product.id, ProductUpdate::default().title("Widget v2"))
        .await
        .unwrap();
    assert_eq!(renamed.title, "Widget v2");
    assert!(renamed.updated_at >= product.updated_at);
    assert_eq!(renamed.created_at, product.created_at);

    // A second update advances the clock again, whatever the field.
    let flipped = store
        .update_product(&product.id, ProductUpdate::default().available(false))
        .await
        .unwrap();
    assert!(flipped.updated_at >= renamed.updated_at);
    assert!(!flipped.available);
}

#[tokio::test]
async fn test_update_product_round_trips_price() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Phones").slug("phones"))
        .await
        .unwrap();
    let product = store
        .create_product(widget(&category.id).price(Price::parse("19.99").unwrap()))
        .await
        .unwrap();
    assert_eq!(product.price.cents(), 1999);

    let updated = store
        .update_product(
            &product.id,
            ProductUpdate::default().price(Price::parse("99999.99").unwrap()),
        )
        .await
        .unwrap();
    assert_eq!(updated.price.cents(), 9_999_999);
}

#[tokio::test]
async fn test_update_product_rejects_unsafe_slug() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Phones").slug("phones"))
        .await
        .unwrap();
    let product = store.create_product(widget(&category.id)).await.unwrap();

    let err = store
        .update_product(&product.id, ProductUpdate::default().slug("Not Safe!"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));

    // The stored slug is untouched and still routable.
    let unchanged = store.product(&product.id).await.unwrap();
    assert_eq!(unchanged.slug, "widget");
    assert!(is_url_safe(&unchanged.slug));

    store
        .update_product(&product.id, ProductUpdate::default().slug("widget-v2"))
        .await
        .unwrap();
    assert_eq!(store.product(&product.id).await.unwrap().slug, "widget-v2");
}

#[tokio::test]
async fn test_delete_category_cascades() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    let phones = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();
    let product = store.create_product(widget(&phones.id)).await.unwrap();

    store.delete_category(&electronics.id).await.unwrap();

    assert!(matches!(
        store.category(&phones.id).await.unwrap_err(),
        CatalogError::CategoryNotFound(_)
    ));
    assert!(matches!(
        store.product(&product.id).await.unwrap_err(),
        CatalogError::ProductNotFound(_)
    ));
}

#[tokio::test]
async fn test_reparenting_into_own_subtree_is_rejected() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    let phones = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();

    // Self-parent.
    let err = store
        .update_category(
            &electronics.id,
            CategoryUpdate::default().parent(Some(electronics.id.clone())),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::HierarchyCycle(_)));

    // Descendant as parent.
    let err = store
        .update_category(
            &electronics.id,
            CategoryUpdate::default().parent(Some(phones.id.clone())),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::HierarchyCycle(_)));
}

#[tokio::test]
async fn test_reparenting_to_root_and_rename() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    let phones = store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();

    let updated = store
        .update_category(
            &phones.id,
            CategoryUpdate::default().name("Smartphones").parent(None),
        )
        .await
        .unwrap();
    assert!(updated.is_root());
    assert_eq!(updated.name, "Smartphones");
    assert_eq!(store.category_path(&phones.id).await.unwrap(), "Smartphones");
}

#[tokio::test]
async fn test_lookup_by_slug() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();
    store.create_product(widget(&electronics.id)).await.unwrap();

    let root = store.category_by_slug("electronics", None).await.unwrap();
    assert_eq!(root.id, electronics.id);

    let child = store
        .category_by_slug("phones", Some(&electronics.id))
        .await
        .unwrap();
    assert_eq!(child.name, "Phones");

    assert!(matches!(
        store.category_by_slug("phones", None).await.unwrap_err(),
        CatalogError::CategoryNotFound(_)
    ));

    let product = store.product_by_slug("widget").await.unwrap();
    assert_eq!(product.title, "Widget");
}

#[tokio::test]
async fn test_missing_lookups_are_not_found() {
    let (store, _dir) = test_store().await;

    assert!(matches!(
        store.category(&CategoryId::new("missing")).await.unwrap_err(),
        CatalogError::CategoryNotFound(_)
    ));
    assert!(matches!(
        store
            .product(&shopkit_catalog::ProductId::new("missing"))
            .await
            .unwrap_err(),
        CatalogError::ProductNotFound(_)
    ));
    assert!(matches!(
        store
            .delete_category(&CategoryId::new("missing"))
            .await
            .unwrap_err(),
        CatalogError::CategoryNotFound(_)
    ));
}

#[tokio::test]
async fn test_nav_context_serializes_under_categories_key() {
    let (store, _dir) = test_store().await;

    store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    store
        .create_category(NewCategory::new("Books").slug("books"))
        .await
        .unwrap();

    let nav = NavCategories::new(Arc::new(store));
    let context = nav.context().await.unwrap();
    assert_eq!(context.categories.len(), 2);

    let json = serde_json::to_value(&context).unwrap();
    assert_eq!(json["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_child_categories() {
    let (store, _dir) = test_store().await;

    let electronics = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    store
        .create_category(
            NewCategory::new("Phones")
                .slug("phones")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();
    store
        .create_category(
            NewCategory::new("Laptops")
                .slug("laptops")
                .parent(electronics.id.clone()),
        )
        .await
        .unwrap();

    let children = store.child_categories(&electronics.id).await.unwrap();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| c.parent == Some(electronics.id.clone())));
}

#[tokio::test]
async fn test_category_url_from_store() {
    let (store, _dir) = test_store().await;

    let category = store
        .create_category(NewCategory::new("Electronics").slug("electronics"))
        .await
        .unwrap();
    assert_eq!(category.canonical_url(), "/category/electronics/");
}
