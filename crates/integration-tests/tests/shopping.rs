//! Catalog queries, cart and totals end to end.

#![allow(clippy::unwrap_used)]

use petshop_core::{Category, CategoryFilter, ProductId};
use petshop_integration_tests::TestContext;
use petshop_state::models::{Product, ProductDraft};
use petshop_state::search::{CatalogQuery, filter_products};
use petshop_state::services::{CartError, CatalogError};

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_filter_composition_over_stored_catalog() {
    let ctx = TestContext::new();
    let state = ctx.start().await;
    let catalog = state.catalog();
    state.products().replace(&Vec::new()).await.unwrap();
    for (name, category) in [("Dog Chow", "dog"), ("Cat Toy", "cat"), ("Dog Treats", "dog")] {
        catalog
            .create(&ProductDraft::new(name, category, "1"))
            .await
            .unwrap();
    }

    let all = catalog.products().await.unwrap();
    let result = filter_products(&all, CategoryFilter::Only(Category::Dog), "chow");
    assert_eq!(names(&result), ["Dog Chow"]);
}

#[tokio::test]
async fn test_category_toggle_returns_everything() {
    let ctx = TestContext::new();
    let all = ctx.start().await.catalog().products().await.unwrap();

    let mut query = CatalogQuery::new();
    query.select_category(Category::Dog);
    assert_eq!(query.select_category(Category::Dog), CategoryFilter::All);
    assert_eq!(query.apply(&all), all);
    assert_eq!(filter_products(&all, CategoryFilter::All, ""), all);
}

#[tokio::test]
async fn test_cart_totals_with_rate() {
    let ctx = TestContext::new();
    let state = ctx.start().await;
    state.catalog().set_exchange_rate("36.5").await.unwrap();

    for id in ["1", "2"] {
        let product = state.catalog().product(&ProductId::new(id)).await.unwrap();
        state.cart_service().add(&product).await.unwrap();
    }

    let totals = state.cart_service().totals().await.unwrap();
    assert_eq!(totals.subtotal_display(), "$20.00");
    assert_eq!(totals.total_display(), "730.00 Bs.");
}

#[tokio::test]
async fn test_positional_removal() {
    let ctx = TestContext::new();
    let state = ctx.start().await;
    let cart = state.cart_service();
    let one = state.catalog().product(&ProductId::new("1")).await.unwrap();
    let two = state.catalog().product(&ProductId::new("2")).await.unwrap();
    cart.add(&one).await.unwrap();
    cart.add(&two).await.unwrap();
    cart.add(&two).await.unwrap();

    cart.remove_at(1).await.unwrap();
    let ids: Vec<String> = cart
        .lines()
        .await
        .unwrap()
        .iter()
        .map(|l| l.id.to_string())
        .collect();
    assert_eq!(ids, ["1", "2"]);

    assert!(matches!(
        cart.remove_at(2).await,
        Err(CartError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[tokio::test]
async fn test_cart_keeps_snapshot_after_product_edit() {
    let ctx = TestContext::new();
    let state = ctx.start().await;
    let id = ProductId::new("1");
    let product = state.catalog().product(&id).await.unwrap();
    state.cart_service().add(&product).await.unwrap();

    state
        .catalog()
        .update(&id, &ProductDraft::new("Dog Chow - 10Kg", "dog", "40"))
        .await
        .unwrap();
    state.catalog().delete(&id).await.unwrap();

    let lines = state.cart_service().lines().await.unwrap();
    assert_eq!(lines[0].name, "Dog Chow - 3Kg");
    assert_eq!(lines[0].price.to_string(), "15.00");
}

#[tokio::test]
async fn test_invalid_product_is_rejected_before_write() {
    let ctx = TestContext::new();
    let state = ctx.start().await;
    state.catalog().products().await.unwrap();
    let before = std::fs::read_to_string(ctx.path().join("products.json")).unwrap();

    for draft in [
        ProductDraft::new("", "dog", "1"),
        ProductDraft::new("Parrot", "bird", "1"),
        ProductDraft::new("Bone", "dog", "cheap"),
        ProductDraft::new("Bone", "dog", "-1"),
    ] {
        assert!(matches!(
            state.catalog().create(&draft).await,
            Err(CatalogError::Validation(_))
        ));
    }

    let after = std::fs::read_to_string(ctx.path().join("products.json")).unwrap();
    assert_eq!(before, after);
}
