//! Catalog commands.
//!
//! All of these sit behind the authenticated screens, so they require a
//! logged-in user.

use petshop_core::{CategoryFilter, ProductId};
use petshop_state::models::{Product, ProductDraft, ProductValidationError};
use petshop_state::search::filter_products;
use petshop_state::services::CatalogError;
use petshop_state::state::AppState;
use petshop_state::{Error, Result};

/// List products matching `category` (`dog`, `cat` or `all`) and `search`.
pub async fn list(state: &AppState, category: &str, search: &str) -> Result<()> {
    state.session().require_user()?;
    let filter: CategoryFilter = category.parse().map_err(|e| {
        Error::from(CatalogError::Validation(ProductValidationError::InvalidCategory(e)))
    })?;

    let browsed = state.catalog().browse().await?;
    if let Some(advisory) = &browsed.advisory {
        tracing::warn!("{advisory}");
    }
    let all = browsed.value;
    let shown = filter_products(&all, filter, search);
    if shown.is_empty() {
        tracing::info!("No products found.");
        return Ok(());
    }

    for product in &shown {
        log_product(product);
    }
    tracing::info!("{} of {} products", shown.len(), all.len());
    Ok(())
}

pub async fn add(state: &AppState, name: &str, category: &str, price: &str) -> Result<()> {
    state.session().require_user()?;
    let product = state
        .catalog()
        .create(&ProductDraft::new(name, category, price))
        .await?;
    tracing::info!("Added product:");
    log_product(&product);
    Ok(())
}

pub async fn update(
    state: &AppState,
    id: &str,
    name: &str,
    category: &str,
    price: &str,
) -> Result<()> {
    state.session().require_user()?;
    let product = state
        .catalog()
        .update(&ProductId::new(id), &ProductDraft::new(name, category, price))
        .await?;
    tracing::info!("Updated product:");
    log_product(&product);
    Ok(())
}

pub async fn delete(state: &AppState, id: &str) -> Result<()> {
    state.session().require_user()?;
    let removed = state.catalog().delete(&ProductId::new(id)).await?;
    tracing::info!("Deleted {}.", removed.name);
    Ok(())
}

fn log_product(product: &Product) {
    tracing::info!(
        "  [{}] {} ({}) ${} {}",
        product.id,
        product.name,
        product.category,
        product.price,
        product.image
    );
}
