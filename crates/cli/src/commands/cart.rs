//! Cart commands.

use petshop_core::ProductId;
use petshop_state::Result;
use petshop_state::state::AppState;

pub async fn show(state: &AppState) -> Result<()> {
    state.session().require_user()?;
    let summary = state.cart_service().summary().await?;
    if let Some(advisory) = &summary.advisory {
        tracing::warn!("{advisory}");
    }
    if summary.lines.is_empty() {
        tracing::info!("Your cart is empty.");
        return Ok(());
    }

    for (index, line) in summary.lines.iter().enumerate() {
        tracing::info!("  {index}: {} ${} (product {})", line.name, line.price, line.id);
    }
    tracing::info!("Subtotal: {}", summary.totals.subtotal_display());
    tracing::info!("Rate:     {}", summary.rate);
    tracing::info!("Total:    {}", summary.totals.total_display());
    Ok(())
}

/// Add product `id` to the cart.
pub async fn add(state: &AppState, id: &str) -> Result<()> {
    state.session().require_user()?;
    let product = state.catalog().product(&ProductId::new(id)).await?;
    state.cart_service().add(&product).await?;
    tracing::info!("{} added to cart.", product.name);
    Ok(())
}

/// Remove the line at `index`.
pub async fn remove(state: &AppState, index: usize) -> Result<()> {
    state.session().require_user()?;
    let removed = state.cart_service().remove_at(index).await?;
    tracing::info!("Removed {} from cart.", removed.name);
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<()> {
    state.session().require_user()?;
    state.cart_service().clear().await?;
    tracing::info!("Cart cleared.");
    Ok(())
}
