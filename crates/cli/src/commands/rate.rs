//! Exchange rate commands.

use petshop_state::Result;
use petshop_state::state::AppState;

pub async fn show(state: &AppState) -> Result<()> {
    state.session().require_user()?;
    let recovered = state.catalog().exchange_rate_or_default().await?;
    if let Some(advisory) = &recovered.advisory {
        tracing::warn!("{advisory}");
    }
    let rate = recovered.value;
    tracing::info!("1 USD = {rate} Bs.");
    Ok(())
}

pub async fn set(state: &AppState, input: &str) -> Result<()> {
    state.session().require_user()?;
    let rate = state.catalog().set_exchange_rate(input).await?;
    tracing::info!("Exchange rate set: 1 USD = {rate} Bs.");
    Ok(())
}
