//! Account and session commands.

use petshop_state::Result;
use petshop_state::state::AppState;

/// Register a new account. Does not log in.
pub async fn register(state: &AppState, name: &str, email: &str, password: &str) -> Result<()> {
    let user = state.auth().register(name, email, password).await?;
    tracing::info!("Registered {} <{}>. You can now log in.", user.name, user.email);
    Ok(())
}

pub async fn login(state: &AppState, email: &str, password: &str) -> Result<()> {
    let user = state.auth().sign_in(email, password).await?;
    tracing::info!("Welcome, {}!", user.name);
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<()> {
    state.auth().sign_out().await?;
    tracing::info!("Logged out.");
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<()> {
    let user = state.session().require_user()?;
    tracing::info!("{} <{}>", user.name, user.email);
    Ok(())
}
