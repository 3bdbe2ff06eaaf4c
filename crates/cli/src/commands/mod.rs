//! Subcommand implementations.
//!
//! Every command reports through `tracing::info!` and returns
//! [`petshop_state::Error`] so `main` can show the user-facing message.

pub mod account;
pub mod cart;
pub mod products;
pub mod rate;
