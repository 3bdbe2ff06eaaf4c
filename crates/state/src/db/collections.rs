//! The five persisted collections.

use serde::Serialize;
use serde::de::DeserializeOwned;

use petshop_core::ExchangeRate;

use crate::models::{CartLine, Product, User, seed_catalog};

/// Store keys, fixed for compatibility with existing data.
pub mod keys {
    /// Registered users.
    pub const USERS: &str = "users";

    /// The logged-in user; absent when logged out.
    pub const LOGGED_IN_USER: &str = "loggedInUser";

    /// Product catalog.
    pub const PRODUCTS: &str = "products";

    /// Cart lines.
    pub const CART: &str = "cart";

    /// Dollar to bolívar exchange rate.
    pub const DOLLAR_RATE: &str = "dollarRate";
}

/// A logical collection persisted under one key.
pub trait Collection: Send + Sync + 'static {
    /// Store key.
    const KEY: &'static str;

    /// Human-readable name for advisory messages.
    const LABEL: &'static str;

    /// Whether the initial value is written back when the key is absent.
    const PERSIST_INITIAL: bool = true;

    /// In-memory shape of the whole collection.
    type Value: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Value used when nothing is stored yet.
    fn initial() -> Self::Value;

    /// Value shown when the store cannot be read at all.
    fn fallback() -> Self::Value {
        Self::initial()
    }
}

/// Registered users.
#[derive(Debug)]
pub enum Users {}

impl Collection for Users {
    const KEY: &'static str = keys::USERS;
    const LABEL: &'static str = "users";
    type Value = Vec<User>;

    fn initial() -> Self::Value {
        Vec::new()
    }
}

/// Persisted session. Absence is meaningful (logged out), so it is never
/// written back on load.
#[derive(Debug)]
pub enum Session {}

impl Collection for Session {
    const KEY: &'static str = keys::LOGGED_IN_USER;
    const LABEL: &'static str = "session";
    const PERSIST_INITIAL: bool = false;
    type Value = Option<User>;

    fn initial() -> Self::Value {
        None
    }
}

/// Product catalog, seeded on first run.
#[derive(Debug)]
pub enum Products {}

impl Collection for Products {
    const KEY: &'static str = keys::PRODUCTS;
    const LABEL: &'static str = "products";
    type Value = Vec<Product>;

    fn initial() -> Self::Value {
        seed_catalog()
    }

    /// An unreadable store shows an empty catalog, not the seed.
    fn fallback() -> Self::Value {
        Vec::new()
    }
}

/// Cart lines in display order.
#[derive(Debug)]
pub enum Cart {}

impl Collection for Cart {
    const KEY: &'static str = keys::CART;
    const LABEL: &'static str = "cart";
    type Value = Vec<CartLine>;

    fn initial() -> Self::Value {
        Vec::new()
    }
}

/// Exchange rate scalar.
#[derive(Debug)]
pub enum DollarRate {}

impl Collection for DollarRate {
    const KEY: &'static str = keys::DOLLAR_RATE;
    const LABEL: &'static str = "exchange rate";
    type Value = ExchangeRate;

    fn initial() -> Self::Value {
        ExchangeRate::default()
    }
}
