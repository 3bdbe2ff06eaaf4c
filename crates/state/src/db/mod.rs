//! Entity repositories over the key-value store.
//!
//! # Key layout
//!
//! Each logical collection lives under exactly one store key and is read
//! and written whole:
//!
//! - `users` - ordered list of [`User`](crate::models::User)
//! - `loggedInUser` - the session's user, or absent when logged out
//! - `products` - ordered list of [`Product`](crate::models::Product)
//! - `cart` - ordered list of [`CartLine`](crate::models::CartLine)
//! - `dollarRate` - [`ExchangeRate`](petshop_core::ExchangeRate) as a decimal string
//!
//! # Concurrency
//!
//! [`Repository::transform`] runs load, mutate and replace while holding a
//! mutex shared by every clone of the repository, so two transforms on the
//! same key never lose each other's writes. A separate
//! [`load`](Repository::load) followed later by a
//! [`replace`](Repository::replace) of that snapshot is *not* protected:
//! last writer wins.

pub mod collections;

pub use collections::{Cart, Collection, DollarRate, Products, Session, Users, keys};

use std::marker::PhantomData;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::kv::{KeyValueStore, StoreError};

/// Errors that can occur in repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The stored value is not valid JSON for this collection.
    #[error("data corruption in '{key}': {detail}")]
    DataCorruption {
        /// Store key holding the bad value.
        key: &'static str,
        /// Decoder message.
        detail: String,
    },

    /// The in-memory value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RepositoryError {
    /// Whether this is a storage failure (as opposed to bad data).
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// A value loaded with I/O failures recovered to the collection default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered<T> {
    /// The loaded value, or the default after an I/O failure.
    pub value: T,
    /// Message for the user when the default was substituted.
    pub advisory: Option<String>,
}

/// Whole-collection accessor for one store key.
///
/// Cloning is cheap; clones share the store and the write lock.
pub struct Repository<C: Collection> {
    store: Arc<dyn KeyValueStore>,
    lock: Arc<Mutex<()>>,
    initial: C::Value,
    _collection: PhantomData<fn() -> C>,
}

impl<C: Collection> Clone for Repository<C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lock: Arc::clone(&self.lock),
            initial: self.initial.clone(),
            _collection: PhantomData,
        }
    }
}

impl<C: Collection> std::fmt::Debug for Repository<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("key", &C::KEY).finish()
    }
}

impl<C: Collection> Repository<C> {
    /// Create a repository using the collection's own initial value.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_initial(store, C::initial())
    }

    /// Create a repository that substitutes `initial` when the key is absent.
    #[must_use]
    pub fn with_initial(store: Arc<dyn KeyValueStore>, initial: C::Value) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
            initial,
            _collection: PhantomData,
        }
    }

    /// Store key this repository owns.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        C::KEY
    }

    /// Read the collection.
    ///
    /// When the key is absent the initial value is returned and, for
    /// collections that persist it, written back so later loads see the same
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the store fails and
    /// `RepositoryError::DataCorruption` if the stored value does not decode.
    pub async fn load(&self) -> RepositoryResult<C::Value> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    /// Like [`load`](Self::load), but an I/O failure yields
    /// [`Collection::fallback`] plus an advisory message instead of an error.
    ///
    /// # Errors
    ///
    /// Corrupt data is still returned as `RepositoryError::DataCorruption`.
    pub async fn load_or_default(&self) -> RepositoryResult<Recovered<C::Value>> {
        match self.load().await {
            Ok(value) => Ok(Recovered {
                value,
                advisory: None,
            }),
            Err(RepositoryError::Store(e)) => {
                tracing::warn!(key = C::KEY, error = %e, "Load failed, using default");
                Ok(Recovered {
                    value: C::fallback(),
                    advisory: Some(format!("Could not load saved {}.", C::LABEL)),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the stored collection with `value`.
    ///
    /// Unconditional: a value derived from an older [`load`](Self::load)
    /// silently discards anything written since. Prefer
    /// [`transform`](Self::transform) for read-modify-write.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store write fails.
    pub async fn replace(&self, value: &C::Value) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;
        self.write_locked(value).await
    }

    /// Delete the stored value. The next load sees the key as absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the store fails.
    pub async fn clear(&self) -> RepositoryResult<()> {
        let _guard = self.lock.lock().await;
        self.store.remove(C::KEY).await?;
        tracing::debug!(key = C::KEY, "Cleared collection");
        Ok(())
    }

    /// Load, apply `f`, and write the result back as one unit.
    ///
    /// No other operation on this repository (or its clones) interleaves.
    /// If `f` returns an error nothing is written and the error is passed
    /// through.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a converted `RepositoryError` if the
    /// load or the write fails.
    pub async fn transform<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut C::Value) -> Result<R, E> + Send,
        E: From<RepositoryError>,
    {
        let _guard = self.lock.lock().await;
        let mut value = self.load_locked().await?;
        let result = f(&mut value)?;
        self.write_locked(&value).await?;
        Ok(result)
    }

    async fn load_locked(&self) -> RepositoryResult<C::Value> {
        let Some(raw) = self.store.get(C::KEY).await? else {
            let value = self.initial.clone();
            if C::PERSIST_INITIAL {
                self.write_locked(&value).await?;
                tracing::debug!(key = C::KEY, "Seeded absent collection");
            }
            return Ok(value);
        };

        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(key = C::KEY, error = %e, "Stored value does not decode");
            RepositoryError::DataCorruption {
                key: C::KEY,
                detail: e.to_string(),
            }
        })
    }

    async fn write_locked(&self, value: &C::Value) -> RepositoryResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(C::KEY, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use petshop_core::ExchangeRate;

    use super::*;
    use crate::kv::MemoryStore;
    use crate::kv::testing::FailingStore;
    use crate::models::{CartLine, seed_catalog};

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_absent_products_are_seeded_and_persisted() {
        let store = memory();
        let products = Repository::<Products>::new(Arc::clone(&store));

        let first = products.load().await.unwrap();
        assert_eq!(first, seed_catalog());
        assert!(store.get(keys::PRODUCTS).await.unwrap().is_some());
        assert_eq!(products.load().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_absent_session_is_not_written() {
        let store = memory();
        let session = Repository::<Session>::new(Arc::clone(&store));
        assert_eq!(session.load().await.unwrap(), None);
        assert_eq!(store.get(keys::LOGGED_IN_USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rate_defaults_to_one() {
        let rate = Repository::<DollarRate>::new(memory());
        assert_eq!(rate.load().await.unwrap(), ExchangeRate::default());
    }

    #[tokio::test]
    async fn test_replace_then_load_roundtrip() {
        let products = Repository::<Products>::new(memory());
        let mut list = seed_catalog();
        list.reverse();
        products.replace(&list).await.unwrap();
        assert_eq!(products.load().await.unwrap(), list);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_an_error_not_a_default() {
        let store = memory();
        store.set(keys::CART, "{not json").await.unwrap();
        let cart = Repository::<Cart>::new(Arc::clone(&store));

        let err = cart.load().await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::DataCorruption { key: "cart", .. }
        ));
        // The bad value is left in place for inspection
        assert_eq!(
            store.get(keys::CART).await.unwrap().as_deref(),
            Some("{not json")
        );
        assert!(cart.load_or_default().await.is_err());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corruption() {
        let store = memory();
        store.set(keys::DOLLAR_RATE, "\"abc\"").await.unwrap();
        let rate = Repository::<DollarRate>::new(store);
        assert!(matches!(
            rate.load().await,
            Err(RepositoryError::DataCorruption { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_or_default_recovers_io_failure() {
        let cart = Repository::<Cart>::new(Arc::new(FailingStore));
        let recovered = cart.load_or_default().await.unwrap();
        assert!(recovered.value.is_empty());
        assert!(recovered.advisory.is_some());
    }

    #[tokio::test]
    async fn test_unreadable_catalog_falls_back_to_empty() {
        let products = Repository::<Products>::new(Arc::new(FailingStore));
        let recovered = products.load_or_default().await.unwrap();
        assert!(recovered.value.is_empty());
        assert_eq!(recovered.advisory.as_deref(), Some("Could not load saved products."));

        let rate = Repository::<DollarRate>::new(Arc::new(FailingStore));
        assert_eq!(rate.load_or_default().await.unwrap().value, ExchangeRate::default());
    }

    #[tokio::test]
    async fn test_transform_error_writes_nothing() {
        let store = memory();
        let cart = Repository::<Cart>::new(Arc::clone(&store));
        cart.replace(&Vec::new()).await.unwrap();

        let result: Result<(), RepositoryError> = cart
            .transform(|lines| {
                lines.push(CartLine::from(&seed_catalog()[0]));
                Err(RepositoryError::DataCorruption {
                    key: "cart",
                    detail: "abort".to_owned(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(cart.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_transforms_do_not_lose_updates() {
        let cart = Repository::<Cart>::new(memory());
        let line = CartLine::from(&seed_catalog()[0]);

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let cart = cart.clone();
            let line = line.clone();
            tasks.push(tokio::spawn(async move {
                cart.transform(|lines| {
                    lines.push(line);
                    Ok::<_, RepositoryError>(())
                })
                .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(cart.load().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let store = memory();
        let users = Repository::<Users>::new(Arc::clone(&store));
        users.load().await.unwrap();
        assert!(store.get(keys::USERS).await.unwrap().is_some());
        users.clear().await.unwrap();
        assert_eq!(store.get(keys::USERS).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_with_initial_overrides_seed() {
        let products = Repository::<Products>::with_initial(memory(), Vec::new());
        assert!(products.load().await.unwrap().is_empty());
    }
}
