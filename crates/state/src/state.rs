//! Application state shared across screens.

use std::sync::Arc;

use crate::config::StateConfig;
use crate::db::{Cart, DollarRate, Products, Repository, Session, Users};
use crate::kv::{FileStore, KeyValueStore, StoreError};
use crate::services::{AuthService, CartService, CatalogService, SessionManager};

/// Application state shared by every screen.
///
/// This struct is cheaply cloneable via `Arc` and is the explicit context
/// that replaces a process-wide session singleton.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StateConfig,
    store: Arc<dyn KeyValueStore>,
    users: Repository<Users>,
    products: Repository<Products>,
    cart: Repository<Cart>,
    rate: Repository<DollarRate>,
    session: SessionManager,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session.state())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the state over an existing store.
    ///
    /// The session starts out `Initializing`; call
    /// [`initialize_session`](Self::initialize_session) or
    /// [`spawn_session_init`](Self::spawn_session_init) to resolve it.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, config: StateConfig) -> Self {
        let products = if config.seed_catalog {
            Repository::new(Arc::clone(&store))
        } else {
            Repository::with_initial(Arc::clone(&store), Vec::new())
        };
        let session = SessionManager::new(Repository::<Session>::new(Arc::clone(&store)));

        Self {
            inner: Arc::new(AppStateInner {
                users: Repository::new(Arc::clone(&store)),
                products,
                cart: Repository::new(Arc::clone(&store)),
                rate: Repository::new(Arc::clone(&store)),
                session,
                store,
                config,
            }),
        }
    }

    /// Open the file store under `config.data_dir` and build the state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the data directory cannot be
    /// created.
    pub async fn open(config: StateConfig) -> Result<Self, StoreError> {
        let store = FileStore::open(&config.data_dir).await?;
        tracing::info!(data_dir = %config.data_dir.display(), "Opened data directory");
        Ok(Self::new(Arc::new(store), config))
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StateConfig {
        &self.inner.config
    }

    /// The raw key-value store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn users(&self) -> &Repository<Users> {
        &self.inner.users
    }

    #[must_use]
    pub fn products(&self) -> &Repository<Products> {
        &self.inner.products
    }

    #[must_use]
    pub fn cart(&self) -> &Repository<Cart> {
        &self.inner.cart
    }

    #[must_use]
    pub fn dollar_rate(&self) -> &Repository<DollarRate> {
        &self.inner.rate
    }

    /// The session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// Load the stored session and wait for the result.
    pub async fn initialize_session(&self) {
        self.inner.session.initialize().await;
    }

    /// Load the stored session in the background.
    ///
    /// Subscribers of [`SessionManager::subscribe`] are notified when it
    /// resolves.
    pub fn spawn_session_init(&self) -> tokio::task::JoinHandle<()> {
        let session = self.inner.session.clone();
        tokio::spawn(async move { session.initialize().await })
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.users, &self.inner.session)
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(&self.inner.products, &self.inner.rate)
    }

    #[must_use]
    pub fn cart_service(&self) -> CartService<'_> {
        CartService::new(&self.inner.cart, &self.inner.rate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::services::Screen;

    fn memory_state(config: StateConfig) -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), config)
    }

    #[tokio::test]
    async fn test_seeding_follows_config() {
        let seeded = memory_state(StateConfig::default());
        assert_eq!(seeded.catalog().products().await.unwrap().len(), 2);

        let empty = memory_state(StateConfig {
            seed_catalog: false,
            ..StateConfig::default()
        });
        assert!(empty.catalog().products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_init_notifies_subscribers() {
        let state = memory_state(StateConfig::default());
        let mut rx = state.session().subscribe();
        assert_eq!(state.session().screen(), Screen::Loading);

        state.spawn_session_init().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().screen(), Screen::Unauthenticated);
    }

    #[tokio::test]
    async fn test_clones_share_session() {
        let state = memory_state(StateConfig::default());
        state.initialize_session().await;
        let other = state.clone();

        state.auth().register("A", "a@x.com", "pw").await.unwrap();
        other.auth().sign_in("A@x.com", "pw").await.unwrap();
        assert_eq!(state.session().screen(), Screen::Authenticated);
    }

    #[tokio::test]
    async fn test_open_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StateConfig::default().with_data_dir(dir.path().join("nested"));
        let state = AppState::open(config).await.unwrap();
        state.cart_service().add(&crate::models::seed_catalog()[0]).await.unwrap();
        assert!(dir.path().join("nested").join("cart.json").exists());
    }
}
