//! Integration tests for the Petshop state layer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p petshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `persistence` - Repositories over a real `FileStore`, including reopen
//! - `session` - Session lifecycle and startup recovery
//! - `shopping` - Catalog queries, cart and totals end to end
//!
//! Every test gets its own temporary data directory from [`TestContext`].

use std::path::Path;
use std::sync::Arc;

use petshop_state::config::StateConfig;
use petshop_state::kv::{FileStore, KeyValueStore};
use petshop_state::state::AppState;
use tempfile::TempDir;

/// A data directory that lives as long as the test.
pub struct TestContext {
    dir: TempDir,
}

impl TestContext {
    /// Create a fresh, empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Path of the data directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration rooted at this directory.
    #[must_use]
    pub fn config(&self) -> StateConfig {
        StateConfig::default().with_data_dir(self.dir.path())
    }

    /// A raw store over this directory, as a second process would see it.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[allow(clippy::expect_used)]
    pub async fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(
            FileStore::open(self.dir.path())
                .await
                .expect("Failed to open store"),
        )
    }

    /// Open the app state over this directory with the session resolved,
    /// as on a fresh app start.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[allow(clippy::expect_used)]
    pub async fn start(&self) -> AppState {
        let state = AppState::open(self.config())
            .await
            .expect("Failed to open app state");
        state.initialize_session().await;
        state
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
