//! Persistent key-value store.
//!
//! The durable foundation every repository is built on. Values are opaque
//! strings; callers encode and decode their own JSON. There is no key
//! enumeration and no multi-key atomicity.
//!
//! # Implementations
//!
//! - [`FileStore`] - one file per key under a data directory
//! - [`MemoryStore`] - in-process map, for tests and throwaway sessions

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`KeyValueStore`].
///
/// A missing key is not an error; `get` returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage failed.
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The key contains characters the store cannot represent.
    #[error("invalid key '{0}': only ASCII letters, digits, '_' and '-' are allowed")]
    InvalidKey(String),

    /// The store cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_owned(),
            source,
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// String-keyed durable storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Check that `key` is safe to use as a file stem.
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
