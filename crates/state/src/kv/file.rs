//! File-backed key-value store.
//!
//! Each key maps to `<dir>/<key>.json`. Writes land in a temporary sibling
//! first, are synced, and are then renamed over the target, so readers only
//! ever observe a complete old value or a complete new value. Every write
//! gets its own temporary file, so concurrent writers of one key never
//! share one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{KeyValueStore, StoreError, StoreResult, validate_key};

const VALUE_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// Sequence for temporary file names, unique within the process.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Durable store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            StoreError::Unavailable(format!("cannot create {}: {e}", root.display()))
        })?;
        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Directory holding the value files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.root.join(key).with_extension(VALUE_EXTENSION)
    }

    /// `<key>.<pid>.<seq>.tmp`; the pid keeps two processes sharing a
    /// directory apart.
    fn temp_path(&self, key: &str) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let pid = std::process::id();
        self.root.join(format!("{key}.{pid}.{seq}.{TEMP_EXTENSION}"))
    }
}

async fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(value.as_bytes()).await?;
    file.sync_all().await
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        match tokio::fs::read_to_string(self.value_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        let tmp = self.temp_path(key);
        let written = match write_synced(&tmp, value).await {
            Ok(()) => tokio::fs::rename(&tmp, self.value_path(key)).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            match tokio::fs::remove_file(&tmp).await {
                Err(cleanup) if cleanup.kind() != ErrorKind::NotFound => {
                    tracing::warn!(path = %tmp.display(), error = %cleanup, "Could not remove temp file");
                }
                _ => {}
            }
            return Err(StoreError::io(key, e));
        }
        tracing::debug!(key, bytes = value.len(), "Wrote value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.value_path(key)).await {
            Ok(()) => {
                tracing::debug!(key, "Removed value");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn temp_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == TEMP_EXTENSION))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        store.set("dollarRate", "\"36.50\"").await.unwrap();
        assert_eq!(
            store.get("dollarRate").await.unwrap().as_deref(),
            Some("\"36.50\"")
        );

        store.set("dollarRate", "\"40\"").await.unwrap();
        assert_eq!(store.get("dollarRate").await.unwrap().as_deref(), Some("\"40\""));

        store.remove("dollarRate").await.unwrap();
        assert_eq!(store.get("dollarRate").await.unwrap(), None);
        // Removing again is fine
        store.remove("dollarRate").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).await.unwrap();
            store.set("users", "[]").await.unwrap();
        }
        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.get("users").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("products", "[]").await.unwrap();
        assert!(dir.path().join("products.json").exists());
        assert!(temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_sets_on_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).await.unwrap());

        for round in 0..10 {
            let mut tasks = Vec::new();
            for writer in 0..8 {
                let store = Arc::clone(&store);
                tasks.push(tokio::spawn(async move {
                    store.set("cart", &format!("[{round},{writer}]")).await
                }));
            }
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let value = store.get("cart").await.unwrap().unwrap();
            assert!(value.starts_with(&format!("[{round},")), "torn value {value}");
        }
        assert!(temp_files(dir.path()).is_empty());
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let store = FileStore {
            root: PathBuf::from("/data"),
        };
        let a = store.temp_path("cart");
        let b = store.temp_path("cart");
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(Path::new("/data")));
        assert_eq!(a.extension().unwrap(), TEMP_EXTENSION);
        assert_ne!(a, store.value_path("cart"));
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.set("../escape", "1").await,
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).await.unwrap();
        assert_eq!(store.root(), nested.as_path());
        assert!(nested.is_dir());
    }
}
