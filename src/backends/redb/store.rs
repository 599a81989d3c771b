//! Redb-backed store implementation.
//!
//! This module provides the [`RedbStore`] type which implements the
//! [`Store`] trait using the Redb embedded database.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use redb::{Database, ReadableTable, TableDefinition, TableError};
use tracing::{info, warn};

use crate::store::{KeyRange, Store, StoreError, StoreResult};

use super::cursor::RedbCursor;

/// The engine file created inside the store directory.
const DB_FILENAME: &str = "statekv.redb";

/// The single physical table holding the flat key space.
pub(crate) const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> =
    TableDefinition::new("statekv_data");

/// Configuration options for the Redb store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Engine cache size in bytes. If not set, uses Redb's default.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// A durable ordered key-value store backed by Redb.
///
/// The store owns the engine handle for the directory it was opened at;
/// exactly one `RedbStore` should hold a given path at a time (the engine
/// file lock enforces this against other processes). [`Store::close`]
/// releases the handle; later operations observe [`StoreError::Closed`]
/// instead of panicking.
///
/// # Example
///
/// ```ignore
/// use statekv::backends::RedbStore;
/// use statekv::Store;
///
/// let store = RedbStore::open("state_dir")?;
/// store.put(b"user:1", b"alice")?;
/// let value = store.get(b"user:1")?;
/// ```
pub struct RedbStore {
    /// The store directory, kept for operation diagnostics.
    path: PathBuf,
    /// The engine handle; `None` once closed.
    db: RwLock<Option<Database>>,
}

impl RedbStore {
    /// Open or create a store in the given directory with default
    /// configuration.
    ///
    /// The directory is created if absent; the engine file lives inside
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the directory cannot be created or
    /// the engine cannot open its file there (permissions, corruption, or
    /// a lock held by another process).
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a store in the given directory with custom
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the directory cannot be created or
    /// the engine cannot open its file there.
    pub fn open_with_config(path: impl AsRef<Path>, config: RedbConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path).map_err(|e| StoreError::open(&path, e))?;

        let mut builder = Database::builder();
        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db =
            builder.create(path.join(DB_FILENAME)).map_err(|e| StoreError::open(&path, e))?;

        info!(path = %path.display(), "opened store");
        Ok(Self { path, db: RwLock::new(Some(db)) })
    }

    /// Create an in-memory store for testing.
    ///
    /// The data is lost when the store is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the engine cannot be created.
    pub fn in_memory() -> StoreResult<Self> {
        let path = PathBuf::from("<memory>");
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StoreError::open(&path, e))?;

        Ok(Self { path, db: RwLock::new(Some(db)) })
    }

    /// The directory this store was opened at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // A poisoned guard only means another caller panicked mid-operation;
    // the engine handle itself stays consistent, so recover the guard.
    fn handle(&self) -> RwLockReadGuard<'_, Option<Database>> {
        self.db.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle_mut(&self) -> RwLockWriteGuard<'_, Option<Database>> {
        self.db.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a failed point operation and build the error for the caller.
    /// Key absence never comes through here; it is an expected outcome,
    /// not a failure.
    fn fail(&self, op: &'static str, key: &[u8], cause: impl std::fmt::Display) -> StoreError {
        let err = StoreError::io(op, key, cause);
        warn!(path = %self.path.display(), error = %err, "store operation failed");
        err
    }

    fn make_cursor(&self, bounds: KeyRange) -> StoreResult<RedbCursor<'_>> {
        let guard = self.handle();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;
        let tx = db.begin_read().map_err(|e| self.fail("cursor", &[], e))?;
        Ok(RedbCursor::new(tx, bounds))
    }
}

impl Store for RedbStore {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let guard = self.handle();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let tx = db.begin_write().map_err(|e| self.fail("put", key, e))?;
        {
            let mut table = tx.open_table(DATA_TABLE).map_err(|e| self.fail("put", key, e))?;
            table.insert(key, value).map_err(|e| self.fail("put", key, e))?;
        }
        tx.commit().map_err(|e| self.fail("put", key, e))
    }

    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        let guard = self.handle();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let tx = db.begin_read().map_err(|e| self.fail("get", key, e))?;
        let table = match tx.open_table(DATA_TABLE) {
            Ok(t) => t,
            // No data table means nothing was ever written.
            Err(TableError::TableDoesNotExist(_)) => return Err(StoreError::NotFound),
            Err(e) => return Err(self.fail("get", key, e)),
        };
        match table.get(key) {
            Ok(Some(value)) => Ok(value.value().to_vec()),
            Ok(None) => Err(StoreError::NotFound),
            Err(e) => Err(self.fail("get", key, e)),
        }
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let guard = self.handle();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let tx = db.begin_write().map_err(|e| self.fail("delete", key, e))?;
        {
            let mut table =
                tx.open_table(DATA_TABLE).map_err(|e| self.fail("delete", key, e))?;
            // Removing an absent key yields None; deleting is idempotent.
            table.remove(key).map_err(|e| self.fail("delete", key, e))?;
        }
        tx.commit().map_err(|e| self.fail("delete", key, e))
    }

    fn cursor(&self) -> StoreResult<Self::Cursor<'_>> {
        self.make_cursor(KeyRange::unbounded())
    }

    fn range(&self, start: &[u8], end: &[u8]) -> StoreResult<Self::Cursor<'_>> {
        self.make_cursor(KeyRange::new(start, end)?)
    }

    fn close(&self) -> StoreResult<()> {
        let mut guard = self.handle_mut();
        if let Some(db) = guard.take() {
            // Dropping the handle flushes and releases the engine; commits
            // were already durable, so this cannot lose acknowledged writes.
            drop(db);
            info!(path = %self.path.display(), "closed store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_creation() {
        let store = RedbStore::in_memory().expect("failed to create in-memory store");
        store.put(b"key", b"value").expect("failed to put");
        assert_eq!(store.get(b"key").expect("failed to get"), b"value");
    }

    #[test]
    fn config_builder() {
        let config = RedbConfig::new().cache_size(10 * 1024 * 1024);
        assert_eq!(config.cache_size, Some(10 * 1024 * 1024));
        assert_eq!(RedbConfig::new().cache_size, None);
    }

    #[test]
    fn operations_after_close_fail_closed() {
        let store = RedbStore::in_memory().expect("failed to create in-memory store");
        store.put(b"key", b"value").expect("failed to put");
        store.close().expect("failed to close");

        assert!(store.get(b"key").unwrap_err().is_closed());
        assert!(store.put(b"key", b"other").unwrap_err().is_closed());
        assert!(store.delete(b"key").unwrap_err().is_closed());
        assert!(store.cursor().err().is_some_and(|e| e.is_closed()));

        // Closing again is a no-op.
        store.close().expect("second close should be a no-op");
    }
}
