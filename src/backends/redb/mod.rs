//! Redb storage backend.
//!
//! This module provides a store implementation over Redb, a pure-Rust
//! embedded database. Redb owns all on-disk concerns (file format,
//! durability, compaction); this layer only maps the store contract onto
//! its transactions.
//!
//! # Example
//!
//! ```ignore
//! use statekv::backends::RedbStore;
//! use statekv::Store;
//!
//! // Open a store directory (creates it if it doesn't exist)
//! let store = RedbStore::open("/var/lib/connector/state")?;
//!
//! store.put(b"user:1", b"alice")?;
//! assert_eq!(store.get(b"user:1")?, b"alice");
//!
//! store.close()?;
//! ```
//!
//! # In-Memory Stores
//!
//! For testing, you can create a store that doesn't persist:
//!
//! ```ignore
//! let store = RedbStore::in_memory()?;
//! ```
//!
//! # Configuration
//!
//! Use `RedbConfig` to customize the engine:
//!
//! ```ignore
//! use statekv::backends::redb::{RedbConfig, RedbStore};
//!
//! let config = RedbConfig::new().cache_size(100 * 1024 * 1024);
//! let store = RedbStore::open_with_config("/var/lib/connector/state", config)?;
//! ```

mod cursor;
mod store;

pub use cursor::RedbCursor;
pub use store::{RedbConfig, RedbStore};
