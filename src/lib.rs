//! `statekv`
//!
//! Durable, ordered key-value storage for connector state.
//!
//! # Overview
//!
//! A connector process needs to persist small pieces of state — tracked
//! cursors, cached records — across restarts. This crate provides that as a
//! storage abstraction: a [`Store`] trait over an embedded ordered persistent
//! engine, and a [`Cursor`] protocol for traversing and range-scanning the
//! key space. Backends implement the traits, so alternate engines can be
//! substituted without touching callers.
//!
//! # Core Traits
//!
//! - [`Store`] - Point access to the key space plus cursor construction
//! - [`Cursor`] - Ordered bidirectional iteration with seek and half-open
//!   range bounds
//!
//! # Error Handling
//!
//! All operations return [`StoreResult<T>`], an alias for
//! `Result<T, StoreError>`. Key absence is a first-class variant
//! ([`StoreError::NotFound`]) so callers can implement read-or-default
//! patterns without string matching; see [`StoreError`] for the full
//! taxonomy.
//!
//! # Example
//!
//! ```ignore
//! use statekv::backends::RedbStore;
//! use statekv::{Cursor, Store};
//!
//! // Open or create a store in a directory
//! let store = RedbStore::open("/var/lib/connector/state")?;
//!
//! store.put(b"user:1", b"alice")?;
//! store.put(b"user:2", b"bob")?;
//!
//! let value = store.get(b"user:1")?;
//! assert_eq!(value, b"alice");
//!
//! // Scan a half-open range [user:1, user:2) in key order
//! let mut cur = store.range(b"user:1", b"user:2")?;
//! while cur.next()? {
//!     println!("{:?} = {:?}", cur.key(), cur.value());
//! }
//! drop(cur);
//!
//! store.close()?;
//! ```
//!
//! # Modules
//!
//! - [`store`] - Storage traits, range bounds, and the error taxonomy
//! - [`backends`] - Concrete storage backend implementations

pub mod backends;
pub mod store;

pub use store::{lossy_key, Cursor, KeyRange, KeyValue, Store, StoreError, StoreResult};
