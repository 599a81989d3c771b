//! Storage backend implementations.
//!
//! This module contains concrete implementations of the storage traits.
//!
//! # Available Backends
//!
//! - [`redb`] - Durable backend over the Redb embedded database
//! - [`memory`] - Ordered in-memory backend for tests and ephemeral state

pub mod memory;
pub mod redb;

pub use memory::{MemoryCursor, MemoryStore};
pub use self::redb::{RedbConfig, RedbCursor, RedbStore};
