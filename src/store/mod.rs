//! Storage traits and abstractions.
//!
//! This module defines the contract that storage backends implement:
//!
//! - [`Store`] - Durable point access to an ordered key space
//! - [`Cursor`] - Ordered iteration over key-value pairs
//! - [`KeyRange`] - Half-open `[start, end)` bounds for range cursors
//!
//! # Error Handling
//!
//! All operations return [`StoreResult<T>`] which is an alias for
//! `Result<T, StoreError>`. See [`StoreError`] for the possible error
//! variants.

mod error;
mod traits;

pub use error::{lossy_key, StoreError, StoreResult};
pub use traits::{Cursor, KeyRange, KeyValue, Store};
