//! Storage error types.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Key absence is a distinguished variant rather than a shared sentinel
/// value: callers match on [`StoreError::NotFound`] structurally, never by
/// identity, so read-or-default and insert-if-absent patterns need no
/// string comparison.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key does not exist. Expected in normal control flow.
    #[error("key not found")]
    NotFound,

    /// The store could not be opened or created at the given path.
    /// Fatal to construction; there is no store to proceed with.
    #[error("failed to open store at `{}`: {reason}", .path.display())]
    Open {
        /// The directory the store was asked to open.
        path: PathBuf,
        /// What the underlying engine or filesystem reported.
        reason: String,
    },

    /// A point operation failed for a reason other than key absence.
    /// The store remains usable for subsequent calls.
    #[error("{op} failed for key `{key}`: {reason}")]
    Io {
        /// The operation that failed (`"put"`, `"get"`, ...).
        op: &'static str,
        /// The key involved, rendered for diagnostics.
        key: String,
        /// What the underlying engine reported.
        reason: String,
    },

    /// A range cursor was requested with start > end.
    #[error("invalid range: start `{start}` is greater than end `{end}`")]
    InvalidRange {
        /// The requested lower bound, rendered for diagnostics.
        start: String,
        /// The requested upper bound, rendered for diagnostics.
        end: String,
    },

    /// An operation was attempted after the store was closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Build an [`StoreError::Open`] from the underlying cause.
    pub fn open(path: &Path, reason: impl fmt::Display) -> Self {
        Self::Open { path: path.to_path_buf(), reason: reason.to_string() }
    }

    /// Build an [`StoreError::Io`] carrying operation context for diagnostics.
    pub fn io(op: &'static str, key: &[u8], reason: impl fmt::Display) -> Self {
        Self::Io { op, key: lossy_key(key), reason: reason.to_string() }
    }

    /// Returns true if this error means the key was absent.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns true if this error means the store was already closed.
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Render a key for diagnostics.
///
/// Keys are usually printable namespaced strings (`receipt:abc123`), so a
/// lossy UTF-8 rendering keeps error messages and logs readable.
pub fn lossy_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = StoreError::io("put", b"user:1", "disk full");
        assert_eq!(err.to_string(), "put failed for key `user:1`: disk full");

        let err = StoreError::open(Path::new("/tmp/db"), "permission denied");
        assert!(err.to_string().contains("/tmp/db"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn predicates_match_structurally() {
        assert!(StoreError::NotFound.is_not_found());
        assert!(!StoreError::NotFound.is_closed());
        assert!(StoreError::Closed.is_closed());
        assert!(!StoreError::io("get", b"k", "oops").is_not_found());
    }

    #[test]
    fn lossy_key_keeps_printable_keys_intact() {
        assert_eq!(lossy_key(b"receipt:abc"), "receipt:abc");
        assert_eq!(lossy_key(b""), "");
        // Non-UTF8 bytes degrade to replacement characters instead of failing.
        assert_eq!(lossy_key(&[0xff, 0xfe]), "\u{fffd}\u{fffd}");
    }
}
