//! Ordered in-memory storage backend.
//!
//! This backend keeps the key space in a `BTreeMap`, so it provides the
//! same lexicographic ordering and cursor semantics as the persistent
//! backend without touching disk. Nothing survives the process: it exists
//! for tests and for connector state that is explicitly ephemeral.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::ops::Bound;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::{Cursor, KeyRange, KeyValue, Store, StoreError, StoreResult};

/// A non-durable ordered key-value store.
///
/// Point operations take `&self` behind an internal `RwLock`, so the
/// store can be shared across threads like any other backend. Closing
/// drops the map; later operations observe [`StoreError::Closed`].
pub struct MemoryStore {
    /// The ordered key space; `None` once closed.
    map: RwLock<Option<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { map: RwLock::new(Some(BTreeMap::new())) }
    }

    // Nothing panics while holding these guards, and the map stays
    // consistent across a poisoned one; recover the guard.
    fn read_guard(&self) -> RwLockReadGuard<'_, Option<BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.map.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Option<BTreeMap<Vec<u8>, Vec<u8>>>> {
        self.map.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn make_cursor(&self, bounds: KeyRange) -> StoreResult<MemoryCursor<'_>> {
        let guard = self.read_guard();
        let map = guard.as_ref().ok_or(StoreError::Closed)?;

        let lower = match bounds.start() {
            Some(start) => Bound::Included(start),
            None => Bound::Unbounded,
        };
        let upper = match bounds.end() {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        let entries = map
            .range::<[u8], _>((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(MemoryCursor::new(entries))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    type Cursor<'a>
        = MemoryCursor<'a>
    where
        Self: 'a;

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let mut guard = self.write_guard();
        let map = guard.as_mut().ok_or(StoreError::Closed)?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        let guard = self.read_guard();
        let map = guard.as_ref().ok_or(StoreError::Closed)?;
        map.get(key).cloned().ok_or(StoreError::NotFound)
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let mut guard = self.write_guard();
        let map = guard.as_mut().ok_or(StoreError::Closed)?;
        map.remove(key);
        Ok(())
    }

    fn cursor(&self) -> StoreResult<Self::Cursor<'_>> {
        self.make_cursor(KeyRange::unbounded())
    }

    fn range(&self, start: &[u8], end: &[u8]) -> StoreResult<Self::Cursor<'_>> {
        self.make_cursor(KeyRange::new(start, end)?)
    }

    fn close(&self) -> StoreResult<()> {
        self.write_guard().take();
        Ok(())
    }
}

/// Where the cursor currently stands in its snapshot.
enum State {
    Unpositioned,
    Positioned,
    ExhaustedForward,
    ExhaustedBackward,
}

/// A cursor over a snapshot of a [`MemoryStore`].
///
/// The snapshot is taken at construction, so concurrent writes to the
/// store never surface mid-iteration. Dropping the cursor releases the
/// snapshot with no traversal side effect.
pub struct MemoryCursor<'s> {
    /// Bounded snapshot of the key space, ascending.
    entries: Vec<KeyValue>,
    /// Position within the snapshot; meaningful only when positioned.
    pos: usize,
    state: State,
    _store: PhantomData<&'s MemoryStore>,
}

impl MemoryCursor<'_> {
    fn new(entries: Vec<KeyValue>) -> Self {
        Self { entries, pos: 0, state: State::Unpositioned, _store: PhantomData }
    }

    fn position_at(&mut self, pos: usize) -> bool {
        if pos < self.entries.len() {
            self.pos = pos;
            self.state = State::Positioned;
            true
        } else {
            self.state = State::ExhaustedForward;
            false
        }
    }
}

impl Cursor for MemoryCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> StoreResult<bool> {
        let pos = self.entries.partition_point(|(k, _)| k.as_slice() < key);
        Ok(self.position_at(pos))
    }

    fn next(&mut self) -> StoreResult<bool> {
        match self.state {
            State::Positioned => {
                if self.pos + 1 < self.entries.len() {
                    self.pos += 1;
                    Ok(true)
                } else {
                    self.state = State::ExhaustedForward;
                    Ok(false)
                }
            }
            State::Unpositioned | State::ExhaustedBackward => self.seek_first(),
            State::ExhaustedForward => Ok(false),
        }
    }

    fn prev(&mut self) -> StoreResult<bool> {
        match self.state {
            State::Positioned => {
                if self.pos > 0 {
                    self.pos -= 1;
                    Ok(true)
                } else {
                    self.state = State::ExhaustedBackward;
                    Ok(false)
                }
            }
            State::Unpositioned | State::ExhaustedForward => self.seek_last(),
            State::ExhaustedBackward => Ok(false),
        }
    }

    fn seek_first(&mut self) -> StoreResult<bool> {
        Ok(self.position_at(0))
    }

    fn seek_last(&mut self) -> StoreResult<bool> {
        if self.entries.is_empty() {
            self.state = State::ExhaustedForward;
            Ok(false)
        } else {
            self.pos = self.entries.len() - 1;
            self.state = State::Positioned;
            Ok(true)
        }
    }

    fn key(&self) -> &[u8] {
        match self.state {
            State::Positioned => &self.entries[self.pos].0,
            _ => panic!("cursor is not positioned; call seek, next, or prev first"),
        }
    }

    fn value(&self) -> &[u8] {
        match self.state {
            State::Positioned => &self.entries[self.pos].1,
            _ => panic!("cursor is not positioned; call seek, next, or prev first"),
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        match self.state {
            State::Positioned => {
                let (k, v) = &self.entries[self.pos];
                Some((k.as_slice(), v.as_slice()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_stable_under_writes() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"c", b"3").unwrap();

        let mut cur = store.cursor().unwrap();
        store.put(b"b", b"2").unwrap();

        let mut keys = Vec::new();
        while cur.next().unwrap() {
            keys.push(cur.key().to_vec());
        }
        // The cursor sees the snapshot taken at construction.
        assert_eq!(keys, vec![b"a".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn close_drops_the_key_space() {
        let store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        store.close().unwrap();
        assert!(store.get(b"a").unwrap_err().is_closed());
        store.close().unwrap();
    }
}
