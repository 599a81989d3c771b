//! Redb cursor implementation.
//!
//! # Memory-Efficient Iteration
//!
//! The cursor uses batched streaming to avoid loading the whole key space
//! into memory. Instead of materializing every entry upfront, it fetches
//! entries in batches through its read snapshot, loading the next batch on
//! demand as the cursor advances in either direction. At any time the
//! cursor holds at most one batch of owned pairs.

use std::marker::PhantomData;
use std::ops::Bound;

use redb::{ReadTransaction, ReadableTable, TableError};

use crate::store::{Cursor, KeyRange, KeyValue, StoreError, StoreResult};

use super::store::{RedbStore, DATA_TABLE};

/// Maximum entries fetched per batch.
const BATCH_SIZE: usize = 1000;

/// Where the cursor currently stands in the key space.
enum State {
    /// No positioning call has succeeded yet.
    Unpositioned,
    /// Standing on `batch[pos]`.
    Positioned,
    /// Ran past the greatest key in the bound.
    ExhaustedForward,
    /// Ran before the smallest key in the bound.
    ExhaustedBackward,
}

/// A cursor over a Redb-backed store, optionally bounded to a half-open
/// range.
///
/// The cursor owns a read snapshot of the engine, so it keeps a
/// consistent view regardless of concurrent writes. Dropping the cursor
/// releases the snapshot; release has no traversal side effect, and the
/// borrow on the store keeps the cursor from outliving it.
pub struct RedbCursor<'s> {
    /// The read snapshot all batches are fetched through.
    tx: ReadTransaction,
    /// Half-open `[start, end)` bounds; unbounded sides are `None`.
    bounds: KeyRange,
    /// Current batch of entries, ascending.
    batch: Vec<KeyValue>,
    /// Position within the current batch; meaningful only when positioned.
    pos: usize,
    state: State,
    _store: PhantomData<&'s RedbStore>,
}

impl<'s> RedbCursor<'s> {
    pub(crate) fn new(tx: ReadTransaction, bounds: KeyRange) -> Self {
        Self {
            tx,
            bounds,
            batch: Vec::new(),
            pos: 0,
            state: State::Unpositioned,
            _store: PhantomData,
        }
    }

    /// Fetch up to `limit` entries ascending from `lower`, clipped to the
    /// cursor's upper bound.
    fn fetch_asc(
        &self,
        op: &'static str,
        lower: Bound<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<KeyValue>> {
        // An empty window would hand the engine inverted bounds.
        if let Bound::Included(lo) | Bound::Excluded(lo) = lower {
            if self.bounds.end().is_some_and(|end| lo >= end) {
                return Ok(Vec::new());
            }
        }
        let upper = match self.bounds.end() {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };

        let table = match self.tx.open_table(DATA_TABLE) {
            Ok(t) => t,
            // No data table means nothing was ever written.
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(op, &[], e)),
        };
        let range =
            table.range::<&[u8]>((lower, upper)).map_err(|e| StoreError::io(op, &[], e))?;

        let mut entries = Vec::new();
        for item in range {
            if entries.len() >= limit {
                break;
            }
            let (k, v) = item.map_err(|e| StoreError::io(op, &[], e))?;
            entries.push((k.value().to_vec(), v.value().to_vec()));
        }
        Ok(entries)
    }

    /// Fetch up to `limit` entries descending from `upper` (exclusive), or
    /// from the range's upper bound when `upper` is `None`, clipped to the
    /// cursor's lower bound. Entries come back ascending.
    fn fetch_desc(
        &self,
        op: &'static str,
        upper: Option<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<KeyValue>> {
        // An empty window would hand the engine inverted bounds.
        let effective_upper = upper.or_else(|| self.bounds.end());
        if let (Some(hi), Some(start)) = (effective_upper, self.bounds.start()) {
            if hi <= start {
                return Ok(Vec::new());
            }
        }
        let lower = match self.bounds.start() {
            Some(start) => Bound::Included(start),
            None => Bound::Unbounded,
        };
        let upper = match effective_upper {
            Some(hi) => Bound::Excluded(hi),
            None => Bound::Unbounded,
        };

        let table = match self.tx.open_table(DATA_TABLE) {
            Ok(t) => t,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(op, &[], e)),
        };
        let range =
            table.range::<&[u8]>((lower, upper)).map_err(|e| StoreError::io(op, &[], e))?;

        let mut entries = Vec::new();
        for item in range.rev() {
            if entries.len() >= limit {
                break;
            }
            let (k, v) = item.map_err(|e| StoreError::io(op, &[], e))?;
            entries.push((k.value().to_vec(), v.value().to_vec()));
        }
        entries.reverse();
        Ok(entries)
    }

    /// Position at the smallest key in the bound.
    fn first_in_bound(&mut self, op: &'static str) -> StoreResult<bool> {
        let batch = {
            let lower = match self.bounds.start() {
                Some(start) => Bound::Included(start),
                None => Bound::Unbounded,
            };
            self.fetch_asc(op, lower, BATCH_SIZE)?
        };
        if batch.is_empty() {
            self.batch.clear();
            self.state = State::ExhaustedForward;
            Ok(false)
        } else {
            self.batch = batch;
            self.pos = 0;
            self.state = State::Positioned;
            Ok(true)
        }
    }

    /// Position at the greatest key in the bound.
    fn last_in_bound(&mut self, op: &'static str) -> StoreResult<bool> {
        let batch = self.fetch_desc(op, None, BATCH_SIZE)?;
        if batch.is_empty() {
            self.batch.clear();
            self.state = State::ExhaustedForward;
            Ok(false)
        } else {
            self.pos = batch.len() - 1;
            self.batch = batch;
            self.state = State::Positioned;
            Ok(true)
        }
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> StoreResult<bool> {
        let batch = {
            let target = self.bounds.clamp_lower(key);
            self.fetch_asc("seek", Bound::Included(target), BATCH_SIZE)?
        };
        if batch.is_empty() {
            self.batch.clear();
            self.state = State::ExhaustedForward;
            Ok(false)
        } else {
            self.batch = batch;
            self.pos = 0;
            self.state = State::Positioned;
            Ok(true)
        }
    }

    fn next(&mut self) -> StoreResult<bool> {
        match self.state {
            State::Positioned => {
                if self.pos + 1 < self.batch.len() {
                    self.pos += 1;
                    return Ok(true);
                }
                let batch = {
                    let after = self.batch[self.pos].0.as_slice();
                    self.fetch_asc("next", Bound::Excluded(after), BATCH_SIZE)?
                };
                if batch.is_empty() {
                    self.state = State::ExhaustedForward;
                    Ok(false)
                } else {
                    self.batch = batch;
                    self.pos = 0;
                    Ok(true)
                }
            }
            State::Unpositioned | State::ExhaustedBackward => self.first_in_bound("next"),
            State::ExhaustedForward => Ok(false),
        }
    }

    fn prev(&mut self) -> StoreResult<bool> {
        match self.state {
            State::Positioned => {
                if self.pos > 0 {
                    self.pos -= 1;
                    return Ok(true);
                }
                let batch = {
                    let before = self.batch[0].0.as_slice();
                    self.fetch_desc("prev", Some(before), BATCH_SIZE)?
                };
                if batch.is_empty() {
                    self.state = State::ExhaustedBackward;
                    Ok(false)
                } else {
                    self.pos = batch.len() - 1;
                    self.batch = batch;
                    Ok(true)
                }
            }
            State::Unpositioned | State::ExhaustedForward => self.last_in_bound("prev"),
            State::ExhaustedBackward => Ok(false),
        }
    }

    fn seek_first(&mut self) -> StoreResult<bool> {
        self.first_in_bound("seek_first")
    }

    fn seek_last(&mut self) -> StoreResult<bool> {
        self.last_in_bound("seek_last")
    }

    fn key(&self) -> &[u8] {
        match self.state {
            State::Positioned => &self.batch[self.pos].0,
            _ => panic!("cursor is not positioned; call seek, next, or prev first"),
        }
    }

    fn value(&self) -> &[u8] {
        match self.state {
            State::Positioned => &self.batch[self.pos].1,
            _ => panic!("cursor is not positioned; call seek, next, or prev first"),
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        match self.state {
            State::Positioned => {
                let (k, v) = &self.batch[self.pos];
                Some((k.as_slice(), v.as_slice()))
            }
            _ => None,
        }
    }
}

// Cursor correctness across batch boundaries is exercised by the
// integration tests, which need a populated store.
