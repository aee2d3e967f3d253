//! History
//!
//! Bounded undo stack of basket-sequence snapshots.

use std::collections::VecDeque;

use jiff::Timestamp;

use crate::basket::Basket;

/// Snapshots kept unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// A copy of the basket sequence taken before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Baskets as they were.
    pub baskets: Vec<Basket>,

    /// When the snapshot was taken.
    pub taken_at: Timestamp,
}

impl Snapshot {
    /// Capture `baskets` now.
    pub fn capture(baskets: &[Basket]) -> Self {
        Self {
            baskets: baskets.to_vec(),
            taken_at: Timestamp::now(),
        }
    }
}

/// Ring buffer of the most recent snapshots; the oldest is dropped once `limit` is reached.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Snapshot>,
    limit: usize,
}

impl History {
    /// Create an empty history holding at most `limit` snapshots.
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Push a snapshot, returning the evicted one if the buffer was full.
    pub fn push(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        if self.limit == 0 {
            return Some(snapshot);
        }

        let evicted = if self.snapshots.len() >= self.limit {
            self.snapshots.pop_front()
        } else {
            None
        };

        self.snapshots.push_back(snapshot);

        evicted
    }

    /// Pop the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    /// Most recent snapshot, if any.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    /// Number of undo steps available.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots retained.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
