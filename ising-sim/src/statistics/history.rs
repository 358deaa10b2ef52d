use std::collections::VecDeque;

use crate::geometry::Snapshot;

/// Bounded FIFO of lattice snapshots, newest at the back.
///
/// Pushing at capacity evicts the oldest entry first, so `len() <= capacity()`
/// always holds.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    snapshots: VecDeque<Snapshot>,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            snapshots: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Snapshot `lag` entries back from the newest; `latest(0)` is the newest.
    pub fn latest(&self, lag: usize) -> Option<&Snapshot> {
        let len = self.snapshots.len();
        if lag >= len {
            return None;
        }
        self.snapshots.get(len - lag - 1)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
