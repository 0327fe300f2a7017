//! Bounded generation history
//!
//! A fixed-capacity, most-recent-first collection of generation records.
//! Inserting past capacity evicts the oldest entries; there is no access-time
//! reordering.

use crate::models::GenerationRecord;
use crate::{Error, Result};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    capacity: usize,
    records: VecDeque<GenerationRecord>,
}

impl HistoryStore {
    /// Create an empty store. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Prepend `record`, dropping the oldest entries beyond capacity.
    pub fn insert(&mut self, record: GenerationRecord) {
        self.records.push_front(record);

        while self.records.len() > self.capacity {
            if let Some(evicted) = self.records.pop_back() {
                tracing::debug!(
                    "Evicted history record {} ({})",
                    evicted.id(),
                    evicted.created_at()
                );
            }
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Record at `index`, where 0 is the most recent.
    pub fn get(&self, index: usize) -> Result<&GenerationRecord> {
        self.records.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records from most recent to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.records.iter()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
