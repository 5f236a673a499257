use std::collections::VecDeque;

use crate::common::types::RowLocation;
use super::Replacer;

/// Least recently used replacement: every access refreshes a row
pub struct LruReplacer {
    lru_list: VecDeque<RowLocation>,
}

impl LruReplacer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lru_list: VecDeque::with_capacity(capacity),
        }
    }
}

impl Replacer for LruReplacer {
    fn record_admission(&mut self, location: RowLocation) {
        self.record_access(location);
    }

    fn record_access(&mut self, location: RowLocation) {
        self.remove(location);
        // Front is the most recently used
        self.lru_list.push_front(location);
    }

    fn remove(&mut self, location: RowLocation) {
        if let Some(pos) = self.lru_list.iter().position(|&l| l == location) {
            self.lru_list.remove(pos);
        }
    }

    fn victim(&mut self) -> Option<RowLocation> {
        self.lru_list.pop_back()
    }
}
