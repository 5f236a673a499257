use std::collections::VecDeque;

use crate::common::types::RowLocation;
use super::Replacer;

/// First-in first-out replacement: the oldest admitted row goes first,
/// regardless of how often it was read since
pub struct FifoReplacer {
    queue: VecDeque<RowLocation>,
}

impl FifoReplacer {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }
}

impl Replacer for FifoReplacer {
    fn record_admission(&mut self, location: RowLocation) {
        self.remove(location);
        self.queue.push_back(location);
    }

    fn record_access(&mut self, _location: RowLocation) {}

    fn remove(&mut self, location: RowLocation) {
        if let Some(pos) = self.queue.iter().position(|&l| l == location) {
            self.queue.remove(pos);
        }
    }

    fn victim(&mut self) -> Option<RowLocation> {
        self.queue.pop_front()
    }
}
