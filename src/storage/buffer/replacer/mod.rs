mod fifo;
mod lru;

pub use fifo::FifoReplacer;
pub use lru::LruReplacer;

use crate::common::types::RowLocation;

/// Victim selection for buffered rows
pub trait Replacer: Send {
    /// A row was admitted into the pool
    fn record_admission(&mut self, location: RowLocation);

    /// A resident row was read again
    fn record_access(&mut self, location: RowLocation);

    /// Forget a row that left the pool outside of eviction
    fn remove(&mut self, location: RowLocation);

    /// Pick and forget the row to evict next
    fn victim(&mut self) -> Option<RowLocation>;
}
