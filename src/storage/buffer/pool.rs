use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use log::{debug, trace};
use parking_lot::Mutex;

use crate::common::types::RowLocation;
use crate::storage::buffer::error::{BufferPoolError, Result};
use crate::storage::buffer::replacer::{FifoReplacer, LruReplacer, Replacer};
use crate::storage::heap::{HeapStore, RowData};

/// Which resident row is evicted when the pool is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Evict the row read least recently
    #[default]
    Lru,
    /// Evict the row admitted earliest
    Fifo,
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => write!(f, "lru"),
            EvictionPolicy::Fifo => write!(f, "fifo"),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionPolicy::Lru),
            "fifo" => Ok(EvictionPolicy::Fifo),
            other => Err(format!("Unknown eviction policy: {}", other)),
        }
    }
}

/// Hit and miss counters of a buffer pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferPoolStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct PoolState {
    frames: HashMap<RowLocation, RowData>,
    replacer: Box<dyn Replacer>,
    stats: BufferPoolStats,
}

/// Fixed-capacity cache of decoded rows keyed by row location
///
/// A miss reads the row through the heap store and admits it, evicting one
/// resident row first when the pool is full.
pub struct BufferPool {
    capacity: usize,
    policy: EvictionPolicy,
    state: Mutex<PoolState>,
}

impl BufferPool {
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        if capacity == 0 {
            return Err(BufferPoolError::InvalidCapacity(capacity));
        }

        let replacer: Box<dyn Replacer> = match policy {
            EvictionPolicy::Lru => Box::new(LruReplacer::new(capacity)),
            EvictionPolicy::Fifo => Box::new(FifoReplacer::new(capacity)),
        };

        Ok(Self {
            capacity,
            policy,
            state: Mutex::new(PoolState {
                frames: HashMap::with_capacity(capacity),
                replacer,
                stats: BufferPoolStats::default(),
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Return the row at `location`, from the pool if resident
    pub fn fetch(&self, store: &HeapStore, location: RowLocation) -> Result<RowData> {
        let mut state = self.state.lock();

        if let Some(row) = state.frames.get(&location).cloned() {
            state.stats.hits += 1;
            state.replacer.record_access(location);
            trace!("Buffer hit for row {}", location);
            return Ok(row);
        }

        state.stats.misses += 1;
        let row = store.read_row(location)?;

        if state.frames.len() >= self.capacity {
            if let Some(victim) = state.replacer.victim() {
                state.frames.remove(&victim);
                state.stats.evictions += 1;
                debug!("Evicted row {} to admit row {}", victim, location);
            }
        }

        state.frames.insert(location, row.clone());
        state.replacer.record_admission(location);
        Ok(row)
    }

    pub fn contains(&self, location: RowLocation) -> bool {
        self.state.lock().frames.contains_key(&location)
    }

    /// Number of resident rows
    pub fn len(&self) -> usize {
        self.state.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> BufferPoolStats {
        self.state.lock().stats
    }

    /// Drop a resident row so the next fetch reads it from the store
    ///
    /// Returns whether the row was resident.
    pub fn invalidate(&self, location: RowLocation) -> bool {
        let mut state = self.state.lock();
        let was_resident = state.frames.remove(&location).is_some();
        if was_resident {
            state.replacer.remove(location);
        }
        was_resident
    }

    /// Drop every resident row, keeping the counters
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let locations: Vec<RowLocation> = state.frames.keys().copied().collect();
        for location in locations {
            state.replacer.remove(location);
        }
        state.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::StoreConfig;
    use tempfile::TempDir;

    fn store_with_rows(dir: &TempDir, count: usize) -> (HeapStore, Vec<RowLocation>) {
        let mut store = HeapStore::open(&StoreConfig::new(dir.path()), "t", None).unwrap();
        let locations = (0..count)
            .map(|i| store.insert_raw(format!("row-{}", i).as_bytes()).unwrap())
            .collect();
        (store, locations)
    }

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            BufferPool::new(0, EvictionPolicy::Lru),
            Err(BufferPoolError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_hit_after_miss() {
        let temp_dir = TempDir::new().unwrap();
        let (store, locations) = store_with_rows(&temp_dir, 2);
        let pool = BufferPool::new(2, EvictionPolicy::Lru).unwrap();

        let first = pool.fetch(&store, locations[1]).unwrap();
        let second = pool.fetch(&store, locations[1]).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.as_bytes(), Some(&b"row-1"[..]));
        assert_eq!(
            pool.stats(),
            BufferPoolStats {
                hits: 1,
                misses: 1,
                evictions: 0
            }
        );
    }

    #[test]
    fn test_invalidate_forces_reread() {
        let temp_dir = TempDir::new().unwrap();
        let (store, locations) = store_with_rows(&temp_dir, 1);
        let pool = BufferPool::new(1, EvictionPolicy::Fifo).unwrap();

        pool.fetch(&store, locations[0]).unwrap();
        assert!(pool.invalidate(locations[0]));
        assert!(!pool.invalidate(locations[0]));
        assert!(pool.is_empty());

        pool.fetch(&store, locations[0]).unwrap();
        assert_eq!(pool.stats().misses, 2);
        assert_eq!(pool.stats().evictions, 0);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("LRU".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert_eq!("fifo".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Fifo);
        assert!("clock".parse::<EvictionPolicy>().is_err());
    }
}
