use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use linked_hash_map::LinkedHashMap;
use serde::{Serialize, Deserialize};

use crate::common::types::BlockId;
use crate::storage::error::{Result, StorageError};

/// Bytes used in one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockUsage {
    pub block_id: BlockId,
    pub bytes_used: u32,
}

/// Bytes used per block, kept in the order blocks were first recorded
///
/// The iteration order is what first-fit placement scans, so it survives
/// persistence: the side file stores the entries as an ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockUsageTable {
    entries: LinkedHashMap<BlockId, u32>,
}

impl BlockUsageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from its side file
    ///
    /// A missing file yields an empty table. A file that does not hold the
    /// expected ordered list fails with `UsageMapCorrupt`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = match fs::read(path.as_ref()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let usages: Vec<BlockUsage> = bincode::deserialize(&bytes)
            .map_err(|e| StorageError::UsageMapCorrupt(e.to_string()))?;

        let mut table = Self::new();
        for usage in usages {
            if table.entries.contains_key(&usage.block_id) {
                return Err(StorageError::UsageMapCorrupt(format!(
                    "block {} listed twice",
                    usage.block_id
                )));
            }
            table.entries.insert(usage.block_id, usage.bytes_used);
        }
        Ok(table)
    }

    /// Rewrite the side file with the full table
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = bincode::serialize(&self.to_vec())
            .map_err(|e| StorageError::UsageMapCorrupt(e.to_string()))?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    /// Bytes used in a block, if the block has been recorded
    pub fn get(&self, block_id: BlockId) -> Option<u32> {
        self.entries.get(&block_id).copied()
    }

    /// Record the bytes used in a block
    ///
    /// An existing block keeps its position in the iteration order.
    pub fn record(&mut self, block_id: BlockId, bytes_used: u32) {
        match self.entries.get_mut(&block_id) {
            Some(used) => *used = bytes_used,
            None => {
                self.entries.insert(block_id, bytes_used);
            }
        }
    }

    /// Iterate over blocks in first-recorded order
    pub fn iter(&self) -> impl Iterator<Item = BlockUsage> + '_ {
        self.entries.iter().map(|(&block_id, &bytes_used)| BlockUsage {
            block_id,
            bytes_used,
        })
    }

    pub fn to_vec(&self) -> Vec<BlockUsage> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total bytes used across all recorded blocks
    pub fn total_used(&self) -> u64 {
        self.entries.values().map(|&used| used as u64).sum()
    }
}
