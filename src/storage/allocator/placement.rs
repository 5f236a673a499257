use log::debug;

use crate::common::config::StoreConfig;
use crate::common::types::{block_of, block_start, BlockId, LENGTH_PREFIX_SIZE};
use crate::storage::allocator::usage::BlockUsageTable;
use crate::storage::error::{Result, StorageError};

/// Where a record of a given size goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub block_id: BlockId,
    /// Absolute file offset of the record's length prefix
    pub insertion_offset: u64,
    /// Bytes used in the block once the record is written
    pub new_used_space: u32,
    /// Whether the record reuses free space of an already recorded block
    pub reused_existing: bool,
}

/// First-fit block allocator under a fixed storage ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockAllocator {
    block_size: usize,
    storage_size: u64,
}

impl BlockAllocator {
    /// Create an allocator, rejecting block sizes it cannot account for
    ///
    /// A block must hold a length prefix plus one payload byte, and its byte
    /// count must fit the `u32` kept per block in the usage table.
    pub fn new(block_size: usize, storage_size: u64) -> Result<Self> {
        let min = LENGTH_PREFIX_SIZE + 1;
        if block_size < min {
            return Err(StorageError::InvalidConfig(format!(
                "block size {} is below the minimum of {} bytes",
                block_size, min
            )));
        }
        if u32::try_from(block_size).is_err() {
            return Err(StorageError::InvalidConfig(format!(
                "block size {} exceeds {} bytes",
                block_size,
                u32::MAX
            )));
        }

        Ok(Self {
            block_size,
            storage_size,
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::new(config.block_size, config.storage_size)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn storage_size(&self) -> u64 {
        self.storage_size
    }

    /// Decide where a record of `record_size` bytes is written
    ///
    /// Recorded blocks are scanned in the usage table's iteration order and the
    /// first one with enough free space wins. Otherwise the record goes at the
    /// end of the file, moving on to a fresh block when the last one is too
    /// full; the skipped tail of that block is never reclaimed.
    pub fn place_record(
        &self,
        record_size: usize,
        file_size: u64,
        usage: &BlockUsageTable,
    ) -> Result<Placement> {
        if record_size > self.block_size {
            return Err(StorageError::RecordTooLarge {
                record_size,
                block_size: self.block_size,
            });
        }

        let placement = match self.find_free_block(record_size, usage) {
            Some(placement) => placement?,
            None => self.append_block(record_size, file_size)?,
        };

        if self.exceeds_storage(placement.block_id, record_size) {
            return Err(StorageError::StorageExceeded {
                block_id: placement.block_id,
                record_size,
                capacity: self.storage_size,
            });
        }

        debug!(
            "Placing {} bytes in block {} at offset {} (reused: {})",
            record_size, placement.block_id, placement.insertion_offset, placement.reused_existing
        );

        Ok(placement)
    }

    fn find_free_block(
        &self,
        record_size: usize,
        usage: &BlockUsageTable,
    ) -> Option<Result<Placement>> {
        usage
            .iter()
            .find(|u| self.block_size.saturating_sub(u.bytes_used as usize) >= record_size)
            .map(|u| self.prepare(u.block_id, u.bytes_used as usize, record_size, true))
    }

    fn append_block(&self, record_size: usize, file_size: u64) -> Result<Placement> {
        let mut block_id = block_of(file_size, self.block_size);
        let mut space_used = (file_size % self.block_size as u64) as usize;

        if self.block_size - space_used < record_size {
            debug!(
                "Stranding {} bytes at the end of block {}",
                self.block_size - space_used,
                block_id
            );
            block_id += 1;
            space_used = 0;
        }

        self.prepare(block_id, space_used, record_size, false)
    }

    fn prepare(
        &self,
        block_id: BlockId,
        space_used: usize,
        record_size: usize,
        reused_existing: bool,
    ) -> Result<Placement> {
        let used = space_used + record_size;
        let new_used_space = u32::try_from(used).map_err(|_| {
            StorageError::InvalidConfig(format!("block {} would hold {} bytes", block_id, used))
        })?;

        Ok(Placement {
            block_id,
            insertion_offset: block_start(block_id, self.block_size) + space_used as u64,
            new_used_space,
            reused_existing,
        })
    }

    fn exceeds_storage(&self, block_id: BlockId, record_size: usize) -> bool {
        block_start(block_id, self.block_size) + record_size as u64 > self.storage_size
    }
}
