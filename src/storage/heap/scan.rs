use crate::common::types::{block_start, BlockId, RowLocation, LENGTH_PREFIX_SIZE};
use crate::storage::codec;
use crate::storage::error::Result;
use super::store::{HeapStore, RowData};

/// A record found by a scan, with the location it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRow {
    pub location: RowLocation,
    pub data: RowData,
}

/// Sequential block-by-block scan over a heap store
///
/// Each block is fetched as one chunk and parsed on its own: a record is
/// never assembled across two chunks. Parsing of a chunk stops quietly when
/// fewer than 4 bytes remain or when the declared length would run past the
/// chunk. A zero length prefix is an empty entry: nothing is yielded for it and
/// parsing goes on after its 4 bytes, so zeroed filler is walked over prefix by
/// prefix. A record written with a different block alignment than the one used
/// to read is dropped without an error.
pub struct HeapScan<'a> {
    store: &'a HeapStore,
    block_size: usize,
    block_count: u64,
    next_block: BlockId,
    current_block: BlockId,
    chunk: Vec<u8>,
    cursor: usize,
}

impl<'a> HeapScan<'a> {
    pub(super) fn new(store: &'a HeapStore) -> Result<Self> {
        let block_size = store.block_size();
        let file_size = store.file_size()?;
        let block_count = file_size.div_ceil(block_size as u64);

        Ok(Self {
            store,
            block_size,
            block_count,
            next_block: 0,
            current_block: 0,
            chunk: Vec::new(),
            cursor: 0,
        })
    }

    /// Parse the next record of the current chunk, if any is left
    fn next_in_chunk(&mut self) -> Option<Result<ScannedRow>> {
        loop {
            let remaining = &self.chunk[self.cursor..];

            let length = match codec::read_length_prefix(remaining) {
                Some(length) if LENGTH_PREFIX_SIZE + length <= remaining.len() => length,
                _ => {
                    self.cursor = self.chunk.len();
                    return None;
                }
            };

            let location = block_start(self.current_block, self.block_size) + self.cursor as u64;
            self.cursor += LENGTH_PREFIX_SIZE + length;
            if length == 0 {
                continue;
            }

            let payload = &remaining[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + length];
            let data = self.store.materialize(payload);
            return Some(data.map(|data| ScannedRow { location, data }));
        }
    }
}

impl Iterator for HeapScan<'_> {
    type Item = Result<ScannedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.next_in_chunk() {
                return Some(item);
            }

            if self.next_block >= self.block_count {
                return None;
            }

            let block_id = self.next_block;
            self.next_block += 1;

            match self
                .store
                .file()
                .read_chunk(block_start(block_id, self.block_size), self.block_size)
            {
                Ok(chunk) => {
                    self.current_block = block_id;
                    self.chunk = chunk;
                    self.cursor = 0;
                }
                Err(e) => {
                    self.next_block = self.block_count;
                    return Some(Err(e));
                }
            }
        }
    }
}
