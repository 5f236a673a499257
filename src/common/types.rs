/// Default block size in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 48;

/// Default storage ceiling of a table's record file in bytes
pub const DEFAULT_STORAGE_SIZE: u64 = 480_000;

/// Size of the big-endian length prefix in front of every stored record
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Size of the big-endian length prefix in front of every VARCHAR field
pub const VARCHAR_PREFIX_SIZE: usize = 2;

/// Size of an encoded INT field
pub const INT_SIZE: usize = 4;

/// Block ID type (byte offset / block size)
pub type BlockId = u64;

/// Row location type: byte offset of a record's length prefix in the heap file
pub type RowLocation = u64;

/// Transaction ID type
pub type TxnId = u32;

/// Block that contains the given byte offset
pub fn block_of(offset: u64, block_size: usize) -> BlockId {
    offset / block_size as u64
}

/// Byte offset where a block starts
pub fn block_start(block_id: BlockId, block_size: usize) -> u64 {
    block_id * block_size as u64
}
