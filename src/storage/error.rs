use thiserror::Error;

use crate::catalog::CatalogError;
use crate::common::types::{BlockId, RowLocation};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Truncated record: column {column} needs {needed} bytes, {remaining} remaining")]
    TruncatedRecord {
        column: String,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid VARCHAR data for column {column}: {reason}")]
    InvalidVarchar { column: String, reason: String },

    #[error("Insufficient storage space: block {block_id} cannot take {record_size} bytes within {capacity} bytes")]
    StorageExceeded {
        block_id: BlockId,
        record_size: usize,
        capacity: u64,
    },

    #[error("Block usage map is corrupt: {0}")]
    UsageMapCorrupt(String),

    #[error("Record of {record_size} bytes does not fit in a {block_size}-byte block")]
    RecordTooLarge { record_size: usize, block_size: usize },

    #[error("Update at {location} would change the record size from {old} to {new} bytes")]
    RecordSizeChanged {
        location: RowLocation,
        old: usize,
        new: usize,
    },

    #[error("No record at {location}: {reason}")]
    InvalidLocation { location: RowLocation, reason: String },

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
