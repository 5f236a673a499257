use thiserror::Error;
use crate::storage::error::StorageError;

#[derive(Error, Debug)]
pub enum BufferPoolError {
    #[error("Buffer pool capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, BufferPoolError>;
