use thiserror::Error;

use crate::catalog::CatalogError;
use crate::index::btree::BTreeError;
use crate::storage::buffer::BufferPoolError;
use crate::storage::error::StorageError;
use crate::transaction::TransactionError;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Table {table} has no column {column}")]
    UnknownColumn { table: String, column: String },

    #[error("Column {0} is not indexed")]
    NotIndexed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Index error: {0}")]
    Index(#[from] BTreeError),

    #[error("Buffer pool error: {0}")]
    Buffer(#[from] BufferPoolError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),
}

pub type Result<T> = std::result::Result<T, TableError>;
