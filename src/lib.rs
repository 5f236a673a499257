// heapdb storage engine

pub mod common;
pub mod catalog;
pub mod storage;
pub mod index;
pub mod transaction;
pub mod table;

// Re-export key items for convenient access
pub use common::config::StoreConfig;
pub use common::types::{BlockId, RowLocation};
pub use catalog::{Catalog, CatalogError, Column, DataType, Record, Schema, Value};
pub use storage::StorageError;
pub use storage::heap::{HeapStore, RowData, ScannedRow};
pub use storage::buffer::{BufferPool, BufferPoolError, EvictionPolicy};
pub use index::btree::{BTreeError, BTreeIndex};
pub use transaction::{LockManager, Transaction, TransactionError, TransactionManager};
pub use table::{SharedTable, Table, TableError};
