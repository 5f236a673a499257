// Table Module
//
// A heap store together with its secondary indexes and record cache.

pub mod error;

use std::sync::Arc;
use linked_hash_map::LinkedHashMap;
use log::{debug, info};
use parking_lot::Mutex;

use crate::catalog::{Catalog, Record, Schema, Value};
use crate::common::types::RowLocation;
use crate::index::btree::BTreeIndex;
use crate::index::leapfrog;
use crate::storage::buffer::{BufferPool, EvictionPolicy};
use crate::storage::heap::{HeapStore, ScannedRow};
use crate::transaction::Transaction;

pub use error::TableError;
use error::Result;

/// Minimum degree of indexes built by `create_index`
pub const DEFAULT_INDEX_DEGREE: usize = 3;

/// Rows kept resident by a table's buffer pool
pub const DEFAULT_POOL_CAPACITY: usize = 3;

/// One exclusive section per table for multi-threaded callers
pub type SharedTable = Arc<Mutex<Table>>;

/// A table with string-keyed B-tree indexes and a record cache
///
/// Indexes live in memory only and are rebuilt from a scan by
/// `create_index` after the table is opened.
pub struct Table {
    store: HeapStore,
    indexes: LinkedHashMap<String, BTreeIndex<String>>,
    pool: BufferPool,
    index_degree: usize,
}

impl Table {
    /// Register a schema in the catalog and open the new table
    pub fn create(catalog: &Catalog, name: &str, schema: Schema) -> Result<Self> {
        catalog.create_table(name, &schema)?;
        Self::open(catalog, name)
    }

    /// Open an existing table using its catalog schema
    pub fn open(catalog: &Catalog, name: &str) -> Result<Self> {
        let store = HeapStore::open_with_catalog(catalog, name)?;
        Ok(Self {
            store,
            indexes: LinkedHashMap::new(),
            pool: BufferPool::new(DEFAULT_POOL_CAPACITY, EvictionPolicy::default())?,
            index_degree: DEFAULT_INDEX_DEGREE,
        })
    }

    /// Replace the buffer pool, dropping anything cached so far
    pub fn with_buffer_pool(mut self, capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        self.pool = BufferPool::new(capacity, policy)?;
        Ok(self)
    }

    /// Minimum degree used for indexes created from now on
    pub fn with_index_degree(mut self, degree: usize) -> Self {
        self.index_degree = degree;
        self
    }

    pub fn into_shared(self) -> SharedTable {
        Arc::new(Mutex::new(self))
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.store.schema()
    }

    pub fn store(&self) -> &HeapStore {
        &self.store
    }

    pub fn buffer_pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn index(&self, column: &str) -> Option<&BTreeIndex<String>> {
        self.indexes.get(column)
    }

    pub fn indexed_columns(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    /// Build an index over `column` from a full scan
    ///
    /// An existing index on the column is rebuilt.
    pub fn create_index(&mut self, column: &str) -> Result<()> {
        self.check_column(column)?;

        let mut index = BTreeIndex::new(self.index_degree)?;
        for row in self.store.read()? {
            if let Some(value) = row.data.as_record().and_then(|r| r.get(column)) {
                index.insert(value.index_key(), row.location);
            }
        }

        info!(
            "Built index on {}.{} ({} keys, height {})",
            self.name(),
            column,
            index.len(),
            index.height()
        );
        self.indexes.insert(column.to_string(), index);
        Ok(())
    }

    /// Store a record and add it to every index
    pub fn insert(&mut self, record: &Record) -> Result<RowLocation> {
        let location = self.store.insert(record)?;
        for (column, index) in self.indexes.iter_mut() {
            if let Some(value) = record.get(column) {
                index.insert(value.index_key(), location);
            }
        }
        Ok(location)
    }

    /// Every row in physical order
    pub fn scan(&self) -> Result<Vec<ScannedRow>> {
        Ok(self.store.read()?)
    }

    /// Fetch one record through the buffer pool
    pub fn get(&self, location: RowLocation) -> Result<Option<Record>> {
        Ok(self.pool.fetch(&self.store, location)?.into_record())
    }

    /// Records whose `column` equals `value`
    ///
    /// Indexed columns are looked up in their index and read through the
    /// buffer pool; other columns fall back to a full scan.
    pub fn read_where(&self, column: &str, value: &Value) -> Result<Vec<Record>> {
        self.check_column(column)?;

        let Some(index) = self.indexes.get(column) else {
            debug!("No index on {}.{}, scanning", self.name(), column);
            return Ok(self
                .store
                .read()?
                .into_iter()
                .filter_map(|row| row.data.into_record())
                .filter(|record| record.get(column) == Some(value))
                .collect());
        };

        let locations = index.search(value.index_key().as_str()).unwrap_or_default();
        self.fetch_matching(locations, &[(column, value)])
    }

    /// Records matching every `(column, value)` condition
    ///
    /// All columns must be indexed. Location lists are intersected with a
    /// leapfrog join before any record is read.
    pub fn read_where_all(&self, conditions: &[(&str, Value)]) -> Result<Vec<Record>> {
        let mut lists: Vec<&[RowLocation]> = Vec::with_capacity(conditions.len());
        for (column, value) in conditions {
            self.check_column(column)?;
            let index = self
                .indexes
                .get(*column)
                .ok_or_else(|| TableError::NotIndexed(column.to_string()))?;
            lists.push(index.search(value.index_key().as_str()).unwrap_or_default());
        }

        let locations = leapfrog::intersect(&lists);
        let conditions: Vec<(&str, &Value)> =
            conditions.iter().map(|(column, value)| (*column, value)).collect();
        self.fetch_matching(&locations, &conditions)
    }

    /// Commit a transaction against this table
    ///
    /// Written rows are dropped from the buffer pool. Indexes whose column
    /// changed value in any written row are rebuilt, also when the commit
    /// fails partway and only some writes reached the store.
    pub fn commit(&mut self, txn: &mut Transaction) -> Result<()> {
        let rows = txn.write_set();
        let before = self.read_rows(&rows)?;

        let outcome = txn.commit(&mut self.store);
        for &row in &rows {
            self.pool.invalidate(row);
        }

        let refreshed = self.refresh_indexes(&rows, &before);
        outcome?;
        refreshed
    }

    /// Remove the table's files and schema descriptor
    pub fn drop_table(self, catalog: &Catalog) -> Result<()> {
        let name = self.store.name().to_string();
        self.store.drop_table()?;
        catalog.drop_table(&name)?;
        Ok(())
    }

    fn read_rows(&self, rows: &[RowLocation]) -> Result<Vec<Option<Record>>> {
        rows.iter()
            .map(|&row| -> Result<Option<Record>> { Ok(self.store.read_row(row)?.into_record()) })
            .collect()
    }

    /// Rebuild indexes on columns whose value differs from `before` in any row
    fn refresh_indexes(&mut self, rows: &[RowLocation], before: &[Option<Record>]) -> Result<()> {
        let after = self.read_rows(rows)?;

        let stale: Vec<String> = self
            .indexes
            .keys()
            .filter(|column| {
                before.iter().zip(&after).any(|(old, new)| {
                    old.as_ref().and_then(|r| r.get(column.as_str()))
                        != new.as_ref().and_then(|r| r.get(column.as_str()))
                })
            })
            .cloned()
            .collect();
        for column in stale {
            self.create_index(&column)?;
        }
        Ok(())
    }

    fn check_column(&self, column: &str) -> Result<()> {
        match self.store.schema() {
            Some(schema) if schema.has_column(column) => Ok(()),
            _ => Err(TableError::UnknownColumn {
                table: self.name().to_string(),
                column: column.to_string(),
            }),
        }
    }

    fn fetch_matching(
        &self,
        locations: &[RowLocation],
        conditions: &[(&str, &Value)],
    ) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(locations.len());
        for &location in locations {
            let Some(record) = self.pool.fetch(&self.store, location)?.into_record() else {
                continue;
            };
            // Index keys are strings, so INT 7 and VARCHAR "7" share a key
            if conditions
                .iter()
                .all(|(column, value)| record.get(column) == Some(*value))
            {
                records.push(record);
            }
        }
        Ok(records)
    }
}
