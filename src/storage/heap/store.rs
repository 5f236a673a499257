use std::fs;
use std::io::ErrorKind;
use log::{info, warn};

use crate::catalog::{Catalog, Record, Schema};
use crate::common::config::StoreConfig;
use crate::common::types::{RowLocation, LENGTH_PREFIX_SIZE};
use crate::storage::allocator::{BlockAllocator, BlockUsageTable};
use crate::storage::codec;
use crate::storage::disk::HeapFile;
use crate::storage::error::{Result, StorageError};
use super::scan::{HeapScan, ScannedRow};

/// A stored row: decoded when the table has a schema, raw payload otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowData {
    Raw(Vec<u8>),
    Decoded(Record),
}

impl RowData {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            RowData::Decoded(record) => Some(record),
            RowData::Raw(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            RowData::Decoded(record) => Some(record),
            RowData::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RowData::Raw(bytes) => Some(bytes),
            RowData::Decoded(_) => None,
        }
    }
}

/// Block-oriented heap store for one table
///
/// Owns the record file and the block usage table. Every insert rewrites the
/// usage side file in full, after the record bytes hit the record file. The
/// two writes are not atomic: if the process stops in between, the record is on
/// disk but its block usage is not, and a later insert can be placed over it.
pub struct HeapStore {
    name: String,
    config: StoreConfig,
    file: HeapFile,
    usage: BlockUsageTable,
    allocator: BlockAllocator,
    schema: Option<Schema>,
}

impl HeapStore {
    /// Open (or create) a table's record file and usage table
    ///
    /// Fails with `InvalidConfig` before touching the data directory when the
    /// configured block size is unusable.
    ///
    /// An unreadable usage side file is logged and replaced by an empty table,
    /// which makes the allocator append until blocks are recorded again.
    pub fn open(config: &StoreConfig, name: &str, schema: Option<Schema>) -> Result<Self> {
        let allocator = BlockAllocator::from_config(config)?;
        fs::create_dir_all(&config.data_dir)?;
        let file = HeapFile::open(config.record_file(name))?;

        let usage = match BlockUsageTable::load(config.usage_file(name)) {
            Ok(usage) => usage,
            Err(StorageError::UsageMapCorrupt(reason)) => {
                warn!("Ignoring corrupt block usage map of table {}: {}", name, reason);
                BlockUsageTable::new()
            }
            Err(e) => return Err(e),
        };

        info!(
            "Opened table {} ({} bytes, {} blocks recorded)",
            name,
            file.len()?,
            usage.len()
        );

        Ok(Self {
            name: name.to_string(),
            config: config.clone(),
            file,
            usage,
            allocator,
            schema,
        })
    }

    /// Open a table using the schema stored in the catalog
    pub fn open_with_catalog(catalog: &Catalog, name: &str) -> Result<Self> {
        let schema = catalog.load_schema(name)?;
        Self::open(catalog.config(), name, Some(schema))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn block_size(&self) -> usize {
        self.allocator.block_size()
    }

    /// Get the in-memory block usage table
    pub fn usage(&self) -> &BlockUsageTable {
        &self.usage
    }

    /// Current size of the record file in bytes
    pub fn file_size(&self) -> Result<u64> {
        self.file.len()
    }

    /// Encode and store a record, returning its location
    pub fn insert(&mut self, record: &Record) -> Result<RowLocation> {
        let schema = self.schema.as_ref().ok_or_else(|| {
            StorageError::SchemaMismatch(format!("table {} has no schema", self.name))
        })?;
        let bytes = codec::encode(record, schema)?;
        self.store(&bytes)
    }

    /// Store an already encoded payload, returning its location
    pub fn insert_raw(&mut self, payload: &[u8]) -> Result<RowLocation> {
        let bytes = codec::frame(payload)?;
        self.store(&bytes)
    }

    fn store(&mut self, bytes: &[u8]) -> Result<RowLocation> {
        // The scanner reads a zero length prefix as block filler
        if bytes.len() <= LENGTH_PREFIX_SIZE {
            return Err(StorageError::SchemaMismatch(
                "record encodes to an empty payload".to_string(),
            ));
        }

        let file_size = self.file.len()?;
        let placement = self.allocator.place_record(bytes.len(), file_size, &self.usage)?;

        self.file.write_at(placement.insertion_offset, bytes)?;
        self.usage.record(placement.block_id, placement.new_used_space);
        self.usage.persist(self.config.usage_file(&self.name))?;

        Ok(placement.insertion_offset)
    }

    /// Scan the record file block by block
    ///
    /// Yields one result per record so that a record which fails to decode
    /// does not end the scan.
    pub fn scan(&self) -> Result<HeapScan<'_>> {
        HeapScan::new(self)
    }

    /// Read every readable record in file order
    ///
    /// Records that fail to decode are logged and skipped; I/O errors abort.
    pub fn read(&self) -> Result<Vec<ScannedRow>> {
        let mut rows = Vec::new();
        for item in self.scan()? {
            match item {
                Ok(row) => rows.push(row),
                Err(StorageError::Io(e)) => return Err(StorageError::Io(e)),
                Err(e) => warn!("Skipping unreadable record in table {}: {}", self.name, e),
            }
        }
        Ok(rows)
    }

    /// Fetch the record at `location` whose payload is `length` bytes long
    pub fn read_at(&self, location: RowLocation, length: usize) -> Result<RowData> {
        let bytes = self.file.read_at(location, LENGTH_PREFIX_SIZE + length)?;
        let stored = codec::read_length_prefix(&bytes).unwrap_or_default();
        if stored != length {
            return Err(StorageError::InvalidLocation {
                location,
                reason: format!("length prefix says {} bytes, expected {}", stored, length),
            });
        }
        self.materialize(&bytes[LENGTH_PREFIX_SIZE..])
    }

    /// Fetch the record at `location`, reading its length prefix first
    pub fn read_row(&self, location: RowLocation) -> Result<RowData> {
        let length = self.stored_length(location)?;
        self.read_at(location, length)
    }

    /// Rewrite the record at `location` in place
    ///
    /// Only allowed when the encoded size does not change, so neighbouring
    /// records and the block usage stay valid.
    pub fn update_at(&mut self, location: RowLocation, record: &Record) -> Result<()> {
        let schema = self.schema.as_ref().ok_or_else(|| {
            StorageError::SchemaMismatch(format!("table {} has no schema", self.name))
        })?;
        let bytes = codec::encode(record, schema)?;

        let old = self.stored_length(location)?;
        let new = bytes.len() - LENGTH_PREFIX_SIZE;
        if old != new {
            return Err(StorageError::RecordSizeChanged { location, old, new });
        }

        self.file.write_at(location, &bytes)
    }

    /// Flush the record file to stable storage
    pub fn sync(&self) -> Result<()> {
        self.file.sync()
    }

    /// Close the table and remove its record file and usage side file
    pub fn drop_table(self) -> Result<()> {
        let HeapStore { name, config, file, .. } = self;
        drop(file);

        for path in [config.record_file(&name), config.usage_file(&name)] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        info!("Dropped table {}", name);
        Ok(())
    }

    fn stored_length(&self, location: RowLocation) -> Result<usize> {
        let prefix = self.file.read_at(location, LENGTH_PREFIX_SIZE)?;
        match codec::read_length_prefix(&prefix) {
            Some(0) | None => Err(StorageError::InvalidLocation {
                location,
                reason: "no record starts here".to_string(),
            }),
            Some(length) => Ok(length),
        }
    }

    pub(super) fn materialize(&self, payload: &[u8]) -> Result<RowData> {
        match &self.schema {
            Some(schema) => Ok(RowData::Decoded(codec::decode_payload(payload, schema)?)),
            None => Ok(RowData::Raw(payload.to_vec())),
        }
    }

    pub(super) fn file(&self) -> &HeapFile {
        &self.file
    }
}
