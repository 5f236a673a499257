use std::path::{Path, PathBuf};

use crate::common::types::{DEFAULT_BLOCK_SIZE, DEFAULT_STORAGE_SIZE};

/// Configuration shared by every table of a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding record files, usage side files and schema descriptors
    pub data_dir: PathBuf,

    /// Size of one block in bytes
    pub block_size: usize,

    /// Maximum size of a table's record file in bytes
    pub storage_size: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            block_size: DEFAULT_BLOCK_SIZE,
            storage_size: DEFAULT_STORAGE_SIZE,
        }
    }
}

impl StoreConfig {
    /// Create a configuration rooted at the given data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_storage_size(mut self, storage_size: u64) -> Self {
        self.storage_size = storage_size;
        self
    }

    /// Path of a table's record file
    pub fn record_file(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.data", table))
    }

    /// Path of a table's block usage side file
    pub fn usage_file(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}-space.data", table))
    }

    /// Path of a table's schema descriptor
    pub fn schema_file(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}-schema.json", table))
    }
}
