//! Catalog Management Module
//!
//! Table schemas live next to the table data as JSON descriptors. The catalog
//! creates, loads and removes them; the storage layer consumes them read-only.

pub mod column;
pub mod error;
pub mod schema;
pub mod value;

// Re-export key types
pub use self::column::Column;
pub use self::error::CatalogError;
pub use self::schema::{DataType, Schema};
pub use self::value::{Record, Value};

use std::fs;
use std::io::ErrorKind;
use log::info;

use crate::common::config::StoreConfig;
use self::error::Result;

/// The Catalog is the central repository for table schema descriptors
#[derive(Debug, Clone)]
pub struct Catalog {
    config: StoreConfig,
}

impl Catalog {
    /// Create a catalog over the configured data directory
    pub fn new(config: StoreConfig) -> Self {
        Catalog { config }
    }

    /// Get the store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Persist a table's schema descriptor, replacing any existing one
    pub fn create_table(&self, table: &str, schema: &Schema) -> Result<()> {
        fs::create_dir_all(&self.config.data_dir)?;
        fs::write(self.config.schema_file(table), schema.to_json()?)?;
        info!("Created schema for table {} ({} columns)", table, schema.len());
        Ok(())
    }

    /// Check if a schema descriptor exists for the table
    pub fn has_table(&self, table: &str) -> bool {
        self.config.schema_file(table).exists()
    }

    /// Load a table's schema descriptor
    pub fn load_schema(&self, table: &str) -> Result<Schema> {
        let path = self.config.schema_file(table);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::SchemaNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };
        Schema::from_json(&json)
    }

    /// Remove a table's schema descriptor
    pub fn drop_table(&self, table: &str) -> Result<()> {
        match fs::remove_file(self.config.schema_file(table)) {
            Ok(()) => {
                info!("Dropped schema for table {}", table);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
