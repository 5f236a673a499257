// Schema Module
//
// Defines the supported data types and the ordered column list of a table.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use super::column::Column;
use super::error::{CatalogError, Result};

/// Data types supported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    /// 4-byte big-endian unsigned integer
    Int,
    /// 2-byte big-endian length followed by raw bytes
    Varchar,
}

impl FromStr for DataType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "INT" | "INTEGER" => Ok(DataType::Int),
            "VARCHAR" | "TEXT" => Ok(DataType::Varchar),
            other => Err(CatalogError::InvalidSchema(format!("Unknown data type: {}", other))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Varchar => write!(f, "VARCHAR"),
        }
    }
}

/// Ordered list of columns describing a table's record layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Create a schema, rejecting empty column lists and duplicate names
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let schema = Schema { columns };
        schema.validate()?;
        Ok(schema)
    }

    /// Get the columns in layout order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Check if the schema has a column with the given name
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Parse a schema descriptor document
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json)
            .map_err(|e| CatalogError::InvalidSchema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Render the schema descriptor document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(CatalogError::InvalidSchema("schema has no columns".to_string()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name().is_empty() {
                return Err(CatalogError::InvalidSchema("column name is empty".to_string()));
            }
            if !seen.insert(column.name()) {
                return Err(CatalogError::InvalidSchema(format!(
                    "duplicate column: {}",
                    column.name()
                )));
            }
        }

        Ok(())
    }
}
