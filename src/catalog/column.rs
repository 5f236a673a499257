// Column Management Module
//
// This module defines the Column type that represents one field of a table schema.

use super::schema::DataType;
use serde::{Serialize, Deserialize};

/// Represents a column in a table schema
///
/// Persisted as `{"column": <name>, "type": "INT" | "VARCHAR"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    #[serde(rename = "column")]
    name: String,
    /// Column data type
    #[serde(rename = "type")]
    data_type: DataType,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Column {
            name: name.into(),
            data_type,
        }
    }

    /// Shorthand for an INT column
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Int)
    }

    /// Shorthand for a VARCHAR column
    pub fn varchar(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Varchar)
    }

    /// Get the column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the column data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}
