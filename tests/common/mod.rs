#![allow(dead_code)]

use anyhow::Result;
use tempfile::TempDir;
use heapdb::catalog::{Catalog, Column, Record, Schema};
use heapdb::common::config::StoreConfig;
use heapdb::storage::heap::HeapStore;

pub const FIRST_NAMES: [&str; 22] = [
    "Olivia", "Emma", "Ava", "Sophia", "Isabella", "Charlotte", "Amelia", "Mia", "Harper",
    "Evelyn", "Abigail", "Emily", "Ella", "Olivia", "Scarlett", "Grace", "Chloe", "Camila",
    "Penelope", "Riley", "Layla", "Olivia",
];

// Create a catalog over a fresh temporary data directory
pub fn temp_catalog() -> Result<(TempDir, Catalog)> {
    let dir = TempDir::new()?;
    let catalog = Catalog::new(StoreConfig::new(dir.path()));
    Ok((dir, catalog))
}

// Open a schema-less store in a fresh temporary data directory
pub fn temp_raw_store(config: impl FnOnce(StoreConfig) -> StoreConfig) -> Result<(TempDir, HeapStore)> {
    let dir = TempDir::new()?;
    let store = HeapStore::open(&config(StoreConfig::new(dir.path())), "raw", None)?;
    Ok((dir, store))
}

pub fn people_schema() -> Result<Schema> {
    Ok(Schema::new(vec![
        Column::int("id"),
        Column::varchar("name"),
        Column::varchar("country"),
    ])?)
}

pub fn person(id: u32, name: &str, country: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("country", country)
}
