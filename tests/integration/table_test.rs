use std::sync::Arc;
use std::thread;
use anyhow::Result;
use heapdb::catalog::{Column, Schema, Value};
use heapdb::storage::buffer::EvictionPolicy;
use heapdb::table::{Table, TableError};

#[path = "../common/mod.rs"]
mod common;
use common::{people_schema, person, temp_catalog, FIRST_NAMES};

fn names(records: &[heapdb::catalog::Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str).map(str::to_string))
        .collect()
}

#[test]
fn test_read_where_through_index() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let schema = Schema::new(vec![Column::int("id"), Column::varchar("name")])?;
    let mut table = Table::create(&catalog, "names", schema)?;

    let mut locations = Vec::new();
    for (id, name) in FIRST_NAMES.iter().enumerate() {
        locations.push(table.insert(&heapdb::catalog::Record::new().with("id", id as u32).with("name", *name))?);
    }
    table.create_index("name")?;

    let olivias = table.read_where("name", &Value::from("Olivia"))?;
    let ids: Vec<u32> = olivias
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_int))
        .collect();
    assert_eq!(ids, vec![0, 13, 21]);

    let index = table.index("name").expect("index exists");
    assert_eq!(
        index.search("Olivia"),
        Some(&[locations[0], locations[13], locations[21]][..])
    );

    // Second lookup is served from the buffer pool
    table.read_where("name", &Value::from("Olivia"))?;
    let stats = table.buffer_pool().stats();
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.hits, 3);
    Ok(())
}

#[test]
fn test_insert_after_index_keeps_index_current() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    table.create_index("country")?;

    table.insert(&person(1, "Alice", "US"))?;
    table.insert(&person(2, "Anita", "ES"))?;
    table.insert(&person(3, "Carlos", "ES"))?;

    assert_eq!(
        names(&table.read_where("country", &Value::from("ES"))?),
        vec!["Anita", "Carlos"]
    );
    assert!(table.read_where("country", &Value::from("FR"))?.is_empty());
    Ok(())
}

#[test]
fn test_read_where_all_intersects_indexes() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?
        .with_buffer_pool(2, EvictionPolicy::Fifo)?;

    for (id, name, country) in [
        (1, "Alice", "US"),
        (2, "Jonathan", "US"),
        (3, "Anita", "ES"),
        (4, "Alice", "ES"),
        (5, "Alice", "US"),
    ] {
        table.insert(&person(id, name, country))?;
    }
    table.create_index("name")?;
    table.create_index("country")?;

    let found = table.read_where_all(&[("name", Value::from("Alice")), ("country", Value::from("US"))])?;
    let ids: Vec<u32> = found
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_int))
        .collect();
    assert_eq!(ids, vec![1, 5]);

    assert!(matches!(
        table.read_where_all(&[("id", Value::from(1u32))]),
        Err(TableError::NotIndexed(_))
    ));
    Ok(())
}

#[test]
fn test_int_index_does_not_match_varchar_lookalike() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    table.insert(&person(7, "Seven", "US"))?;
    table.create_index("id")?;

    assert_eq!(table.read_where("id", &Value::from(7u32))?.len(), 1);
    assert!(table.read_where("id", &Value::from("7"))?.is_empty());
    Ok(())
}

#[test]
fn test_reopen_and_drop() -> Result<()> {
    let (dir, catalog) = temp_catalog()?;
    {
        let mut table = Table::create(&catalog, "people", people_schema()?)?;
        table.insert(&person(1, "Alice", "US"))?;
    }

    let table = Table::open(&catalog, "people")?;
    assert_eq!(table.scan()?.len(), 1);
    assert_eq!(table.schema(), Some(&people_schema()?));

    table.drop_table(&catalog)?;
    assert!(!catalog.has_table("people"));
    assert!(!dir.path().join("people.data").exists());
    assert!(!dir.path().join("people-space.data").exists());
    assert!(Table::open(&catalog, "people").is_err());
    Ok(())
}

#[test]
fn test_shared_table_serializes_writers() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    table.create_index("country")?;
    let shared = table.into_shared();

    let handles: Vec<_> = (0..4u32)
        .map(|worker| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || -> Result<()> {
                for i in 0..10u32 {
                    let id = worker * 100 + i;
                    shared.lock().insert(&person(id, "Worker", "US"))?;
                }
                Ok(())
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked")?;
    }

    let table = shared.lock();
    assert_eq!(table.scan()?.len(), 40);
    assert_eq!(table.index("country").map(|i| i.location_count()), Some(40));
    Ok(())
}
