use anyhow::{Context, Result};

use heapdb::catalog::{Catalog, Column, Record, Schema, Value};
use heapdb::common::config::StoreConfig;
use heapdb::index::btree::BTreeIndex;
use heapdb::table::Table;

const FIRST_NAMES: [&str; 22] = [
    "Olivia", "Emma", "Ava", "Sophia", "Isabella", "Charlotte", "Amelia", "Mia", "Harper",
    "Evelyn", "Abigail", "Emily", "Ella", "Olivia", "Scarlett", "Grace", "Chloe", "Camila",
    "Penelope", "Riley", "Layla", "Olivia",
];

fn main() -> Result<()> {
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| "data".to_string());
    let name_to_search = "Olivia";

    // Positional index: name -> positions in the list
    let mut by_position = BTreeIndex::new(3)?;
    for (position, name) in FIRST_NAMES.iter().enumerate() {
        by_position.insert(name.to_string(), position as u64);
    }
    println!(
        "{} found at positions {:?}",
        name_to_search,
        by_position.search(name_to_search).unwrap_or_default()
    );

    // The same names stored in a heap table and indexed by row location
    let catalog = Catalog::new(StoreConfig::new(&data_dir));
    let schema = Schema::new(vec![Column::int("id"), Column::varchar("name")])?;
    let mut table = Table::create(&catalog, "names", schema).context("Failed to create names table")?;

    for (id, name) in FIRST_NAMES.iter().enumerate() {
        table.insert(&Record::new().with("id", id as u32).with("name", *name))?;
    }
    table.create_index("name")?;

    let locations = table
        .index("name")
        .and_then(|index| index.search(name_to_search))
        .unwrap_or_default();
    println!("{} stored at row locations {:?}", name_to_search, locations);

    for record in table.read_where("name", &Value::from(name_to_search))? {
        println!("  {}", record);
    }

    let stats = table.buffer_pool().stats();
    println!("buffer pool: {} hits, {} misses", stats.hits, stats.misses);

    table.drop_table(&catalog)?;
    Ok(())
}
