use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use heapdb::catalog::{Catalog, Column, DataType, Record, Schema, Value};
use heapdb::common::config::StoreConfig;
use heapdb::common::types::{DEFAULT_BLOCK_SIZE, DEFAULT_STORAGE_SIZE};
use heapdb::storage::allocator::BlockAllocator;
use heapdb::storage::heap::HeapStore;
use heapdb::table::{Table, DEFAULT_INDEX_DEGREE};

#[derive(Parser)]
#[command(author, version, about = "hdb - inspect and edit heapdb tables")]
struct Cli {
    /// Directory holding table files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Block size in bytes
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Storage capacity in bytes
    #[arg(short, long, default_value_t = DEFAULT_STORAGE_SIZE)]
    storage_size: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a table from column definitions such as id:INT name:VARCHAR
    CreateTable {
        table: String,
        #[arg(required = true)]
        columns: Vec<String>,
    },

    /// Insert one record given as column=value pairs
    Insert {
        table: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Print every record with its location
    Scan {
        table: String,
        /// Print stored payloads as hex instead of decoding them
        #[arg(long)]
        raw: bool,
    },

    /// Print the record stored at a location
    Get { table: String, location: u64 },

    /// Look up records by column value through a B-tree index
    Find {
        table: String,
        column: String,
        value: String,
        /// Minimum degree of the index
        #[arg(long, default_value_t = DEFAULT_INDEX_DEGREE)]
        degree: usize,
    },

    /// Print the block usage table
    Usage { table: String },

    /// Remove a table and its files
    DropTable { table: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = StoreConfig::new(&cli.data_dir)
        .with_block_size(cli.block_size)
        .with_storage_size(cli.storage_size);
    BlockAllocator::from_config(&config).context("Invalid --block-size")?;
    let catalog = Catalog::new(config);

    match cli.command {
        Commands::CreateTable { table, columns } => {
            let columns = columns
                .iter()
                .map(|def| parse_column(def))
                .collect::<Result<Vec<_>>>()?;
            let schema = Schema::new(columns)?;
            Table::create(&catalog, &table, schema)
                .with_context(|| format!("Failed to create table {}", table))?;
            println!("Table {} created", table);
        }
        Commands::Insert { table, fields } => {
            let mut t = Table::open(&catalog, &table)?;
            let record = parse_record(&t, &fields)?;
            let location = t.insert(&record)?;
            println!("Inserted at {}", location);
        }
        Commands::Scan { table, raw } => {
            let count = if raw {
                let store = HeapStore::open(catalog.config(), &table, None)?;
                let rows = store.read()?;
                for row in &rows {
                    let bytes = row.data.as_bytes().unwrap_or_default();
                    println!("{}\t{}", row.location, hex::encode(bytes));
                }
                rows.len()
            } else {
                let t = Table::open(&catalog, &table)?;
                let rows = t.scan()?;
                for row in &rows {
                    if let Some(record) = row.data.as_record() {
                        println!("{}\t{}", row.location, record);
                    }
                }
                rows.len()
            };
            println!("({} rows)", count);
        }
        Commands::Get { table, location } => {
            let t = Table::open(&catalog, &table)?;
            let record = t
                .get(location)?
                .ok_or_else(|| anyhow!("No record at {}", location))?;
            println!("{}", record);
        }
        Commands::Find { table, column, value, degree } => {
            let mut t = Table::open(&catalog, &table)?.with_index_degree(degree);
            t.create_index(&column)?;
            let value = parse_value(&t, &column, &value)?;

            let locations = t
                .index(&column)
                .and_then(|index| index.search(value.index_key().as_str()))
                .map(<[u64]>::to_vec)
                .unwrap_or_default();
            println!("Locations: {:?}", locations);
            for record in t.read_where(&column, &value)? {
                println!("{}", record);
            }
        }
        Commands::Usage { table } => {
            let store = HeapStore::open(catalog.config(), &table, None)?;
            println!("block\tbytes_used");
            for usage in store.usage().iter() {
                println!("{}\t{}", usage.block_id, usage.bytes_used);
            }
            println!("file size: {} bytes", store.file_size()?);
        }
        Commands::DropTable { table } => {
            let t = Table::open(&catalog, &table)?;
            t.drop_table(&catalog)?;
            println!("Table {} dropped", table);
        }
    }

    Ok(())
}

fn parse_column(def: &str) -> Result<Column> {
    let (name, data_type) = def
        .split_once(':')
        .ok_or_else(|| anyhow!("Column definition {} must look like name:TYPE", def))?;
    let data_type: DataType = data_type.parse()?;
    Ok(Column::new(name, data_type))
}

fn parse_record(table: &Table, fields: &[String]) -> Result<Record> {
    let mut record = Record::new();
    for field in fields {
        let (column, raw) = field
            .split_once('=')
            .ok_or_else(|| anyhow!("Field {} must look like column=value", field))?;
        record.set(column, parse_value(table, column, raw)?);
    }
    Ok(record)
}

fn parse_value(table: &Table, column: &str, raw: &str) -> Result<Value> {
    let data_type = table
        .schema()
        .and_then(|schema| schema.column(column))
        .map(Column::data_type)
        .ok_or_else(|| anyhow!("Table {} has no column {}", table.name(), column))?;

    match data_type {
        DataType::Int => {
            let v: u32 = raw
                .parse()
                .with_context(|| format!("{} is not a valid INT for column {}", raw, column))?;
            Ok(Value::Int(v))
        }
        DataType::Varchar => Ok(Value::Varchar(raw.to_string())),
    }
}
