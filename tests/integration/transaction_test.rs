use anyhow::Result;
use heapdb::catalog::{Record, Value};
use heapdb::storage::StorageError;
use heapdb::table::{Table, TableError};
use heapdb::transaction::{TransactionError, TransactionManager, TransactionState};

#[path = "../common/mod.rs"]
mod common;
use common::{people_schema, person, temp_catalog};

fn id_of(record: &Record) -> Option<u32> {
    record.get("id").and_then(Value::as_int)
}

#[test]
fn test_conflict_until_first_commits() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    let row = table.insert(&person(1, "Alice", "US"))?;

    let tm = TransactionManager::new();
    let mut a = tm.begin();
    let mut b = tm.begin();

    a.write(row, person(2, "Alice", "US"))?;
    match b.write(row, person(3, "Alice", "US")) {
        Err(TransactionError::LockConflict { row: locked, holder, requester }) => {
            assert_eq!(locked, row);
            assert_eq!(holder, a.id());
            assert_eq!(requester, b.id());
        }
        other => panic!("Expected LockConflict, got {:?}", other),
    }

    table.commit(&mut a)?;
    assert_eq!(a.state(), TransactionState::Committed);

    b.write(row, person(3, "Alice", "US"))?;
    table.commit(&mut b)?;
    assert_eq!(table.get(row)?.as_ref().and_then(id_of), Some(3));
    Ok(())
}

#[test]
fn test_rollback_discards_writes() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    let row = table.insert(&person(1, "Alice", "US"))?;

    let tm = TransactionManager::new();
    let mut txn = tm.begin();
    txn.write(row, person(9, "Alice", "US"))?;
    assert_eq!(txn.read(table.store(), row)?.as_record().and_then(id_of), Some(9));

    txn.rollback()?;
    assert_eq!(tm.lock_manager().locked_count(), 0);
    assert_eq!(table.get(row)?.as_ref().and_then(id_of), Some(1));
    assert!(matches!(
        txn.write(row, person(9, "Alice", "US")),
        Err(TransactionError::InvalidState { .. })
    ));
    Ok(())
}

#[test]
fn test_dropped_transaction_releases_locks() -> Result<()> {
    let tm = TransactionManager::new();
    {
        let mut txn = tm.begin();
        txn.write(0, person(1, "Alice", "US"))?;
        txn.write(22, person(2, "Anita", "ES"))?;
        assert_eq!(tm.lock_manager().locked_count(), 2);
    }
    assert_eq!(tm.lock_manager().locked_count(), 0);

    let mut next = tm.begin();
    next.write(0, person(1, "Alice", "US"))?;
    Ok(())
}

#[test]
fn test_commit_refreshes_cache_and_index() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    let row = table.insert(&person(1, "Alice", "US"))?;
    table.create_index("country")?;

    // Cache the old version
    assert_eq!(table.read_where("country", &Value::from("US"))?.len(), 1);

    let tm = TransactionManager::new();
    let mut txn = tm.begin();
    txn.write(row, person(1, "Alice", "UK"))?;
    table.commit(&mut txn)?;

    assert!(table.read_where("country", &Value::from("US"))?.is_empty());
    let moved = table.read_where("country", &Value::from("UK"))?;
    assert_eq!(moved, vec![person(1, "Alice", "UK")]);
    Ok(())
}

#[test]
fn test_commit_rejects_size_change() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    let row = table.insert(&person(1, "Alice", "US"))?;

    let tm = TransactionManager::new();
    let mut txn = tm.begin();
    txn.write(row, person(1, "Alexandra", "US"))?;

    assert!(matches!(
        table.commit(&mut txn),
        Err(TableError::Transaction(TransactionError::Storage(_)))
    ));
    assert_eq!(txn.state(), TransactionState::Aborted);
    assert_eq!(tm.lock_manager().locked_count(), 0);
    assert_eq!(table.get(row)?, Some(person(1, "Alice", "US")));
    Ok(())
}

#[test]
fn test_partial_commit_refreshes_index() -> Result<()> {
    let (_dir, catalog) = temp_catalog()?;
    let mut table = Table::create(&catalog, "people", people_schema()?)?;
    let ann = table.insert(&person(1, "Ann", "US"))?;
    let bo = table.insert(&person(2, "Bo", "US"))?;
    table.create_index("country")?;

    let tm = TransactionManager::new();
    let mut txn = tm.begin();
    txn.write(ann, person(1, "Ann", "ES"))?;
    // Longer name cannot be rewritten in place
    txn.write(bo, person(2, "Bob", "ES"))?;

    assert!(matches!(
        table.commit(&mut txn),
        Err(TableError::Transaction(TransactionError::Storage(
            StorageError::RecordSizeChanged { .. }
        )))
    ));
    assert_eq!(txn.state(), TransactionState::Aborted);

    // The first write reached the store and the index follows it
    assert_eq!(table.get(ann)?, Some(person(1, "Ann", "ES")));
    assert_eq!(
        table.read_where("country", &Value::from("ES"))?,
        vec![person(1, "Ann", "ES")]
    );
    assert_eq!(
        table.read_where("country", &Value::from("US"))?,
        vec![person(2, "Bo", "US")]
    );
    Ok(())
}
