use std::collections::HashMap;
use log::trace;
use parking_lot::Mutex;

use crate::common::types::{RowLocation, TxnId};
use crate::transaction::error::{Result, TransactionError};

/// Exclusive row locks, each held by at most one transaction
#[derive(Debug, Default)]
pub struct LockManager {
    locks: Mutex<HashMap<RowLocation, TxnId>>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock on `row` for `txn`
    ///
    /// Re-acquiring a lock the transaction already holds succeeds.
    pub fn acquire(&self, row: RowLocation, txn: TxnId) -> Result<()> {
        let mut locks = self.locks.lock();
        match locks.get(&row) {
            Some(&holder) if holder != txn => Err(TransactionError::LockConflict {
                row,
                holder,
                requester: txn,
            }),
            Some(_) => Ok(()),
            None => {
                locks.insert(row, txn);
                trace!("Transaction {} locked row {}", txn, row);
                Ok(())
            }
        }
    }

    /// Release the locks `txn` holds on `rows` in one step
    pub fn release_all(&self, txn: TxnId, rows: &[RowLocation]) {
        let mut locks = self.locks.lock();
        for row in rows {
            if locks.get(row) == Some(&txn) {
                locks.remove(row);
            }
        }
    }

    /// Transaction holding the lock on `row`, if any
    pub fn holder(&self, row: RowLocation) -> Option<TxnId> {
        self.locks.lock().get(&row).copied()
    }

    pub fn is_locked_by(&self, row: RowLocation, txn: TxnId) -> bool {
        self.holder(row) == Some(txn)
    }

    /// Number of rows currently locked
    pub fn locked_count(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_conflict() {
        let manager = LockManager::new();
        manager.acquire(9, 1).unwrap();
        manager.acquire(9, 1).unwrap();

        match manager.acquire(9, 2) {
            Err(TransactionError::LockConflict { row, holder, requester }) => {
                assert_eq!((row, holder, requester), (9, 1, 2));
            }
            other => panic!("Expected LockConflict, got {:?}", other),
        }
        assert_eq!(manager.holder(9), Some(1));
    }

    #[test]
    fn test_release_only_own_locks() {
        let manager = LockManager::new();
        manager.acquire(0, 1).unwrap();
        manager.acquire(9, 2).unwrap();

        manager.release_all(1, &[0, 9]);
        assert_eq!(manager.holder(0), None);
        assert!(manager.is_locked_by(9, 2));
        assert_eq!(manager.locked_count(), 1);
    }
}
