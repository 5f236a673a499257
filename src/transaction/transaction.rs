use std::sync::Arc;
use linked_hash_map::LinkedHashMap;
use log::{debug, warn};

use crate::catalog::Record;
use crate::common::types::{RowLocation, TxnId};
use crate::storage::heap::{HeapStore, RowData};
use crate::transaction::error::{Result, TransactionError};
use crate::transaction::lock_manager::LockManager;

/// Transaction states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Active,
    Committed,
    Aborted,
}

/// A unit of work over heap store rows
///
/// Writes lock their row on first touch and are buffered until commit. The
/// growing phase lasts until `commit` or `rollback`, which release every lock
/// at once. A transaction dropped while still active is rolled back.
pub struct Transaction {
    id: TxnId,
    state: TransactionState,
    lock_manager: Arc<LockManager>,
    locked_rows: Vec<RowLocation>,
    pending: LinkedHashMap<RowLocation, Record>,
}

impl Transaction {
    pub(crate) fn new(id: TxnId, lock_manager: Arc<LockManager>) -> Self {
        Self {
            id,
            state: TransactionState::Active,
            lock_manager,
            locked_rows: Vec::new(),
            pending: LinkedHashMap::new(),
        }
    }

    pub fn id(&self) -> TxnId {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Rows locked by this transaction, in locking order
    pub fn locked_rows(&self) -> &[RowLocation] {
        &self.locked_rows
    }

    /// Rows with a buffered write
    pub fn write_set(&self) -> Vec<RowLocation> {
        self.pending.keys().copied().collect()
    }

    /// Read a row, seeing this transaction's own buffered writes first
    pub fn read(&self, store: &HeapStore, row: RowLocation) -> Result<RowData> {
        self.ensure_active()?;
        if let Some(record) = self.pending.get(&row) {
            return Ok(RowData::Decoded(record.clone()));
        }
        Ok(store.read_row(row)?)
    }

    /// Buffer a new version of a row, locking it on first touch
    pub fn write(&mut self, row: RowLocation, record: Record) -> Result<()> {
        self.ensure_active()?;
        if !self.locked_rows.contains(&row) {
            self.lock_manager.acquire(row, self.id)?;
            self.locked_rows.push(row);
        }

        match self.pending.get_mut(&row) {
            Some(existing) => *existing = record,
            None => {
                self.pending.insert(row, record);
            }
        }
        Ok(())
    }

    /// Apply buffered writes in write order, then release every lock
    ///
    /// Writes are applied with in-place updates. If one fails the transaction
    /// is aborted and its locks released; writes applied before the failure
    /// stay on disk.
    pub fn commit(&mut self, store: &mut HeapStore) -> Result<()> {
        self.ensure_active()?;

        let failure = self
            .pending
            .iter()
            .find_map(|(row, record)| store.update_at(*row, record).err().map(|e| (*row, e)));

        if let Some((row, e)) = failure {
            warn!("Transaction {} failed to write row {}: {}", self.id, row, e);
            self.finish(TransactionState::Aborted);
            return Err(e.into());
        }

        debug!(
            "Transaction {} committed {} writes",
            self.id,
            self.pending.len()
        );
        self.finish(TransactionState::Committed);
        Ok(())
    }

    /// Discard buffered writes and release every lock
    pub fn rollback(&mut self) -> Result<()> {
        self.ensure_active()?;
        debug!(
            "Transaction {} rolled back, discarding {} writes",
            self.id,
            self.pending.len()
        );
        self.finish(TransactionState::Aborted);
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        if self.state != TransactionState::Active {
            return Err(TransactionError::InvalidState {
                txn: self.id,
                state: self.state,
            });
        }
        Ok(())
    }

    fn finish(&mut self, state: TransactionState) {
        self.lock_manager.release_all(self.id, &self.locked_rows);
        self.locked_rows.clear();
        self.pending.clear();
        self.state = state;
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Active {
            debug!("Transaction {} dropped while active, rolling back", self.id);
            self.finish(TransactionState::Aborted);
        }
    }
}
