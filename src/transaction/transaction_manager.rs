use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use log::debug;

use crate::common::types::TxnId;
use crate::transaction::lock_manager::LockManager;
use crate::transaction::transaction::Transaction;

/// Transaction manager - hands out transactions sharing one lock manager
pub struct TransactionManager {
    /// Next transaction ID to assign
    next_txn_id: AtomicU32,

    lock_manager: Arc<LockManager>,
}

impl TransactionManager {
    pub fn new() -> Self {
        Self::with_lock_manager(Arc::new(LockManager::new()))
    }

    pub fn with_lock_manager(lock_manager: Arc<LockManager>) -> Self {
        Self {
            next_txn_id: AtomicU32::new(1), // Start from 1
            lock_manager,
        }
    }

    /// Begin a new transaction
    pub fn begin(&self) -> Transaction {
        let txn_id: TxnId = self.next_txn_id.fetch_add(1, Ordering::SeqCst);
        debug!("Begin transaction {}", txn_id);
        Transaction::new(txn_id, self.lock_manager.clone())
    }

    pub fn lock_manager(&self) -> &Arc<LockManager> {
        &self.lock_manager
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}
