use thiserror::Error;

use crate::common::types::{RowLocation, TxnId};
use crate::storage::error::StorageError;
use crate::transaction::transaction::TransactionState;

/// Errors that can occur during transaction processing
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Row {row} is locked by transaction {holder}, requested by transaction {requester}")]
    LockConflict {
        row: RowLocation,
        holder: TxnId,
        requester: TxnId,
    },

    #[error("Transaction {txn} is {state:?}, expected Active")]
    InvalidState { txn: TxnId, state: TransactionState },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for transaction operations
pub type Result<T> = std::result::Result<T, TransactionError>;
