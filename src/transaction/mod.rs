// Transaction Module
//
// Two-phase locking over heap store rows: locks are taken on first write and
// released together at commit or rollback.

pub mod error;
pub mod lock_manager;
pub mod transaction;
pub mod transaction_manager;

pub use error::TransactionError;
pub use lock_manager::LockManager;
pub use transaction::{Transaction, TransactionState};
pub use transaction_manager::TransactionManager;
