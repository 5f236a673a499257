mod base;
mod operations;
mod range_scan;
mod verify;

pub use base::BTreeIndex;
