// Index Module
//
// Secondary indexes over heap stores, plus multi-index intersection.

pub mod btree;
pub mod leapfrog;

pub use btree::{BTreeError, BTreeIndex};
