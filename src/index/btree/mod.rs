mod node;
mod error;
mod index;

pub use node::{BTreeNode, KeyEntry};
pub use error::BTreeError;
pub use index::BTreeIndex;
