use std::borrow::Borrow;

use crate::common::types::RowLocation;
use crate::index::btree::error::BTreeError;
use crate::index::btree::node::BTreeNode;

/// In-memory B-tree index mapping column values to row locations
///
/// Every node except the root holds between t - 1 and 2t - 1 keys, where t is
/// the minimum degree. A key is stored once; repeated inserts of the same key
/// append to its location list.
#[derive(Debug, Clone)]
pub struct BTreeIndex<K = String> {
    pub(crate) root: Option<BTreeNode<K>>,
    pub(crate) min_degree: usize,
    pub(crate) key_count: usize,
    pub(crate) location_count: usize,
}

impl<K: Ord> BTreeIndex<K> {
    /// Create an empty index with minimum degree `min_degree`
    pub fn new(min_degree: usize) -> Result<Self, BTreeError> {
        if min_degree < 2 {
            return Err(BTreeError::InvalidDegree(min_degree));
        }

        Ok(Self {
            root: None,
            min_degree,
            key_count: 0,
            location_count: 0,
        })
    }

    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.key_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of indexed locations across all keys
    pub fn location_count(&self) -> usize {
        self.location_count
    }

    /// Number of levels, 0 for an empty index
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_ref();
        while let Some(current) = node {
            height += 1;
            node = current.children.first();
        }
        height
    }

    /// Find the locations stored under `key`
    ///
    /// Returns `None` when the key was never inserted.
    pub fn search<Q>(&self, key: &Q) -> Option<&[RowLocation]>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_ref()?;
        loop {
            match node.find_key_index(key) {
                Ok(i) => return Some(&node.keys[i].locations),
                Err(_) if node.is_leaf => return None,
                Err(i) => node = &node.children[i],
            }
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }
}
