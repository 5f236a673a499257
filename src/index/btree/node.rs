use std::borrow::Borrow;

use crate::common::types::RowLocation;

/// A key and the locations of every row carrying it, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry<K> {
    pub key: K,
    pub locations: Vec<RowLocation>,
}

impl<K> KeyEntry<K> {
    pub fn new(key: K, location: RowLocation) -> Self {
        Self {
            key,
            locations: vec![location],
        }
    }
}

/// B-tree node implementation
/// - Keys are strictly ordered and each appears once, with its location list
/// - An internal node with k keys owns k + 1 children
/// - Leaf nodes own no children
#[derive(Debug, Clone)]
pub struct BTreeNode<K> {
    pub is_leaf: bool,
    pub keys: Vec<KeyEntry<K>>,
    pub children: Vec<BTreeNode<K>>,
}

impl<K: Ord> BTreeNode<K> {
    pub fn new_leaf() -> Self {
        Self {
            is_leaf: true,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn new_internal() -> Self {
        Self {
            is_leaf: false,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Find the position of a key in the node using binary search
    ///
    /// `Err(i)` is the insertion point, which is also the index of the child
    /// whose range covers the key.
    pub fn find_key_index<Q>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.keys.binary_search_by(|entry| entry.key.borrow().cmp(key))
    }

    /// Check if the node holds the maximum 2t - 1 keys
    pub fn is_full(&self, min_degree: usize) -> bool {
        self.keys.len() >= 2 * min_degree - 1
    }

    /// Split the full child at index `i`
    ///
    /// The upper t - 1 keys (and the upper t children of an internal child)
    /// move to a new sibling seated at `i + 1`; the median key rises into this
    /// node at position `i`.
    pub fn split_child(&mut self, i: usize, min_degree: usize) {
        let full = &mut self.children[i];
        debug_assert!(full.is_full(min_degree), "split_child called on non-full node");

        let mut upper_keys = full.keys.split_off(min_degree - 1);
        let median = upper_keys.remove(0);

        let mut sibling = if full.is_leaf {
            Self::new_leaf()
        } else {
            Self::new_internal()
        };
        sibling.keys = upper_keys;
        if !full.is_leaf {
            sibling.children = full.children.split_off(min_degree);
        }

        self.keys.insert(i, median);
        self.children.insert(i + 1, sibling);
    }
}
