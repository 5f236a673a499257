use std::cmp::Ordering;
use std::mem;
use log::trace;

use crate::common::types::RowLocation;
use crate::index::btree::index::base::BTreeIndex;
use crate::index::btree::node::{BTreeNode, KeyEntry};

impl<K: Ord> BTreeIndex<K> {
    /// Insert a key with the location of a row carrying it
    ///
    /// A full root is split before descending, so the tree grows only at the
    /// top and all leaves stay at the same depth.
    pub fn insert(&mut self, key: K, location: RowLocation) {
        let t = self.min_degree;

        match &mut self.root {
            Some(root) => {
                if root.is_full(t) {
                    let old_root = mem::replace(root, BTreeNode::new_internal());
                    root.children.push(old_root);
                    root.split_child(0, t);
                    trace!("Split root, tree grows one level");
                }
                if Self::insert_non_full(root, key, location, t) {
                    self.key_count += 1;
                }
            }
            None => {
                let mut leaf = BTreeNode::new_leaf();
                leaf.keys.push(KeyEntry::new(key, location));
                self.root = Some(leaf);
                self.key_count = 1;
            }
        }

        self.location_count += 1;
    }

    /// Insert into a subtree whose root is known not to be full
    ///
    /// Returns true when a new key entry was created.
    fn insert_non_full(node: &mut BTreeNode<K>, key: K, location: RowLocation, t: usize) -> bool {
        let mut i = match node.find_key_index(&key) {
            Ok(i) => {
                node.keys[i].locations.push(location);
                return false;
            }
            Err(i) => i,
        };

        if node.is_leaf {
            node.keys.insert(i, KeyEntry::new(key, location));
            return true;
        }

        if node.children[i].is_full(t) {
            node.split_child(i, t);
            match node.keys[i].key.cmp(&key) {
                Ordering::Equal => {
                    node.keys[i].locations.push(location);
                    return false;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => {}
            }
        }

        Self::insert_non_full(&mut node.children[i], key, location, t)
    }
}

impl<K: Ord> Extend<(K, RowLocation)> for BTreeIndex<K> {
    fn extend<I: IntoIterator<Item = (K, RowLocation)>>(&mut self, iter: I) {
        for (key, location) in iter {
            self.insert(key, location);
        }
    }
}
