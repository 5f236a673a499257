use std::borrow::Borrow;

use crate::common::types::RowLocation;
use crate::index::btree::index::base::BTreeIndex;
use crate::index::btree::node::BTreeNode;

impl<K: Ord> BTreeIndex<K> {
    /// All keys with their locations, in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[RowLocation])> {
        let mut out = Vec::with_capacity(self.key_count);
        if let Some(root) = &self.root {
            collect_entries(root, &mut out);
        }
        out.into_iter()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Locations of every key in the inclusive range `start..=end`
    ///
    /// Locations come grouped by key in ascending key order, and in insertion
    /// order within a key. An inverted range yields nothing.
    pub fn range_scan<Q>(&self, start: &Q, end: &Q) -> Vec<RowLocation>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut out = Vec::new();
        if start > end {
            return out;
        }
        if let Some(root) = &self.root {
            collect_range(root, start, end, &mut out);
        }
        out
    }
}

fn collect_entries<'a, K>(node: &'a BTreeNode<K>, out: &mut Vec<(&'a K, &'a [RowLocation])>) {
    for (i, entry) in node.keys.iter().enumerate() {
        if !node.is_leaf {
            collect_entries(&node.children[i], out);
        }
        out.push((&entry.key, &entry.locations));
    }
    if let Some(last) = node.children.last() {
        collect_entries(last, out);
    }
}

fn collect_range<K, Q>(node: &BTreeNode<K>, start: &Q, end: &Q, out: &mut Vec<RowLocation>)
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    for (i, entry) in node.keys.iter().enumerate() {
        let key = entry.key.borrow();
        if !node.is_leaf && key > start {
            collect_range(&node.children[i], start, end, out);
        }
        if key > end {
            return;
        }
        if key >= start {
            out.extend_from_slice(&entry.locations);
        }
    }
    if let Some(last) = node.children.last() {
        collect_range(last, start, end, out);
    }
}
