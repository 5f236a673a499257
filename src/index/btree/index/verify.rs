use crate::index::btree::error::BTreeError;
use crate::index::btree::index::base::BTreeIndex;
use crate::index::btree::node::BTreeNode;

/// Running totals gathered while walking the tree
struct Walk {
    leaf_depth: Option<usize>,
    keys: usize,
    locations: usize,
}

impl<K: Ord + std::fmt::Debug> BTreeIndex<K> {
    /// Check every structural invariant of the tree
    ///
    /// Node fill bounds, strict key order across the whole tree, child counts,
    /// uniform leaf depth and non-empty location lists are all checked, along
    /// with the cached key and location totals.
    pub fn verify(&self) -> Result<(), BTreeError> {
        let Some(root) = &self.root else {
            return if self.key_count == 0 && self.location_count == 0 {
                Ok(())
            } else {
                Err(violation(format!(
                    "empty tree reports {} keys and {} locations",
                    self.key_count, self.location_count
                )))
            };
        };

        let mut walk = Walk {
            leaf_depth: None,
            keys: 0,
            locations: 0,
        };
        verify_node(root, self.min_degree, true, 0, None, None, &mut walk)?;

        if walk.keys != self.key_count {
            return Err(violation(format!(
                "found {} keys, index reports {}",
                walk.keys, self.key_count
            )));
        }
        if walk.locations != self.location_count {
            return Err(violation(format!(
                "found {} locations, index reports {}",
                walk.locations, self.location_count
            )));
        }
        Ok(())
    }
}

fn violation(message: String) -> BTreeError {
    BTreeError::InvariantViolated(message)
}

fn verify_node<K: Ord + std::fmt::Debug>(
    node: &BTreeNode<K>,
    t: usize,
    is_root: bool,
    depth: usize,
    lower: Option<&K>,
    upper: Option<&K>,
    walk: &mut Walk,
) -> Result<(), BTreeError> {
    let count = node.keys.len();
    let min_keys = if is_root { 1 } else { t - 1 };
    if count < min_keys || count > 2 * t - 1 {
        return Err(violation(format!(
            "node at depth {} holds {} keys, allowed {}..={}",
            depth,
            count,
            min_keys,
            2 * t - 1
        )));
    }

    for pair in node.keys.windows(2) {
        if pair[0].key >= pair[1].key {
            return Err(violation(format!(
                "keys {:?} and {:?} out of order",
                pair[0].key, pair[1].key
            )));
        }
    }

    for entry in &node.keys {
        if lower.is_some_and(|l| &entry.key <= l) || upper.is_some_and(|u| &entry.key >= u) {
            return Err(violation(format!(
                "key {:?} outside its subtree bounds",
                entry.key
            )));
        }
        if entry.locations.is_empty() {
            return Err(violation(format!("key {:?} has no locations", entry.key)));
        }
        walk.locations += entry.locations.len();
    }
    walk.keys += count;

    if node.is_leaf {
        if !node.children.is_empty() {
            return Err(violation(format!("leaf at depth {} has children", depth)));
        }
        return match walk.leaf_depth {
            Some(expected) if expected != depth => Err(violation(format!(
                "leaf at depth {} but earlier leaves at depth {}",
                depth, expected
            ))),
            _ => {
                walk.leaf_depth = Some(depth);
                Ok(())
            }
        };
    }

    if node.children.len() != count + 1 {
        return Err(violation(format!(
            "internal node with {} keys has {} children",
            count,
            node.children.len()
        )));
    }

    for (i, child) in node.children.iter().enumerate() {
        let child_lower = if i == 0 { lower } else { Some(&node.keys[i - 1].key) };
        let child_upper = if i == count { upper } else { Some(&node.keys[i].key) };
        verify_node(child, t, false, depth + 1, child_lower, child_upper, walk)?;
    }
    Ok(())
}
