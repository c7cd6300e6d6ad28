use core::fmt;
use core::ops::Index;

use crate::raw::MAX_LEAF_KEYS;

/// A structural census of a [`DualAvlTree`](crate::DualAvlTree).
///
/// Counts every node, and every leaf by how many keys it holds. Internal nodes only contribute to
/// the total.
///
/// The counters are also addressable as a fixed sequence: index `0` is the node total and indices
/// `1..=3` are the leaf counts for that occupancy.
///
/// # Examples
///
/// ```
/// use dual_avl::DualAvlTree;
///
/// let mut tree = DualAvlTree::new();
/// tree.insert_range(0, 10, 2);
///
/// let stats = tree.statistics();
/// assert_eq!(stats.nodes(), 3);
/// assert_eq!(stats.leaves(1), 1);
/// assert_eq!(stats.leaves(3), 1);
/// assert_eq!(stats, [3, 1, 0, 1]);
/// assert_eq!(stats.to_string(), "3 1 0 1");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Statistics {
    nodes: usize,
    leaves: [usize; MAX_LEAF_KEYS],
}

impl Statistics {
    /// Total number of nodes, leaves and internal nodes alike.
    #[must_use]
    pub const fn nodes(&self) -> usize {
        self.nodes
    }

    /// Number of leaves holding exactly `occupancy` keys.
    ///
    /// Returns `0` for an occupancy no leaf can have.
    #[must_use]
    pub const fn leaves(&self, occupancy: usize) -> usize {
        if occupancy >= 1 && occupancy <= MAX_LEAF_KEYS {
            self.leaves[occupancy - 1]
        } else {
            0
        }
    }

    /// Number of leaves of any occupancy.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves.iter().sum()
    }

    /// The counters as `[nodes, leaves(1), leaves(2), leaves(3)]`.
    #[must_use]
    pub const fn to_array(&self) -> [usize; MAX_LEAF_KEYS + 1] {
        [self.nodes, self.leaves[0], self.leaves[1], self.leaves[2]]
    }

    pub(crate) fn record(&mut self, is_leaf: bool, key_count: usize) {
        self.nodes += 1;
        if is_leaf {
            self.leaves[key_count - 1] += 1;
        }
    }
}

impl Index<usize> for Statistics {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        match index {
            0 => &self.nodes,
            occupancy @ 1..=MAX_LEAF_KEYS => &self.leaves[occupancy - 1],
            _ => panic!("`Statistics` index {index} out of range (0..={MAX_LEAF_KEYS})"),
        }
    }
}

impl PartialEq<[usize; MAX_LEAF_KEYS + 1]> for Statistics {
    fn eq(&self, other: &[usize; MAX_LEAF_KEYS + 1]) -> bool {
        self.to_array() == *other
    }
}

impl From<Statistics> for [usize; MAX_LEAF_KEYS + 1] {
    fn from(statistics: Statistics) -> Self {
        statistics.to_array()
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, counter) in self.to_array().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{counter}")?;
        }
        Ok(())
    }
}
