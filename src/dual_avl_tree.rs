use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::key::{Key, Progression};
use crate::layout::Layout;
use crate::raw::{Handle, RawDualAvlTree};
use crate::statistics::Statistics;
use crate::view::NodeView;

/// An ordered set of keys stored in a dual-capacity balanced tree.
///
/// The tree is an AVL tree whose nodes hold a few keys each: a leaf holds one to three keys and a
/// node with children holds one or two. A fourth key in a leaf splits it in place; a third key in
/// an internal node is pushed down into whichever child subtree is shallower. Deletions borrow a
/// replacement key from the shallower side, and a node left with a single child rotates one key
/// across the gap to become two-sided again, or collapses back into a leaf.
///
/// Duplicate keys are not stored: inserting a present key or removing an absent one leaves the tree
/// unchanged and reports `false`.
///
/// # Examples
///
/// ```
/// use dual_avl::DualAvlTree;
///
/// let mut tree = DualAvlTree::new();
/// tree.insert(5);
/// tree.insert(1);
/// tree.insert(9);
/// tree.insert(3);
///
/// assert_eq!(tree.minimum(), 1);
/// assert_eq!(tree.maximum(), 9);
/// assert!(tree.contains(&3));
/// assert!(!tree.insert(3));
///
/// tree.remove(&1);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 5, 9]);
/// ```
pub struct DualAvlTree<K> {
    raw: RawDualAvlTree<K>,
}

/// An iterator over the keys of a `DualAvlTree`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`DualAvlTree`].
///
/// [`iter`]: DualAvlTree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K: 'a> {
    raw: &'a RawDualAvlTree<K>,
    // Nodes whose keys (and right subtree) are still to be visited, innermost on top.
    pending: SmallVec<[Handle; 32]>,
    keys: core::slice::Iter<'a, K>,
    remaining: usize,
}

impl<K> DualAvlTree<K> {
    /// Makes a new, empty `DualAvlTree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let tree: DualAvlTree<i32> = DualAvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        DualAvlTree { raw: RawDualAvlTree::new() }
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key, releasing all nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree = DualAvlTree::from([1, 2, 3, 4, 5]);
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.statistics(), [0, 0, 0, 0]);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.raw.first()
    }

    /// Returns the largest key, or `None` if the tree is empty.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.raw.last()
    }

    /// Height of the tree: `0` for a single node, `-1` when empty.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.raw.height()
    }

    /// Counts the tree's nodes, and its leaves by how many keys they hold.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let tree = DualAvlTree::from([1, 2, 3, 4]);
    /// // One internal node over two single-key leaves.
    /// assert_eq!(tree.statistics(), [3, 2, 0, 0]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(number of nodes)
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        self.raw.statistics()
    }

    /// Gets an iterator over the keys of the tree, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let tree = DualAvlTree::from([3, 1, 2]);
    /// let mut iter = tree.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            raw: &self.raw,
            pending: SmallVec::new(),
            keys: Default::default(),
            remaining: self.raw.len(),
        };
        iter.descend_left(self.raw.root());
        iter
    }

    /// Returns a view of every node, in key order.
    ///
    /// Each view records the node's depth and the in-order position of its first key, which is
    /// enough to lay the tree out level by level.
    #[must_use]
    pub fn node_views(&self) -> Vec<NodeView<'_, K>> {
        let mut views = Vec::new();
        let mut position = 0;
        self.raw.walk_in_order(&mut |node, depth| {
            views.push(NodeView {
                keys: node.keys(),
                depth,
                height: node.height(),
                position,
                has_left: node.left().is_some(),
                has_right: node.right().is_some(),
            });
            position += node.key_count();
        });
        views
    }

    /// Returns the node views grouped by depth: entry `d` lists the nodes at depth `d`, left to
    /// right.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let tree = DualAvlTree::from([1, 2, 3, 4]);
    /// let levels = tree.levels();
    /// assert_eq!(levels.len(), 2);
    /// assert_eq!(levels[0][0].keys(), &[2, 3]);
    /// assert_eq!(levels[1].iter().map(|view| view.keys()[0]).collect::<Vec<_>>(), [1, 4]);
    /// ```
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<NodeView<'_, K>>> {
        let mut levels: Vec<Vec<NodeView<'_, K>>> = Vec::new();
        for view in self.node_views() {
            if levels.len() <= view.depth() {
                levels.resize_with(view.depth() + 1, Vec::new);
            }
            levels[view.depth()].push(view);
        }
        levels
    }

    /// Returns a [`Layout`] that renders the tree as text, one line per level.
    pub fn layout(&self) -> Layout<'_, K> {
        Layout::new(self)
    }
}

impl<K: Ord + Clone> DualAvlTree<K> {
    /// Returns `true` if the tree contains `key`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(key)
    }

    /// Adds `key` to the tree.
    ///
    /// Returns whether the key was newly inserted. That is:
    ///
    /// - If the tree did not previously contain the key, `true` is returned.
    /// - If the tree already contained the key, `false` is returned and the tree is not modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree = DualAvlTree::new();
    /// assert!(tree.insert(2));
    /// assert!(!tree.insert(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes `key` from the tree. Returns whether the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree = DualAvlTree::from([2]);
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }
}

impl<K: Key> DualAvlTree<K> {
    /// Returns the smallest key, or [`Key::MIN`] when the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree: DualAvlTree<i32> = DualAvlTree::new();
    /// assert_eq!(tree.minimum(), i32::MIN);
    /// tree.insert(4);
    /// assert_eq!(tree.minimum(), 4);
    /// ```
    #[must_use]
    pub fn minimum(&self) -> K {
        self.first().copied().unwrap_or(K::MIN)
    }

    /// Returns the largest key, or [`Key::MAX`] when the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree: DualAvlTree<u8> = DualAvlTree::new();
    /// assert_eq!(tree.maximum(), u8::MAX);
    /// tree.insert(4);
    /// assert_eq!(tree.maximum(), 4);
    /// ```
    #[must_use]
    pub fn maximum(&self) -> K {
        self.last().copied().unwrap_or(K::MAX)
    }

    /// Inserts every key of `start, start + step, …` up to and including `end`.
    ///
    /// A non-positive `step` inserts nothing; the walk stops short of overflowing `K`.
    /// Returns how many keys were newly inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree = DualAvlTree::new();
    /// assert_eq!(tree.insert_range(0, 10, 2), 6);
    /// assert_eq!(tree.insert_range(0, 4, 1), 2);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 6, 8, 10]);
    /// ```
    pub fn insert_range(&mut self, start: K, end: K, step: K) -> usize {
        Progression::new(start, end, step).filter(|&key| self.insert(key)).count()
    }

    /// Removes every key of `start, start + step, …` up to and including `end`.
    ///
    /// Mirrors [`insert_range`](Self::insert_range). Returns how many keys were present and
    /// removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let mut tree = DualAvlTree::new();
    /// tree.insert_range(1, 10, 1);
    /// assert_eq!(tree.remove_range(2, 20, 2), 5);
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 7, 9]);
    /// ```
    pub fn remove_range(&mut self, start: K, end: K, step: K) -> usize {
        Progression::new(start, end, step).filter(|key| self.remove(key)).count()
    }
}

impl<'a, K> Iter<'a, K> {
    fn descend_left(&mut self, mut link: Option<Handle>) {
        while let Some(handle) = link {
            self.pending.push(handle);
            link = self.raw.node(handle).left();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            if let Some(key) = self.keys.next() {
                self.remaining -= 1;
                return Some(key);
            }

            let raw = self.raw;
            let node = raw.node(self.pending.pop()?);
            self.keys = node.keys().iter();
            self.descend_left(node.right());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            raw: self.raw,
            pending: self.pending.clone(),
            keys: self.keys.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K> IntoIterator for &'a DualAvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: Clone> Clone for DualAvlTree<K> {
    fn clone(&self) -> Self {
        DualAvlTree { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug> fmt::Debug for DualAvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Default for DualAvlTree<K> {
    /// Creates an empty `DualAvlTree`.
    fn default() -> DualAvlTree<K> {
        DualAvlTree::new()
    }
}

/// Two trees are equal when they hold the same keys, whatever their shapes.
impl<K: PartialEq> PartialEq for DualAvlTree<K> {
    fn eq(&self, other: &DualAvlTree<K>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for DualAvlTree<K> {}

impl<K: Ord + Clone> FromIterator<K> for DualAvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> DualAvlTree<K> {
        let mut tree = DualAvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord + Clone> Extend<K> for DualAvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: 'a + Ord + Copy> Extend<&'a K> for DualAvlTree<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K: Ord + Clone, const N: usize> From<[K; N]> for DualAvlTree<K> {
    /// Builds a tree by inserting the keys of `arr` in order.
    ///
    /// ```
    /// use dual_avl::DualAvlTree;
    ///
    /// let tree = DualAvlTree::from([1, 2, 3, 4]);
    /// assert_eq!(tree.len(), 4);
    /// ```
    fn from(arr: [K; N]) -> Self {
        DualAvlTree::from_iter(arr)
    }
}
