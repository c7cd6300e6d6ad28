use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{EMPTY_HEIGHT, MAX_INTERNAL_KEYS, MAX_LEAF_KEYS, Node};
use crate::statistics::Statistics;

/// The core tree backing `DualAvlTree`.
///
/// Every algorithm below works on one subtree at a time: it takes the subtree's root link and
/// returns the (possibly different) handle that now roots it, leaving the caller to store that
/// handle back into its own child slot.
#[derive(Clone)]
pub(crate) struct RawDualAvlTree<K> {
    /// Arena owning every node of the tree.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of keys stored across all nodes.
    len: usize,
}

impl<K> RawDualAvlTree<K> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Height of the whole tree, `-1` when empty.
    pub(crate) fn height(&self) -> i32 {
        self.link_height(self.root)
    }

    /// Releases every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn first(&self) -> Option<&K> {
        let root = self.root?;
        Some(self.node(self.leftmost(root)).min_key())
    }

    pub(crate) fn last(&self) -> Option<&K> {
        let root = self.root?;
        Some(self.node(self.rightmost(root)).max_key())
    }

    /// Counts nodes, and leaves by occupancy.
    pub(crate) fn statistics(&self) -> Statistics {
        let mut statistics = Statistics::default();
        let mut pending: SmallVec<[Handle; 64]> = self.root.into_iter().collect();

        while let Some(handle) = pending.pop() {
            let node = self.nodes.get(handle);
            statistics.record(node.is_leaf(), node.key_count());
            pending.extend(node.left());
            pending.extend(node.right());
        }

        statistics
    }

    /// Calls `visit` with every node and its depth (root = 0), in key order.
    pub(crate) fn walk_in_order<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Node<K>, usize),
    {
        self.walk(self.root, 0, visit);
    }

    fn walk<'a, F>(&'a self, link: Option<Handle>, depth: usize, visit: &mut F)
    where
        F: FnMut(&'a Node<K>, usize),
    {
        if let Some(handle) = link {
            let node = self.nodes.get(handle);
            self.walk(node.left(), depth + 1, visit);
            visit(node, depth);
            self.walk(node.right(), depth + 1, visit);
        }
    }

    #[inline]
    fn link_height(&self, link: Option<Handle>) -> i32 {
        link.map_or(EMPTY_HEIGHT, |handle| self.nodes.get(handle).height())
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let height = 1 + self.link_height(node.left()).max(self.link_height(node.right()));
        self.nodes.get_mut(handle).set_height(height);
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left() {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right() {
            handle = right;
        }
        handle
    }

    /// Node rotation: `pivot` (the right child of `handle`) becomes the subtree root.
    fn rotate_left(&mut self, handle: Handle, pivot: Handle) -> Handle {
        let inner = self.nodes.get(pivot).left();
        self.nodes.get_mut(handle).set_right(inner);
        self.nodes.get_mut(pivot).set_left(Some(handle));

        self.update_height(handle);
        self.update_height(pivot);
        pivot
    }

    /// Node rotation: `pivot` (the left child of `handle`) becomes the subtree root.
    fn rotate_right(&mut self, handle: Handle, pivot: Handle) -> Handle {
        let inner = self.nodes.get(pivot).right();
        self.nodes.get_mut(handle).set_left(inner);
        self.nodes.get_mut(pivot).set_right(Some(handle));

        self.update_height(handle);
        self.update_height(pivot);
        pivot
    }
}

impl<K: Ord + Clone> RawDualAvlTree<K> {
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut link = self.root;
        while let Some(handle) = link {
            let node = self.nodes.get(handle);
            link = match node.span_cmp(key) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return node.holds(key),
            };
        }
        false
    }

    /// Inserts `key`. Returns `false`, leaving the tree untouched, if it is already present.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }

        let root = self.insert_at(key, self.root);
        self.root = Some(root);
        self.len += 1;
        true
    }

    /// Removes `key`. Returns `false`, leaving the tree untouched, if it is absent.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if !self.contains(key) {
            return false;
        }

        self.root = self.remove_at(key, self.root);
        self.len -= 1;
        true
    }

    fn insert_at(&mut self, key: K, link: Option<Handle>) -> Handle {
        let Some(handle) = link else {
            return self.nodes.alloc(Node::new(key));
        };

        let node = self.nodes.get_mut(handle);
        if node.is_leaf() {
            if node.push(key) && node.key_count() > MAX_LEAF_KEYS {
                self.split_leaf(handle);
            }
        } else {
            match node.span_cmp(&key) {
                Ordering::Less => {
                    let left = node.left();
                    let left = self.insert_at(key, left);
                    self.nodes.get_mut(handle).set_left(Some(left));
                }
                Ordering::Greater => {
                    let right = node.right();
                    let right = self.insert_at(key, right);
                    self.nodes.get_mut(handle).set_right(Some(right));
                }
                Ordering::Equal => {
                    if node.push(key) && node.key_count() > MAX_INTERNAL_KEYS {
                        self.evict_to_shallower_side(handle);
                    }
                }
            }
        }

        self.rebalance(handle)
    }

    /// Turns an overfull leaf into an internal node holding its middle keys, with its extreme keys
    /// moved down into two new leaves.
    fn split_leaf(&mut self, handle: Handle) {
        let node = self.nodes.get_mut(handle);
        let low = node.pop_min();
        let high = node.pop_max();

        let left = self.nodes.alloc(Node::new(low));
        let right = self.nodes.alloc(Node::new(high));
        let node = self.nodes.get_mut(handle);
        node.set_left(Some(left));
        node.set_right(Some(right));
    }

    /// Pushes one boundary key of an overfull internal node into its shallower child, the left one
    /// on a tie.
    fn evict_to_shallower_side(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());

        if self.link_height(left) <= self.link_height(right) {
            let low = self.nodes.get_mut(handle).pop_min();
            let left = self.insert_at(low, left);
            self.nodes.get_mut(handle).set_left(Some(left));
        } else {
            let high = self.nodes.get_mut(handle).pop_max();
            let right = self.insert_at(high, right);
            self.nodes.get_mut(handle).set_right(Some(right));
        }
    }

    fn remove_at<Q>(&mut self, key: &Q, link: Option<Handle>) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = link?;

        let node = self.nodes.get_mut(handle);
        if node.is_leaf() {
            if node.erase(key) && node.key_count() == 0 {
                self.nodes.release(handle);
                return None;
            }
        } else {
            match node.span_cmp(key) {
                Ordering::Less => {
                    let left = node.left();
                    let left = self.remove_at(key, left);
                    self.nodes.get_mut(handle).set_left(left);
                }
                Ordering::Greater => {
                    let right = node.right();
                    let right = self.remove_at(key, right);
                    self.nodes.get_mut(handle).set_right(right);
                }
                Ordering::Equal => {
                    if node.erase(key) {
                        self.refill_from_shallower_side(handle);
                    }
                }
            }
        }

        Some(self.rebalance(handle))
    }

    /// Replaces a key just erased from an internal node with its in-order neighbour, taken from
    /// the right subtree unless the left one is strictly taller.
    fn refill_from_shallower_side(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());

        if self.link_height(left) <= self.link_height(right) {
            let right = right.expect("`refill_from_shallower_side()` - node has no children!");
            let (key, right) = self.take_min(right);
            let node = self.nodes.get_mut(handle);
            node.push(key);
            node.set_right(right);
        } else {
            // A strictly taller left side is never empty.
            let left = left.expect("`refill_from_shallower_side()` - left subtree is empty!");
            let (key, left) = self.take_max(left);
            let node = self.nodes.get_mut(handle);
            node.push(key);
            node.set_left(left);
        }
    }

    /// Removes the smallest key of a subtree, returning it with the subtree's new root.
    fn take_min(&mut self, subtree: Handle) -> (K, Option<Handle>) {
        let key = self.nodes.get(self.leftmost(subtree)).min_key().clone();
        let rest = self.remove_at(&key, Some(subtree));
        (key, rest)
    }

    /// Removes the largest key of a subtree, returning it with the subtree's new root.
    fn take_max(&mut self, subtree: Handle) -> (K, Option<Handle>) {
        let key = self.nodes.get(self.rightmost(subtree)).max_key().clone();
        let rest = self.remove_at(&key, Some(subtree));
        (key, rest)
    }

    /// Restores the shape invariants of `handle` after a change below it and returns the handle
    /// now rooting the subtree.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        self.update_height(handle);

        let node = self.nodes.get(handle);
        match (node.left(), node.right()) {
            (None, Some(right)) => self.rotate_keys_left(handle, right),
            (Some(left), None) => self.rotate_keys_right(handle, left),
            _ => {}
        }

        let node = self.nodes.get(handle);
        let (left, right) = (node.left(), node.right());
        match (self.link_height(right) - self.link_height(left), left, right) {
            (-2, Some(left), _) => {
                let child = self.nodes.get(left);
                let (outer, inner) = (child.left(), child.right());
                let pivot = match inner {
                    Some(inner) if self.link_height(outer) < self.link_height(Some(inner)) => {
                        self.rotate_left(left, inner)
                    }
                    _ => left,
                };
                self.nodes.get_mut(handle).set_left(Some(pivot));
                self.rotate_right(handle, pivot)
            }
            (2, _, Some(right)) => {
                let child = self.nodes.get(right);
                let (inner, outer) = (child.left(), child.right());
                let pivot = match inner {
                    Some(inner) if self.link_height(Some(inner)) > self.link_height(outer) => {
                        self.rotate_right(right, inner)
                    }
                    _ => right,
                };
                self.nodes.get_mut(handle).set_right(Some(pivot));
                self.rotate_left(handle, pivot)
            }
            _ => handle,
        }
    }

    /// Key rotation for a node that lost its left child: its right subtree's minimum moves up, and
    /// unless that empties the right side, the node's own minimum moves down as a new left leaf.
    fn rotate_keys_left(&mut self, handle: Handle, right: Handle) {
        let (key, right) = self.take_min(right);
        let node = self.nodes.get_mut(handle);
        node.push(key);
        node.set_right(right);

        if !node.is_leaf() {
            let low = node.pop_min();
            let left = self.nodes.alloc(Node::new(low));
            self.nodes.get_mut(handle).set_left(Some(left));
        }
        self.update_height(handle);
    }

    /// Mirror of [`rotate_keys_left`](Self::rotate_keys_left) for a node that lost its right child.
    fn rotate_keys_right(&mut self, handle: Handle, left: Handle) {
        let (key, left) = self.take_max(left);
        let node = self.nodes.get_mut(handle);
        node.push(key);
        node.set_left(left);

        if !node.is_leaf() {
            let high = node.pop_max();
            let right = self.nodes.alloc(Node::new(high));
            self.nodes.get_mut(handle).set_right(Some(right));
        }
        self.update_height(handle);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::manual_assert, clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K: Ord + Clone + core::fmt::Debug> RawDualAvlTree<K> {
        /// Validates every shape invariant. Panics with a descriptive message if any is violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut keys: Vec<K> = Vec::new();
            let height = self.validate_node(self.root, &mut keys, &mut errors);

            if height != self.height() {
                errors.push(format!("root height {} but recomputed {}", self.height(), height));
            }
            if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
                errors.push(format!("in-order keys not strictly increasing: {keys:?}"));
            }
            if keys.len() != self.len {
                errors.push(format!("len mismatch: self.len={}, actual={}", self.len, keys.len()));
            }
            if self.statistics().nodes() != self.nodes.len() {
                errors.push(format!(
                    "{} reachable nodes but {} allocated",
                    self.statistics().nodes(),
                    self.nodes.len()
                ));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        fn validate_node(&self, link: Option<Handle>, keys: &mut Vec<K>, errors: &mut Vec<String>) -> i32 {
            let Some(handle) = link else {
                return EMPTY_HEIGHT;
            };
            let node = self.nodes.get(handle);

            let left_height = self.validate_node(node.left(), keys, errors);
            keys.extend(node.keys().iter().cloned());
            let right_height = self.validate_node(node.right(), keys, errors);

            let count = node.key_count();
            if node.is_leaf() {
                if !(1..=MAX_LEAF_KEYS).contains(&count) {
                    errors.push(format!("leaf {handle:?} holds {count} keys: {:?}", node.keys()));
                }
            } else {
                if !(1..=MAX_INTERNAL_KEYS).contains(&count) {
                    errors.push(format!("internal {handle:?} holds {count} keys: {:?}", node.keys()));
                }
                if node.left().is_none() || node.right().is_none() {
                    errors.push(format!("internal {handle:?} is one-sided: {:?}", node.keys()));
                }
            }
            if (right_height - left_height).abs() > 1 {
                errors.push(format!(
                    "node {handle:?} unbalanced: left height {left_height}, right height {right_height}"
                ));
            }

            let height = 1 + left_height.max(right_height);
            if node.height() != height {
                errors.push(format!("node {handle:?} caches height {} but is {height}", node.height()));
            }
            height
        }

        fn keys(&self) -> Vec<K> {
            let mut keys = Vec::new();
            self.walk_in_order(&mut |node, _| keys.extend(node.keys().iter().cloned()));
            keys
        }
    }

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> RawDualAvlTree<i32> {
        let mut tree = RawDualAvlTree::new();
        for key in keys {
            tree.insert(key);
        }
        tree.validate_invariants();
        tree
    }

    #[test]
    fn empty_tree() {
        let tree: RawDualAvlTree<i32> = RawDualAvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), EMPTY_HEIGHT);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.statistics(), [0, 0, 0, 0]);
        tree.validate_invariants();
    }

    #[test]
    fn leaf_fills_to_three_keys() {
        let tree = tree_of([2, 3, 1]);
        let root = tree.node(tree.root().unwrap());
        assert!(root.is_leaf());
        assert_eq!(root.keys(), &[1, 2, 3]);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn fourth_key_splits_leaf() {
        let tree = tree_of([1, 2, 3, 4]);
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.keys(), &[2, 3]);
        assert_eq!(tree.node(root.left().unwrap()).keys(), &[1]);
        assert_eq!(tree.node(root.right().unwrap()).keys(), &[4]);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.statistics(), [3, 2, 0, 0]);
    }

    #[test]
    fn key_inside_full_internal_node_moves_to_left_on_tie() {
        // Root [20, 30] over leaves [10] and [40]: both children have height 0.
        let mut tree = tree_of([10, 20, 30, 40]);
        assert!(tree.insert(25));
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.keys(), &[25, 30]);
        assert_eq!(tree.node(root.left().unwrap()).keys(), &[10, 20]);
        assert_eq!(tree.node(root.right().unwrap()).keys(), &[40]);
    }

    #[test]
    fn emptied_child_demotes_parent_back_to_leaf() {
        for (removed, expected) in [(4, [1, 2, 3]), (2, [1, 3, 4]), (1, [2, 3, 4]), (3, [1, 2, 4])] {
            let mut tree = tree_of([1, 2, 3, 4]);
            assert!(tree.remove(&removed));
            tree.validate_invariants();

            let root = tree.node(tree.root().unwrap());
            assert!(root.is_leaf(), "removing {removed} should leave a single leaf");
            assert_eq!(root.keys(), &expected);
            assert_eq!(tree.statistics(), [1, 0, 0, 1]);
        }
    }

    #[test]
    fn erased_internal_key_is_refilled_from_taller_left_side() {
        // Root [2, 3] over a two-level left subtree [-1, 0] / ([-2], [1]) and a right leaf [4].
        let mut tree = tree_of([1, 2, 3, 4, 0, -1, -2]);
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.keys(), &[2, 3]);
        assert_eq!(tree.node(root.left().unwrap()).keys(), &[-1, 0]);

        assert!(tree.remove(&3));
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.keys(), &[1, 2]);
        assert_eq!(tree.node(root.left().unwrap()).keys(), &[-2, -1, 0]);
        assert_eq!(tree.node(root.right().unwrap()).keys(), &[4]);
        assert_eq!(tree.statistics(), [3, 1, 0, 1]);
    }

    #[test]
    fn erased_internal_key_is_refilled_from_right_side_on_tie() {
        // Root [2, 3] over leaves [1] and [4, 5]: both children have height 0.
        let mut tree = tree_of([1, 2, 3, 4, 5]);
        assert!(tree.remove(&2));
        tree.validate_invariants();

        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.keys(), &[3, 4]);
        assert_eq!(tree.node(root.left().unwrap()).keys(), &[1]);
        assert_eq!(tree.node(root.right().unwrap()).keys(), &[5]);
    }

    #[test]
    fn duplicate_insert_and_missing_remove_are_no_ops() {
        let mut tree = tree_of(0..50);
        let before = tree.statistics();

        assert!(!tree.insert(17));
        assert!(!tree.remove(&50));
        assert!(!tree.remove(&-1));
        assert_eq!(tree.statistics(), before);
        assert_eq!(tree.len(), 50);
        tree.validate_invariants();
    }

    #[test]
    fn ascending_and_descending_runs_stay_balanced() {
        let ascending = tree_of(0..2_000);
        let descending = tree_of((0..2_000).rev());
        for tree in [&ascending, &descending] {
            // An AVL tree over n nodes is at most ~1.44 log2(n) tall.
            let nodes = tree.statistics().nodes();
            assert!(tree.height().unsigned_abs() <= 2 * (nodes + 1).ilog2());
            assert_eq!(tree.first(), Some(&0));
            assert_eq!(tree.last(), Some(&1_999));
        }
    }

    #[test]
    fn clear_releases_every_node() {
        let mut tree = tree_of(0..300);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.nodes.len(), 0);
        tree.validate_invariants();

        assert!(tree.insert(5));
        tree.validate_invariants();
    }

    #[test]
    fn walk_reports_depths() {
        let tree = tree_of([1, 2, 3, 4]);
        let mut seen = Vec::new();
        tree.walk_in_order(&mut |node, depth| seen.push((node.keys().to_vec(), depth)));
        assert_eq!(seen, [(alloc::vec![1], 1), (alloc::vec![2, 3], 0), (alloc::vec![4], 1)]);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..400).prop_map(Op::Insert),
            2 => (0i32..400).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..600)) {
            let mut tree: RawDualAvlTree<i32> = RawDualAvlTree::new();
            let mut model = alloc::collections::BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(key) => prop_assert_eq!(tree.insert(key), model.insert(key)),
                    Op::Remove(key) => prop_assert_eq!(tree.remove(&key), model.remove(&key)),
                }
                tree.validate_invariants();
            }

            prop_assert_eq!(tree.keys(), model.iter().copied().collect::<Vec<_>>());
        }

        #[test]
        fn insert_then_remove_restores_key_set(
            keys in prop::collection::vec(-500i32..500, 0..300),
            extra in -600i32..600,
        ) {
            let mut tree = tree_of(keys);
            let before = tree.keys();
            let was_present = tree.contains(&extra);

            tree.insert(extra);
            tree.validate_invariants();
            if !was_present {
                tree.remove(&extra);
            }
            tree.validate_invariants();
            prop_assert_eq!(tree.keys(), before);
        }

        #[test]
        fn removing_everything_empties_tree(keys in prop::collection::vec(any::<i16>(), 0..400), seed in any::<u64>()) {
            let mut tree: RawDualAvlTree<i16> = RawDualAvlTree::new();
            for &key in &keys {
                tree.insert(key);
            }

            let mut order: Vec<i16> = tree.keys();
            // Deterministic shuffle so removal order differs from insertion order.
            let mut state = seed | 1;
            for i in (1..order.len()).rev() {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                order.swap(i, (state >> 33) as usize % (i + 1));
            }

            for key in order {
                prop_assert!(tree.remove(&key));
                tree.validate_invariants();
            }
            prop_assert!(tree.is_empty());
            prop_assert_eq!(tree.statistics(), [0, 0, 0, 0]);
            prop_assert_eq!(tree.nodes.len(), 0);
        }
    }
}
