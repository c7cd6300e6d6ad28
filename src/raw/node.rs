use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;

use super::handle::Handle;

/// Most keys a childless node may hold.
pub(crate) const MAX_LEAF_KEYS: usize = 3;
/// Most keys a node with at least one child may hold.
pub(crate) const MAX_INTERNAL_KEYS: usize = 2;
/// Height of an absent subtree; a lone node has height `EMPTY_HEIGHT + 1`.
pub(crate) const EMPTY_HEIGHT: i32 = -1;

/// A tree node: a sorted, duplicate-free run of keys plus two owned child links.
///
/// The keys of a node act as the separators of a collapsed B-tree node: everything in `left` is
/// below `min_key()` and everything in `right` is above `max_key()`.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    // +1 leaves room for the transient overflow that triggers a split or an eviction.
    keys: SmallVec<[K; MAX_LEAF_KEYS + 1]>,
    height: i32,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a one-key leaf.
    pub(crate) fn new(key: K) -> Self {
        let mut keys = SmallVec::new();
        keys.push(key);
        Self {
            keys,
            height: EMPTY_HEIGHT + 1,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn min_key(&self) -> &K {
        &self.keys[0]
    }

    #[inline]
    pub(crate) fn max_key(&self) -> &K {
        &self.keys[self.keys.len() - 1]
    }

    pub(crate) fn pop_min(&mut self) -> K {
        self.keys.remove(0)
    }

    pub(crate) fn pop_max(&mut self) -> K {
        self.keys.pop().expect("`Node::pop_max()` - node has no keys!")
    }

    #[inline]
    pub(crate) const fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: i32) {
        self.height = height;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }
}

impl<K: Ord> Node<K> {
    /// Adds `key` in sorted position. Returns `false` if the node already holds it.
    pub(crate) fn push(&mut self, key: K) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(index) => {
                self.keys.insert(index, key);
                true
            }
        }
    }

    /// Removes `key` from this node. Returns `false` if the node does not hold it.
    pub(crate) fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(index) => {
                self.keys.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Places `key` relative to this node's span: `Less` below `min_key()`, `Greater` above
    /// `max_key()`, `Equal` anywhere in between (held or not).
    pub(crate) fn span_cmp<Q>(&self, key: &Q) -> Ordering
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        if key.cmp(self.min_key().borrow()) == Ordering::Less {
            Ordering::Less
        } else if key.cmp(self.max_key().borrow()) == Ordering::Greater {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    pub(crate) fn holds<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.keys.binary_search_by(|k| k.borrow().cmp(key)).is_ok()
    }
}
