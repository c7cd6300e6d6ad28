/// A read-only look at one node of a [`DualAvlTree`](crate::DualAvlTree).
///
/// Views are produced by [`DualAvlTree::node_views`](crate::DualAvlTree::node_views) in key order,
/// or grouped per depth by [`DualAvlTree::levels`](crate::DualAvlTree::levels). They carry what a
/// renderer needs to place a node: its keys, its depth, and its in-order position.
///
/// # Examples
///
/// ```
/// use dual_avl::DualAvlTree;
///
/// let tree = DualAvlTree::from([1, 2, 3, 4]);
/// let views = tree.node_views();
///
/// assert_eq!(views.len(), 3);
/// assert_eq!(views[1].keys(), &[2, 3]);
/// assert_eq!(views[1].depth(), 0);
/// assert_eq!(views[1].position(), 1);
/// assert!(views[1].has_left() && views[1].has_right());
/// assert_eq!(views[2].position(), 3);
/// ```
#[derive(Debug)]
pub struct NodeView<'a, K> {
    pub(crate) keys: &'a [K],
    pub(crate) depth: usize,
    pub(crate) height: i32,
    pub(crate) position: usize,
    pub(crate) has_left: bool,
    pub(crate) has_right: bool,
}

impl<'a, K> NodeView<'a, K> {
    /// The node's keys, in ascending order.
    #[must_use]
    pub const fn keys(&self) -> &'a [K] {
        self.keys
    }

    /// Distance from the root, which has depth `0`.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Height of the subtree rooted here; a leaf has height `0`.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// In-order rank of the node's first key among all keys of the tree.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn has_left(&self) -> bool {
        self.has_left
    }

    #[must_use]
    pub const fn has_right(&self) -> bool {
        self.has_right
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !self.has_left && !self.has_right
    }
}

impl<K> Clone for NodeView<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeView<'_, K> {}
