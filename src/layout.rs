use alloc::string::ToString;
use core::fmt;

use crate::DualAvlTree;

/// Renders a [`DualAvlTree`] as text, one line per level.
///
/// Every key owns a column one character wider than the widest key. A node is drawn starting at
/// the column of its first key's in-order rank, so each key sits directly above or below its
/// neighbours in sorted order. Keys of the same node are separated by commas.
///
/// The key width is measured on both the smallest and the largest key. The classic printer
/// measured only the largest, so output differs from it when a negative minimum renders wider
/// than the maximum: `[-100, 5]` lays out as `"-100,   5 "` rather than overflowing its columns.
///
/// This `struct` is created by the [`layout`](DualAvlTree::layout) method.
///
/// # Examples
///
/// ```
/// use dual_avl::DualAvlTree;
///
/// let tree = DualAvlTree::from([0, 2, 4, 6, 8, 10]);
/// assert_eq!(tree.layout().to_string(), "    2, 4 \n 0        6, 8,10 ");
/// ```
#[must_use = "a layout does nothing until it is formatted"]
pub struct Layout<'a, K> {
    tree: &'a DualAvlTree<K>,
}

impl<'a, K> Layout<'a, K> {
    pub(crate) const fn new(tree: &'a DualAvlTree<K>) -> Self {
        Layout { tree }
    }
}

impl<K: fmt::Display> fmt::Display for Layout<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(first), Some(last)) = (self.tree.first(), self.tree.last()) else {
            return Ok(());
        };
        let width = first.to_string().len().max(last.to_string().len());

        for (depth, level) in self.tree.levels().iter().enumerate() {
            if depth > 0 {
                f.write_str("\n")?;
            }

            let mut column = 0;
            for view in level {
                for _ in column..view.position() {
                    write!(f, "{:1$}", "", width + 1)?;
                }
                column = column.max(view.position());

                let keys = view.keys();
                for (i, key) in keys.iter().enumerate() {
                    let separator = if i + 1 < keys.len() { ',' } else { ' ' };
                    write!(f, "{:>width$}{separator}", key.to_string())?;
                }
                column += keys.len();
            }
        }
        Ok(())
    }
}

impl<K: fmt::Display> fmt::Debug for Layout<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
