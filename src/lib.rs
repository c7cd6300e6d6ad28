//! A dual-capacity balanced tree for Rust.
//!
//! [`DualAvlTree`] is an ordered set built as a hybrid of an AVL tree and a small-order B-tree.
//! The tree keeps the AVL height invariant, but each node stores a short sorted run of keys
//! instead of a single key:
//!
//! - a **leaf** holds one to three keys;
//! - an **internal** node holds one or two keys and always has both children.
//!
//! A leaf that receives a fourth key splits in place, keeping its middle keys and pushing its
//! extremes down into two new leaves. An internal node that receives a third key evicts a boundary
//! key into its shallower subtree. Removals borrow an in-order neighbour from the shallower side,
//! and *key rotations* move single keys across a node/child boundary whenever a node would be left
//! with only one child.
//!
//! # Example
//!
//! ```
//! use dual_avl::DualAvlTree;
//!
//! let mut tree = DualAvlTree::new();
//! tree.insert_range(0, 10, 2);
//!
//! assert_eq!(tree.minimum(), 0);
//! assert_eq!(tree.maximum(), 10);
//!
//! // Three nodes: one internal, a one-key leaf and a three-key leaf.
//! assert_eq!(tree.statistics(), [3, 1, 0, 1]);
//!
//! // Every key laid out under its sorted position.
//! assert_eq!(tree.layout().to_string(), "    2, 4 \n 0        6, 8,10 ");
//!
//! tree.remove_range(0, 10, 2);
//! assert!(tree.is_empty());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Extremal sentinels** - [`minimum`](DualAvlTree::minimum) and
//!   [`maximum`](DualAvlTree::maximum) answer with the key type's bounds on an empty tree
//! - **Range operations** - insert or remove whole arithmetic progressions of keys
//! - **Structural census** - [`Statistics`] counts nodes and leaves by occupancy
//! - **Debug layout** - [`NodeView`]s and a text [`Layout`] of the tree, level by level
//!
//! # Implementation
//!
//! Nodes live in a slot arena and refer to their children by compact handles, so a missing child
//! costs nothing and no node is ever shared. Every structural algorithm takes a subtree's root and
//! returns the handle that roots it afterwards.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod key;
mod layout;
mod raw;
mod statistics;
mod view;

pub mod dual_avl_tree;

pub use dual_avl_tree::DualAvlTree;
pub use key::Key;
pub use layout::Layout;
pub use statistics::Statistics;
pub use view::NodeView;
