mod arena;
mod handle;
mod node;
mod raw_dual_avl_tree;

pub(crate) use handle::Handle;
pub(crate) use node::MAX_LEAF_KEYS;
pub(crate) use raw_dual_avl_tree::RawDualAvlTree;
