use crate::trace::EventLog;

use super::TreeNode;

/// Policy applied to every node on the way back up from an insert or delete.
///
/// The returned box is the (possibly new) root of the subtree and must be
/// linked back into the parent by the caller.
pub trait Balance {
    fn rebalance(node: Box<TreeNode>, log: &mut EventLog) -> Box<TreeNode>;
}

/// Plain binary search tree: no rotations, no trace events.
///
/// Heights and balance factors are still refreshed so that statistics read
/// from a BST are never stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbalanced;

impl Balance for Unbalanced {
    fn rebalance(mut node: Box<TreeNode>, _log: &mut EventLog) -> Box<TreeNode> {
        node.refresh();
        node
    }
}
