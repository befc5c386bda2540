use serde::{Deserialize, Serialize};

use crate::Value;

/// Stable identity of a tree node, assigned once when the node is allocated.
///
/// Successor promotion overwrites a node's value but never its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Snapshot of a node's identity and value at the moment it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: NodeId,
    pub value: Value,
}

/// Visual state a renderer paints a node with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightState {
    #[default]
    Normal,
    Highlight,
    Searching,
    Found,
    Inserting,
    Deleting,
}

pub type Link = Option<Box<TreeNode>>;

/// A binary tree node. Children are owned exclusively by their parent; there
/// are no back links, so parents are found by walking down from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub value: Value,
    pub left: Link,
    pub right: Link,
    /// Edge height of the subtree; a leaf is 0 and a missing child counts as -1.
    pub height: i32,
    pub balance_factor: i32,
    pub highlight: HighlightState,
}

impl TreeNode {
    pub fn new(id: NodeId, value: Value) -> Self {
        Self {
            id,
            value,
            left: None,
            right: None,
            height: 0,
            balance_factor: 0,
            highlight: HighlightState::Normal,
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef {
            id: self.id,
            value: self.value,
        }
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }

    /// Recomputes `height` and `balance_factor` from the children's stored heights.
    pub fn refresh(&mut self) {
        let left = link_height(&self.left);
        let right = link_height(&self.right);
        self.height = 1 + left.max(right);
        self.balance_factor = left - right;
    }

    /// Finds a node by id anywhere below (and including) `self`.
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.left()
            .and_then(|node| node.find(id))
            .or_else(|| self.right().and_then(|node| node.find(id)))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        if self.id == id {
            return Some(self);
        }
        if let Some(found) = self.left.as_deref_mut().and_then(|node| node.find_mut(id)) {
            return Some(found);
        }
        self.right.as_deref_mut().and_then(|node| node.find_mut(id))
    }

    /// Sets every node in the subtree back to [`HighlightState::Normal`].
    pub fn reset_highlights(&mut self) {
        self.highlight = HighlightState::Normal;
        if let Some(left) = self.left.as_deref_mut() {
            left.reset_highlights();
        }
        if let Some(right) = self.right.as_deref_mut() {
            right.reset_highlights();
        }
    }
}

/// Unlinks the subtree onto a heap-allocated stack so that freeing a
/// degenerate, list-shaped tree does not recurse once per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending: Vec<Box<TreeNode>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// Stored height of a link, with an empty link counting as -1.
pub fn link_height(link: &Link) -> i32 {
    link.as_ref().map_or(-1, |node| node.height)
}

/// Balance factor of a link computed from its children's stored heights.
pub fn link_balance(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| {
        link_height(&node.left) - link_height(&node.right)
    })
}

/// Height recomputed from structure rather than the stored fields.
pub fn measured_height(node: Option<&TreeNode>) -> i32 {
    match node {
        None => -1,
        Some(node) => 1 + measured_height(node.left()).max(measured_height(node.right())),
    }
}

pub fn in_order(node: Option<&TreeNode>, out: &mut Vec<Value>) {
    if let Some(node) = node {
        in_order(node.left(), out);
        out.push(node.value);
        in_order(node.right(), out);
    }
}

pub fn count_nodes(node: Option<&TreeNode>) -> usize {
    node.map_or(0, |node| 1 + count_nodes(node.left()) + count_nodes(node.right()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u64, value: Value) -> Box<TreeNode> {
        Box::new(TreeNode::new(NodeId(id), value))
    }

    #[test]
    fn refresh_uses_minus_one_for_missing_children() {
        let mut node = TreeNode::new(NodeId(0), 10);
        node.refresh();
        assert_eq!(node.height, 0);
        assert_eq!(node.balance_factor, 0);

        node.left = Some(leaf(1, 5));
        node.refresh();
        assert_eq!(node.height, 1);
        assert_eq!(node.balance_factor, 1);
    }

    #[test]
    fn find_walks_both_subtrees() {
        let mut root = TreeNode::new(NodeId(0), 10);
        root.left = Some(leaf(1, 5));
        root.right = Some(leaf(2, 15));

        assert_eq!(root.find(NodeId(2)).map(|n| n.value), Some(15));
        assert!(root.find(NodeId(9)).is_none());

        root.find_mut(NodeId(1)).unwrap().highlight = HighlightState::Found;
        root.reset_highlights();
        assert_eq!(root.left().unwrap().highlight, HighlightState::Normal);
    }

    #[test]
    fn dropping_a_long_chain_stays_off_the_call_stack() {
        let freed = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(|| {
                let mut root = leaf(0, 0);
                for i in 1..200_000u64 {
                    let mut parent = leaf(i, i as Value);
                    parent.left = Some(root);
                    root = parent;
                }
                drop(root);
            })
            .unwrap()
            .join();
        assert!(freed.is_ok());
    }
}
