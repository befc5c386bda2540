//! Height-balanced search tree policy.
//!
//! After every structural change the balance factor of each node on the
//! modified path is recomputed and, whenever it leaves `[-1, 1]`, one of the
//! four canonical rotation patterns restores it.

use crate::trace::{
    event, BalanceStep, EventKind, EventLog, RotationDirection, RotationStep,
};

use super::{link_balance, Balance, TreeNode};

pub use super::node::{link_balance as balance_factor, link_height as height};
pub use crate::trace::RotationCase;

/// AVL balancing policy for [`SearchTree`](super::SearchTree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Avl;

impl Balance for Avl {
    fn rebalance(mut node: Box<TreeNode>, log: &mut EventLog) -> Box<TreeNode> {
        node.refresh();
        let balance_factor = node.balance_factor;
        log.emit(|| {
            event(
                EventKind::Balance {
                    step: BalanceStep::Calculating,
                    node: node.node_ref(),
                    balance_factor,
                    case: None,
                },
                format!(
                    "Calculated balance factor of {balance_factor} for node {}",
                    node.value
                ),
            )
        });

        let Some(case) = imbalance_case(&node) else {
            log.emit(|| {
                event(
                    EventKind::Balance {
                        step: BalanceStep::Balanced,
                        node: node.node_ref(),
                        balance_factor,
                        case: None,
                    },
                    format!(
                        "Node {} is balanced (balance factor: {balance_factor})",
                        node.value
                    ),
                )
            });
            return node;
        };

        tracing::trace!(value = node.value, balance_factor, case = case.as_str(), "avl imbalance");
        log.emit(|| {
            event(
                EventKind::Balance {
                    step: BalanceStep::Imbalance,
                    node: node.node_ref(),
                    balance_factor,
                    case: Some(case),
                },
                format!(
                    "{} imbalance detected at node {} (balance factor: {balance_factor})",
                    case_label(case),
                    node.value
                ),
            )
        });

        match case {
            RotationCase::LL => rotate_right(node, log),
            RotationCase::RR => rotate_left(node, log),
            RotationCase::LR => {
                if let Some(left) = node.left.take() {
                    node.left = Some(rotate_left(left, log));
                }
                rotate_right(node, log)
            }
            RotationCase::RL => {
                if let Some(right) = node.right.take() {
                    node.right = Some(rotate_right(right, log));
                }
                rotate_left(node, log)
            }
        }
    }
}

/// Classifies an out-of-range balance factor. Ties on the heavy child resolve
/// to the single rotation, which is what deletion needs.
pub fn imbalance_case(node: &TreeNode) -> Option<RotationCase> {
    let balance_factor = node.balance_factor;
    if balance_factor > 1 {
        if link_balance(&node.left) >= 0 {
            Some(RotationCase::LL)
        } else {
            Some(RotationCase::LR)
        }
    } else if balance_factor < -1 {
        if link_balance(&node.right) <= 0 {
            Some(RotationCase::RR)
        } else {
            Some(RotationCase::RL)
        }
    } else {
        None
    }
}

fn case_label(case: RotationCase) -> &'static str {
    match case {
        RotationCase::LL => "Left-Left",
        RotationCase::LR => "Left-Right",
        RotationCase::RR => "Right-Right",
        RotationCase::RL => "Right-Left",
    }
}

/// Pivots `y` down to the right: its left child becomes the subtree root.
///
/// A node without a left child is returned untouched.
pub fn rotate_right(mut y: Box<TreeNode>, log: &mut EventLog) -> Box<TreeNode> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    log.emit(|| {
        event(
            EventKind::Rotation {
                step: RotationStep::Before,
                direction: RotationDirection::Right,
                pivot: y.node_ref(),
                old_root: None,
                new_root: None,
            },
            format!("Starting right rotation at node {}", y.value),
        )
    });

    y.left = x.right.take();
    y.refresh();
    let old_root = y.node_ref();
    x.right = Some(y);
    x.refresh();

    tracing::trace!(old_root = old_root.value, new_root = x.value, "rotated right");
    log.emit(|| {
        event(
            EventKind::Rotation {
                step: RotationStep::After,
                direction: RotationDirection::Right,
                pivot: x.node_ref(),
                old_root: Some(old_root),
                new_root: Some(x.node_ref()),
            },
            format!("Completed right rotation, new subtree root is {}", x.value),
        )
    });
    x
}

/// Pivots `x` down to the left: its right child becomes the subtree root.
///
/// A node without a right child is returned untouched.
pub fn rotate_left(mut x: Box<TreeNode>, log: &mut EventLog) -> Box<TreeNode> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    log.emit(|| {
        event(
            EventKind::Rotation {
                step: RotationStep::Before,
                direction: RotationDirection::Left,
                pivot: x.node_ref(),
                old_root: None,
                new_root: None,
            },
            format!("Starting left rotation at node {}", x.value),
        )
    });

    x.right = y.left.take();
    x.refresh();
    let old_root = x.node_ref();
    y.left = Some(x);
    y.refresh();

    tracing::trace!(old_root = old_root.value, new_root = y.value, "rotated left");
    log.emit(|| {
        event(
            EventKind::Rotation {
                step: RotationStep::After,
                direction: RotationDirection::Left,
                pivot: y.node_ref(),
                old_root: Some(old_root),
                new_root: Some(y.node_ref()),
            },
            format!("Completed left rotation, new subtree root is {}", y.value),
        )
    });
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;

    fn node(id: u64, value: i64) -> Box<TreeNode> {
        Box::new(TreeNode::new(NodeId(id), value))
    }

    // 30 -> 20 -> 10 down the left spine.
    fn left_chain() -> Box<TreeNode> {
        let mut mid = node(1, 20);
        mid.left = Some(node(2, 10));
        mid.refresh();
        let mut top = node(0, 30);
        top.left = Some(mid);
        top.refresh();
        top
    }

    #[test]
    fn rotate_right_recomputes_heights_child_first() {
        let mut log = EventLog::new(true);
        let root = rotate_right(left_chain(), &mut log);

        assert_eq!(root.value, 20);
        assert_eq!(root.height, 1);
        assert_eq!(root.left().unwrap().value, 10);
        assert_eq!(root.right().unwrap().value, 30);
        assert_eq!(root.right().unwrap().height, 0);

        let steps: Vec<_> = log.events().iter().map(|e| e.step_name()).collect();
        assert_eq!(steps, [Some("before"), Some("after")]);
    }

    #[test]
    fn rotation_without_child_is_a_noop() {
        let mut log = EventLog::new(true);
        let root = rotate_left(left_chain(), &mut log);
        assert_eq!(root.value, 30);
        assert!(log.is_empty());
    }

    #[test]
    fn classifies_zig_zag_as_double_rotation() {
        let mut mid = node(1, 10);
        mid.right = Some(node(2, 20));
        mid.refresh();
        let mut top = node(0, 30);
        top.left = Some(mid);
        top.refresh();

        assert_eq!(imbalance_case(&top), Some(RotationCase::LR));

        let root = Avl::rebalance(top, &mut EventLog::disabled());
        assert_eq!(root.value, 20);
        assert_eq!(root.balance_factor, 0);
    }
}
