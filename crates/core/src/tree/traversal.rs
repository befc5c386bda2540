use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::trace::{event, AnimationEvent, EventKind, EventLog, TraversalStep};
use crate::Value;

use super::{count_nodes, measured_height, TreeNode};

pub use crate::trace::TraversalOrder;

/// Values in visiting order.
pub fn traverse(root: Option<&TreeNode>, order: TraversalOrder) -> Vec<Value> {
    traversal_trace(root, order)
        .iter()
        .filter_map(|ev| match ev.kind {
            EventKind::Traversal {
                step: TraversalStep::VisitNode,
                node: Some(node),
                ..
            } => Some(node.value),
            _ => None,
        })
        .collect()
}

/// Step-by-step trace of a full traversal. An empty tree yields no events.
pub fn traversal_trace(root: Option<&TreeNode>, order: TraversalOrder) -> Vec<AnimationEvent> {
    let mut log = EventLog::new(true);
    match order {
        TraversalOrder::LevelOrder => level_order(root, &mut log),
        _ => depth_first(root, order, &mut log),
    }
    log.into_events()
}

fn depth_first(node: Option<&TreeNode>, order: TraversalOrder, log: &mut EventLog) {
    let Some(node) = node else { return };

    let visit = |log: &mut EventLog, step: TraversalStep| {
        let message = match step {
            TraversalStep::VisitLeft if node.left.is_some() => {
                format!("Going to left child of {}", node.value)
            }
            TraversalStep::VisitLeft => format!("{} has no left child", node.value),
            TraversalStep::VisitRight if node.right.is_some() => {
                format!("Going to right child of {}", node.value)
            }
            TraversalStep::VisitRight => format!("{} has no right child", node.value),
            _ => format!("Visiting node {} ({})", node.value, order_label(order)),
        };
        log.push(event(
            EventKind::Traversal {
                order,
                step,
                node: Some(node.node_ref()),
                level: None,
            },
            message,
        ));
    };

    match order {
        TraversalOrder::PreOrder => {
            visit(log, TraversalStep::VisitNode);
            visit(log, TraversalStep::VisitLeft);
            depth_first(node.left(), order, log);
            visit(log, TraversalStep::VisitRight);
            depth_first(node.right(), order, log);
        }
        TraversalOrder::PostOrder => {
            visit(log, TraversalStep::VisitLeft);
            depth_first(node.left(), order, log);
            visit(log, TraversalStep::VisitRight);
            depth_first(node.right(), order, log);
            visit(log, TraversalStep::VisitNode);
        }
        _ => {
            visit(log, TraversalStep::VisitLeft);
            depth_first(node.left(), order, log);
            visit(log, TraversalStep::VisitNode);
            visit(log, TraversalStep::VisitRight);
            depth_first(node.right(), order, log);
        }
    }
}

fn level_order(root: Option<&TreeNode>, log: &mut EventLog) {
    let mut queue: VecDeque<&TreeNode> = root.into_iter().collect();
    let mut level = 0;

    while !queue.is_empty() {
        log.push(event(
            EventKind::Traversal {
                order: TraversalOrder::LevelOrder,
                step: TraversalStep::NewLevel,
                node: None,
                level: Some(level),
            },
            format!("Processing level {level}"),
        ));

        for _ in 0..queue.len() {
            let Some(node) = queue.pop_front() else { break };
            log.push(event(
                EventKind::Traversal {
                    order: TraversalOrder::LevelOrder,
                    step: TraversalStep::VisitNode,
                    node: Some(node.node_ref()),
                    level: Some(level),
                },
                format!("Visiting node {} at level {level}", node.value),
            ));
            queue.extend(node.left());
            queue.extend(node.right());
        }
        level += 1;
    }
}

fn order_label(order: TraversalOrder) -> &'static str {
    match order {
        TraversalOrder::InOrder => "In-order",
        TraversalOrder::PreOrder => "Pre-order",
        TraversalOrder::PostOrder => "Post-order",
        TraversalOrder::LevelOrder => "Level-order",
    }
}

/// Summary numbers shown next to a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub node_count: usize,
    /// Number of levels, so an empty tree is 0 and a single node is 1.
    pub height: usize,
    pub is_balanced: bool,
    pub min: Option<Value>,
    pub max: Option<Value>,
}

impl TreeStats {
    pub fn of(root: Option<&TreeNode>, node_count: usize) -> Self {
        fn balanced(node: Option<&TreeNode>) -> bool {
            node.map_or(true, |node| {
                (measured_height(node.left()) - measured_height(node.right())).abs() <= 1
                    && balanced(node.left())
                    && balanced(node.right())
            })
        }

        let mut min = root;
        while let Some(next) = min.and_then(TreeNode::left) {
            min = Some(next);
        }
        let mut max = root;
        while let Some(next) = max.and_then(TreeNode::right) {
            max = Some(next);
        }

        Self {
            node_count,
            height: usize::try_from(measured_height(root) + 1).unwrap_or(0),
            is_balanced: balanced(root),
            min: min.map(|node| node.value),
            max: max.map(|node| node.value),
        }
    }

    /// Stats computed purely from structure, for trees built outside an engine.
    pub fn measure(root: Option<&TreeNode>) -> Self {
        Self::of(root, count_nodes(root))
    }
}

/// Textbook cost of a tree operation for a plain (unbalanced) search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationComplexity {
    pub best: &'static str,
    pub average: &'static str,
    pub worst: &'static str,
    pub description: &'static str,
}

impl OperationComplexity {
    /// Looks up `operation` (`insert`, `search`, `delete` or `traversal`).
    pub fn of(operation: &str) -> Option<Self> {
        let info = match operation {
            "insert" => Self {
                best: "O(1)",
                average: "O(log n)",
                worst: "O(n)",
                description: "In a balanced tree, insertion eliminates half the tree at each step. A degenerate tree may take linear time.",
            },
            "search" => Self {
                best: "O(1)",
                average: "O(log n)",
                worst: "O(n)",
                description: "Searching follows the same path as insertion, logarithmic for balanced trees and linear for degenerate ones.",
            },
            "delete" => Self {
                best: "O(1)",
                average: "O(log n)",
                worst: "O(n)",
                description: "Deletion searches for the node and may walk a second path to find its in-order successor.",
            },
            "traversal" => Self {
                best: "O(n)",
                average: "O(n)",
                worst: "O(n)",
                description: "Every traversal visits each node exactly once.",
            },
            _ => return None,
        };
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BinarySearchTree;

    fn sample() -> BinarySearchTree {
        BinarySearchTree::from_values([40, 20, 60, 10, 30, 50])
    }

    #[test]
    fn orders_visit_values_correctly() {
        let tree = sample();
        let root = tree.root();
        assert_eq!(traverse(root, TraversalOrder::InOrder), vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(traverse(root, TraversalOrder::PreOrder), vec![40, 20, 10, 30, 60, 50]);
        assert_eq!(traverse(root, TraversalOrder::PostOrder), vec![10, 30, 20, 50, 60, 40]);
        assert_eq!(traverse(root, TraversalOrder::LevelOrder), vec![40, 20, 60, 10, 30, 50]);
    }

    #[test]
    fn level_order_marks_each_level() {
        let tree = sample();
        let levels = traversal_trace(tree.root(), TraversalOrder::LevelOrder)
            .iter()
            .filter(|ev| ev.step_name() == Some("newLevel"))
            .count();
        assert_eq!(levels, 3);
    }

    #[test]
    fn leaf_messages_mention_missing_children() {
        let tree = BinarySearchTree::from_values([1]);
        let trace = traversal_trace(tree.root(), TraversalOrder::InOrder);
        assert_eq!(trace[0].message, "1 has no left child");
        assert_eq!(trace[1].message, "Visiting node 1 (In-order)");
        assert_eq!(trace[2].message, "1 has no right child");
    }

    #[test]
    fn stats_of_empty_and_populated_trees() {
        let empty = TreeStats::measure(None);
        assert_eq!(empty.height, 0);
        assert!(empty.is_balanced);
        assert_eq!(empty.min, None);

        let stats = sample().stats();
        assert_eq!(stats.node_count, 6);
        assert_eq!(stats.height, 3);
        assert_eq!(stats.min, Some(10));
        assert_eq!(stats.max, Some(60));
        assert!(stats.is_balanced);
    }

    #[test]
    fn complexity_table_lookup() {
        assert_eq!(OperationComplexity::of("traversal").unwrap().worst, "O(n)");
        assert!(OperationComplexity::of("rotate").is_none());
    }
}
