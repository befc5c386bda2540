//! Binary search trees with operation traces.
//!
//! [`SearchTree`] holds the descent, insertion and deletion logic shared by
//! both tree engines; the [`Balance`] policy decides what happens to each node
//! on the way back up. [`BinarySearchTree`] never rotates, [`AvlTree`] keeps
//! every balance factor within `[-1, 1]`.
//!
//! Equal values always route right on insert. Lookups stop at the first node
//! holding the value.

pub mod avl;
mod balance;
mod node;
pub mod traversal;

use std::cmp::Ordering;
use std::marker::PhantomData;

use rand::Rng;

use crate::random::distinct_values;
use crate::trace::{event, DeleteStep, EventKind, EventLog, InsertStep, SearchStep, Traced};
use crate::{Result, Value};

pub use avl::Avl;
pub use balance::{Balance, Unbalanced};
pub use node::{
    count_nodes, in_order, link_balance, link_height, measured_height, HighlightState, Link,
    NodeId, NodeRef, TreeNode,
};
pub use traversal::{OperationComplexity, TreeStats};

pub type BinarySearchTree = SearchTree<Unbalanced>;
pub type AvlTree = SearchTree<Avl>;

/// Outcome of a lookup: whether the value was found, where, and every node
/// visited on the way down (root first).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub found: bool,
    pub node: Option<NodeRef>,
    pub path: Vec<NodeRef>,
}

#[derive(Debug, Clone)]
pub struct SearchTree<B> {
    root: Link,
    node_count: usize,
    next_id: u64,
    _balance: PhantomData<B>,
}

impl<B> Default for SearchTree<B> {
    fn default() -> Self {
        Self {
            root: None,
            node_count: 0,
            next_id: 0,
            _balance: PhantomData,
        }
    }
}

impl<B: Balance> SearchTree<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree by inserting `values` in order without tracing.
    pub fn from_values<I: IntoIterator<Item = Value>>(values: I) -> Self {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value, false);
        }
        tree
    }

    /// Inserts `count` distinct values drawn uniformly from `[min, max]`.
    pub fn create_random(count: usize, min: Value, max: Value) -> Result<Self> {
        Self::create_random_with(&mut rand::thread_rng(), count, min, max)
    }

    pub fn create_random_with<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        min: Value,
        max: Value,
    ) -> Result<Self> {
        Ok(Self::from_values(distinct_values(rng, count, min, max)?))
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    pub fn root_mut(&mut self) -> Option<&mut TreeNode> {
        self.root.as_deref_mut()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.root().and_then(|root| root.find(id))
    }

    pub fn len(&self) -> usize {
        self.node_count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Edge height of the root; an empty tree has height -1.
    pub fn height(&self) -> i32 {
        measured_height(self.root())
    }

    /// Whether every node's subtrees differ in height by at most one.
    pub fn is_balanced(&self) -> bool {
        fn check(node: Option<&TreeNode>) -> bool {
            match node {
                None => true,
                Some(node) => {
                    (measured_height(node.left()) - measured_height(node.right())).abs() <= 1
                        && check(node.left())
                        && check(node.right())
                }
            }
        }
        check(self.root())
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats::of(self.root(), self.node_count)
    }

    /// In-order values, i.e. ascending with duplicates kept.
    pub fn to_array(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.node_count);
        in_order(self.root(), &mut out);
        out
    }

    pub fn reset_highlights(&mut self) {
        if let Some(root) = self.root.as_deref_mut() {
            root.reset_highlights();
        }
    }

    fn allocate(&mut self, value: Value) -> Box<TreeNode> {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Box::new(TreeNode::new(id, value))
    }

    /// Inserts `value` and returns a reference to the node that now holds it.
    ///
    /// Duplicates are accepted and placed in the right subtree of any equal node.
    pub fn insert(&mut self, value: Value, animate: bool) -> Traced<NodeRef> {
        let mut log = EventLog::new(animate);
        let fresh = self.allocate(value);
        let created = fresh.node_ref();
        self.node_count += 1;

        log.emit(|| {
            event(
                EventKind::Insert {
                    step: InsertStep::Start,
                    node: created,
                },
                format!("Starting insertion of node {value}"),
            )
        });

        self.root = Some(match self.root.take() {
            None => {
                log.emit(|| {
                    event(
                        EventKind::Insert {
                            step: InsertStep::Complete,
                            node: created,
                        },
                        format!("Added {value} as the root node"),
                    )
                });
                fresh
            }
            Some(root) => insert_below::<B>(root, fresh, &mut log),
        });

        tracing::debug!(value, animate, size = self.node_count, events = log.len(), "insert");
        Traced::new(created, log)
    }

    /// Removes one node holding `value`. Returns whether anything was removed.
    ///
    /// A missing value leaves the tree untouched and ends the trace with a
    /// `notFound` step.
    pub fn delete(&mut self, value: Value, animate: bool) -> Traced<bool> {
        let mut log = EventLog::new(animate);
        log.emit(|| {
            event(
                EventKind::Delete {
                    step: DeleteStep::Start,
                    value,
                    node: None,
                },
                format!("Starting deletion of node with value {value}"),
            )
        });

        let mut removed = false;
        self.root = delete_below::<B>(self.root.take(), value, &mut removed, &mut log);
        if removed {
            self.node_count -= 1;
        }

        tracing::debug!(value, animate, removed, size = self.node_count, "delete");
        Traced::new(removed, log)
    }

    /// Descends from the root comparing `value` at each node.
    pub fn search(&self, value: Value, animate: bool) -> Traced<SearchOutcome> {
        let mut log = EventLog::new(animate);
        let mut outcome = SearchOutcome::default();

        outcome.node = search_below(self.root(), value, &mut outcome.path, &mut log);
        outcome.found = outcome.node.is_some();

        if !outcome.found {
            log.emit(|| {
                event(
                    EventKind::Search {
                        step: SearchStep::NotFound,
                        value,
                        node: None,
                    },
                    format!("Value {value} not found in the tree"),
                )
            });
        }

        tracing::debug!(value, found = outcome.found, depth = outcome.path.len(), "search");
        Traced::new(outcome, log)
    }

    pub fn contains(&self, value: Value) -> bool {
        self.search(value, false).output.found
    }
}

fn insert_below<B: Balance>(
    mut node: Box<TreeNode>,
    fresh: Box<TreeNode>,
    log: &mut EventLog,
) -> Box<TreeNode> {
    let value = fresh.value;
    let added = fresh.node_ref();
    let here = node.node_ref();

    log.emit(|| {
        event(
            EventKind::Insert {
                step: InsertStep::Comparing,
                node: here,
            },
            format!("Comparing {value} with {}", here.value),
        )
    });

    if value < node.value {
        log.emit(|| {
            event(
                EventKind::Insert {
                    step: InsertStep::GoLeft,
                    node: here,
                },
                format!("{value} < {}, going left", here.value),
            )
        });
        node.left = Some(match node.left.take() {
            None => {
                log.emit(|| {
                    event(
                        EventKind::Insert {
                            step: InsertStep::AddedNode,
                            node: added,
                        },
                        format!("Added {value} as left child of {}", here.value),
                    )
                });
                fresh
            }
            Some(left) => insert_below::<B>(left, fresh, log),
        });
    } else {
        log.emit(|| {
            event(
                EventKind::Insert {
                    step: InsertStep::GoRight,
                    node: here,
                },
                format!("{value} >= {}, going right", here.value),
            )
        });
        node.right = Some(match node.right.take() {
            None => {
                log.emit(|| {
                    event(
                        EventKind::Insert {
                            step: InsertStep::AddedNode,
                            node: added,
                        },
                        format!("Added {value} as right child of {}", here.value),
                    )
                });
                fresh
            }
            Some(right) => insert_below::<B>(right, fresh, log),
        });
    }

    B::rebalance(node, log)
}

fn delete_below<B: Balance>(
    link: Link,
    value: Value,
    removed: &mut bool,
    log: &mut EventLog,
) -> Link {
    let Some(mut node) = link else {
        log.emit(|| {
            event(
                EventKind::Delete {
                    step: DeleteStep::NotFound,
                    value,
                    node: None,
                },
                format!("Value {value} not found in the tree"),
            )
        });
        return None;
    };

    let here = node.node_ref();
    let emit = |log: &mut EventLog, step: DeleteStep, node: NodeRef, message: String| {
        log.emit(|| {
            event(
                EventKind::Delete {
                    step,
                    value,
                    node: Some(node),
                },
                message,
            )
        });
    };

    emit(
        log,
        DeleteStep::Visiting,
        here,
        format!("Checking node with value {}", here.value),
    );

    match value.cmp(&node.value) {
        Ordering::Less => {
            emit(
                log,
                DeleteStep::GoLeft,
                here,
                format!("{value} < {}, going left", here.value),
            );
            node.left = delete_below::<B>(node.left.take(), value, removed, log);
        }
        Ordering::Greater => {
            emit(
                log,
                DeleteStep::GoRight,
                here,
                format!("{value} > {}, going right", here.value),
            );
            node.right = delete_below::<B>(node.right.take(), value, removed, log);
        }
        Ordering::Equal => {
            emit(
                log,
                DeleteStep::Found,
                here,
                format!("Found node to delete: {}", here.value),
            );

            match (node.left.take(), node.right.take()) {
                (None, None) => {
                    emit(
                        log,
                        DeleteStep::RemoveLeaf,
                        here,
                        format!("Removing leaf node {}", here.value),
                    );
                    *removed = true;
                    return None;
                }
                (None, Some(right)) => {
                    emit(
                        log,
                        DeleteStep::ReplaceWithRight,
                        here,
                        format!(
                            "Replacing node {} with its right child {}",
                            here.value, right.value
                        ),
                    );
                    *removed = true;
                    return Some(right);
                }
                (Some(left), None) => {
                    emit(
                        log,
                        DeleteStep::ReplaceWithLeft,
                        here,
                        format!(
                            "Replacing node {} with its left child {}",
                            here.value, left.value
                        ),
                    );
                    *removed = true;
                    return Some(left);
                }
                (Some(left), Some(right)) => {
                    emit(
                        log,
                        DeleteStep::FindSuccessor,
                        here,
                        "Node has two children, finding in-order successor".to_string(),
                    );

                    let mut successor = right.as_ref();
                    while let Some(next) = successor.left() {
                        emit(
                            log,
                            DeleteStep::FindingMin,
                            successor.node_ref(),
                            "Looking for minimum value in right subtree".to_string(),
                        );
                        successor = next;
                    }
                    let successor = successor.node_ref();
                    emit(
                        log,
                        DeleteStep::FoundSuccessor,
                        successor,
                        format!("Found successor: {}", successor.value),
                    );

                    node.left = Some(left);
                    node.value = successor.value;
                    emit(
                        log,
                        DeleteStep::ReplaceWithSuccessor,
                        node.node_ref(),
                        format!("Replaced value with successor: {}", successor.value),
                    );

                    // The successor's value now lives here; drop the original from the right subtree.
                    node.right = delete_below::<B>(Some(right), successor.value, removed, log);
                }
            }
        }
    }

    Some(B::rebalance(node, log))
}

fn search_below(
    node: Option<&TreeNode>,
    value: Value,
    path: &mut Vec<NodeRef>,
    log: &mut EventLog,
) -> Option<NodeRef> {
    let node = node?;
    let here = node.node_ref();
    path.push(here);

    let emit = |log: &mut EventLog, step: SearchStep, message: String| {
        log.emit(|| {
            event(
                EventKind::Search {
                    step,
                    value,
                    node: Some(here),
                },
                message,
            )
        });
    };

    emit(
        log,
        SearchStep::Visiting,
        format!("Checking node with value {}", here.value),
    );

    match value.cmp(&node.value) {
        Ordering::Equal => {
            emit(log, SearchStep::Found, format!("Found {value} at this node!"));
            Some(here)
        }
        Ordering::Less => {
            emit(
                log,
                SearchStep::GoLeft,
                format!("{value} < {}, going left", here.value),
            );
            search_below(node.left(), value, path, log)
        }
        Ordering::Greater => {
            emit(
                log,
                SearchStep::GoRight,
                format!("{value} > {}, going right", here.value),
            );
            search_below(node.right(), value, path, log)
        }
    }
}
