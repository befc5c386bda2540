//! Array-backed binary heap.
//!
//! The array is the only source of truth. The tree shown to learners is
//! rebuilt from it on demand by [`BinaryHeap::tree_view`].

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::random::distinct_values;
use crate::trace::{
    event, EventKind, EventLog, ExtractStep, HeapInsertStep, HeapifyStep, SiftDownStep,
    SiftUpStep, SwapStep, Traced,
};
use crate::tree::{Link, NodeId, TreeNode};
use crate::{AlgoVizError, Result, Value};

/// Parent index of `index`; the root has none.
pub fn parent(index: usize) -> Option<usize> {
    index.checked_sub(1).map(|i| i / 2)
}

pub fn left_child(index: usize) -> usize {
    2 * index + 1
}

pub fn right_child(index: usize) -> usize {
    2 * index + 2
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapKind {
    #[default]
    Min,
    Max,
}

impl HeapKind {
    /// Whether `upper` must move below `lower` to restore heap order.
    pub fn out_of_order(self, upper: Value, lower: Value) -> bool {
        match self {
            Self::Min => upper > lower,
            Self::Max => upper < lower,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Min => "Min",
            Self::Max => "Max",
        }
    }
}

impl fmt::Display for HeapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeapKind {
    type Err = AlgoVizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(AlgoVizError::invalid_input(format!(
                "unknown heap type `{other}`, expected `min` or `max`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryHeap {
    items: Vec<Value>,
    kind: HeapKind,
}

impl BinaryHeap {
    pub fn new(kind: HeapKind) -> Self {
        Self {
            items: Vec::new(),
            kind,
        }
    }

    /// Inserts `count` distinct values drawn uniformly from `[min, max]`, one at a time.
    pub fn create_random(count: usize, min: Value, max: Value, kind: HeapKind) -> Result<Self> {
        Self::create_random_with(&mut rand::thread_rng(), count, min, max, kind)
    }

    pub fn create_random_with<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        min: Value,
        max: Value,
        kind: HeapKind,
    ) -> Result<Self> {
        let mut heap = Self::new(kind);
        for value in distinct_values(rng, count, min, max)? {
            heap.insert(value, false);
        }
        Ok(heap)
    }

    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn to_array(&self) -> Vec<Value> {
        self.items.clone()
    }

    /// Root value without removing it.
    pub fn peek(&self) -> Option<Value> {
        self.items.first().copied()
    }

    /// Whether every parent is ordered correctly against its children.
    pub fn is_valid(&self) -> bool {
        (1..self.items.len()).all(|i| {
            parent(i).map_or(true, |p| !self.kind.out_of_order(self.items[p], self.items[i]))
        })
    }

    /// Appends `value` and sifts it up. Returns the index it settled at.
    pub fn insert(&mut self, value: Value, animate: bool) -> Traced<usize> {
        let mut log = EventLog::new(animate);
        self.items.push(value);
        let index = self.items.len() - 1;

        log.emit(|| {
            event(
                EventKind::HeapInsert {
                    step: HeapInsertStep::Add,
                    index,
                    value,
                },
                format!("Added {value} to the heap"),
            )
        });

        let settled = self.heapify_up(index, &mut log);
        tracing::debug!(value, settled, size = self.items.len(), "heap insert");
        Traced::new(settled, log)
    }

    /// Removes and returns the root. An empty heap yields `None`.
    pub fn extract_root(&mut self, animate: bool) -> Traced<Option<Value>> {
        let mut log = EventLog::new(animate);

        let Some(&root) = self.items.first() else {
            log.emit(|| {
                event(
                    EventKind::Extract {
                        step: ExtractStep::Empty,
                        index: None,
                        value: None,
                    },
                    "Heap is empty, nothing to extract",
                )
            });
            return Traced::new(None, log);
        };

        log.emit(|| {
            event(
                EventKind::Extract {
                    step: ExtractStep::ExtractRoot,
                    index: Some(0),
                    value: Some(root),
                },
                format!("Extracting root value {root}"),
            )
        });

        match self.items.pop() {
            Some(last) if !self.items.is_empty() => {
                self.items[0] = last;
                log.emit(|| {
                    event(
                        EventKind::Extract {
                            step: ExtractStep::ReplaceRoot,
                            index: Some(0),
                            value: Some(last),
                        },
                        format!("Replaced root with last element {last}"),
                    )
                });
                self.heapify_down(0, &mut log);
            }
            _ => {
                log.emit(|| {
                    event(
                        EventKind::Extract {
                            step: ExtractStep::Complete,
                            index: None,
                            value: Some(root),
                        },
                        format!("Removed the only element {root}"),
                    )
                });
            }
        }

        tracing::debug!(root, size = self.items.len(), "heap extract");
        Traced::new(Some(root), log)
    }

    /// Builds a heap from `values` in O(n): load everything, then sift down
    /// every internal node from the last one back to the root.
    pub fn heapify(values: &[Value], kind: HeapKind, animate: bool) -> Traced<BinaryHeap> {
        let mut log = EventLog::new(animate);
        let mut heap = Self::new(kind);

        for &value in values {
            heap.items.push(value);
            log.emit(|| {
                event(
                    EventKind::Heapify {
                        step: HeapifyStep::Insert,
                        index: None,
                        value: Some(value),
                    },
                    format!("Added {value} to the heap"),
                )
            });
        }

        let last_internal = (heap.items.len() / 2).checked_sub(1);
        log.emit(|| {
            let message = match last_internal {
                Some(index) => {
                    format!("Starting heapify from last non-leaf node at index {index}")
                }
                None => "No internal nodes, the array is already a heap".to_string(),
            };
            event(
                EventKind::Heapify {
                    step: HeapifyStep::StartHeapify,
                    index: last_internal,
                    value: None,
                },
                message,
            )
        });

        if let Some(last_internal) = last_internal {
            for index in (0..=last_internal).rev() {
                let value = heap.items[index];
                log.emit(|| {
                    event(
                        EventKind::Heapify {
                            step: HeapifyStep::HeapifyNode,
                            index: Some(index),
                            value: Some(value),
                        },
                        format!("Heapifying subtree rooted at index {index} with value {value}"),
                    )
                });
                heap.heapify_down(index, &mut log);
            }
        }

        log.emit(|| {
            event(
                EventKind::Heapify {
                    step: HeapifyStep::Complete,
                    index: None,
                    value: None,
                },
                format!("Heapify complete! {} heap created successfully", kind.label()),
            )
        });

        tracing::debug!(size = heap.items.len(), kind = kind.as_str(), "heapify");
        Traced::new(heap, log)
    }

    /// Derived tree for display. Node ids are array indices.
    pub fn tree_view(&self) -> Option<TreeNode> {
        fn build(items: &[Value], index: usize) -> Link {
            let value = *items.get(index)?;
            let mut node = TreeNode::new(NodeId(index as u64), value);
            node.left = build(items, left_child(index));
            node.right = build(items, right_child(index));
            node.refresh();
            Some(Box::new(node))
        }
        build(&self.items, 0).map(|node| *node)
    }

    fn heapify_up(&mut self, index: usize, log: &mut EventLog) -> usize {
        let mut current = index;

        while let Some(parent_index) = parent(current) {
            if !self
                .kind
                .out_of_order(self.items[parent_index], self.items[current])
            {
                break;
            }
            let (value, parent_value) = (self.items[current], self.items[parent_index]);
            log.emit(|| {
                event(
                    EventKind::HeapifyUp {
                        step: SiftUpStep::Compare,
                        index: current,
                        value,
                        parent_index: Some(parent_index),
                    },
                    format!("Comparing {value} with parent {parent_value}"),
                )
            });
            self.swap(parent_index, current, log);
            current = parent_index;
        }

        if current != index {
            let value = self.items[current];
            log.emit(|| {
                event(
                    EventKind::HeapifyUp {
                        step: SiftUpStep::Complete,
                        index: current,
                        value,
                        parent_index: None,
                    },
                    format!("Element {value} is now in the correct position"),
                )
            });
        }
        current
    }

    fn heapify_down(&mut self, index: usize, log: &mut EventLog) -> usize {
        let mut current = index;

        while left_child(current) < self.items.len() {
            let value = self.items[current];
            let left = left_child(current);
            let mut chosen = left;
            let sift = |log: &mut EventLog, step, child: Option<usize>, message: String| {
                log.emit(|| {
                    event(
                        EventKind::HeapifyDown {
                            step,
                            index: current,
                            value,
                            child_index: child,
                        },
                        message,
                    )
                });
            };

            sift(
                log,
                SiftDownStep::CompareLeft,
                Some(left),
                format!("Comparing with left child {}", self.items[left]),
            );

            let right = right_child(current);
            if right < self.items.len() {
                sift(
                    log,
                    SiftDownStep::CompareRight,
                    Some(right),
                    format!("Comparing with right child {}", self.items[right]),
                );
                // Left wins ties; right is only chosen if it strictly belongs above left.
                let side = if self.kind.out_of_order(self.items[left], self.items[right]) {
                    chosen = right;
                    "right"
                } else {
                    "left"
                };
                sift(
                    log,
                    SiftDownStep::SelectChild,
                    Some(chosen),
                    format!("Selected {side} child {} for comparison", self.items[chosen]),
                );
            }

            if !self.kind.out_of_order(value, self.items[chosen]) {
                sift(
                    log,
                    SiftDownStep::MaintainsHeapProperty,
                    None,
                    format!("{value} already satisfies heap property"),
                );
                break;
            }

            self.swap(current, chosen, log);
            current = chosen;
        }

        if current != index {
            let value = self.items[current];
            log.emit(|| {
                event(
                    EventKind::HeapifyDown {
                        step: SiftDownStep::Complete,
                        index: current,
                        value,
                        child_index: None,
                    },
                    format!("Element {value} is now in the correct position"),
                )
            });
        }
        current
    }

    fn swap(&mut self, i: usize, j: usize, log: &mut EventLog) {
        let before = [self.items[i], self.items[j]];
        log.emit(|| {
            event(
                EventKind::Swap {
                    step: SwapStep::BeforeSwap,
                    indices: [i, j],
                    values: before,
                },
                format!("Swapping {} and {}", before[0], before[1]),
            )
        });

        self.items.swap(i, j);

        let after = [self.items[i], self.items[j]];
        log.emit(|| {
            event(
                EventKind::Swap {
                    step: SwapStep::AfterSwap,
                    indices: [i, j],
                    values: after,
                },
                format!("Swapped {} and {}", after[1], after[0]),
            )
        });
    }
}
