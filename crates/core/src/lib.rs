//! Core library for the algorithm visualiser.
//!
//! Each engine owns its structure and returns, from every operation, the
//! result together with a step-by-step trace of how it was reached. Search
//! trees (plain and AVL), the binary heap and the array algorithms all record
//! into the same [`AnimationEvent`] model, which [`timeline`] replays.

pub mod array;
pub mod config;
pub mod error;
pub mod heap;
pub mod random;
pub mod timeline;
pub mod trace;
pub mod tree;

/// Integer key stored by every structure.
pub type Value = i64;

pub use array::{
    binary_search, is_sorted, linear_search, sort, BinarySearchOutcome, SearchAlgorithm,
    SortAlgorithm, SortOutcome, SortProperties,
};
pub use config::{AppConfig, HeapConfig, PlaybackConfig, RandomConfig};
pub use error::{AlgoVizError, Result};
pub use heap::{BinaryHeap, HeapKind};
pub use timeline::{apply_highlights, highlight_states, PlaybackClock, Player};
pub use trace::{AnimationEvent, EventKind, EventLog, StackFrame, Traced};
pub use tree::traversal::{traversal_trace, traverse, TraversalOrder};
pub use tree::{
    AvlTree, BinarySearchTree, HighlightState, NodeId, NodeRef, SearchOutcome, SearchTree,
    TreeNode, TreeStats,
};
