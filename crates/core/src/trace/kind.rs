use serde::{Deserialize, Serialize};

use crate::tree::NodeRef;
use crate::Value;

/// Declares a phase tag enum whose serialized form matches [`as_str`].
macro_rules! phase {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $tag)] $variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }
        }
    };
}

phase!(
    /// Phases of a search tree insertion.
    InsertStep {
        Start => "start",
        Comparing => "comparing",
        GoLeft => "goLeft",
        GoRight => "goRight",
        AddedNode => "addedNode",
        Complete => "complete",
    }
);

phase!(
    SearchStep {
        Visiting => "visiting",
        GoLeft => "goLeft",
        GoRight => "goRight",
        Found => "found",
        NotFound => "notFound",
    }
);

phase!(
    /// Phases of a search tree deletion, including the successor walk.
    DeleteStep {
        Start => "start",
        Visiting => "visiting",
        GoLeft => "goLeft",
        GoRight => "goRight",
        Found => "found",
        RemoveLeaf => "removeLeaf",
        ReplaceWithLeft => "replaceWithLeft",
        ReplaceWithRight => "replaceWithRight",
        FindSuccessor => "findSuccessor",
        FindingMin => "findingMin",
        FoundSuccessor => "foundSuccessor",
        ReplaceWithSuccessor => "replaceWithSuccessor",
        NotFound => "notFound",
    }
);

phase!(
    BalanceStep {
        Calculating => "calculating",
        Imbalance => "imbalance",
        Balanced => "balanced",
    }
);

phase!(
    RotationStep {
        Before => "before",
        After => "after",
    }
);

phase!(
    RotationDirection {
        Left => "left",
        Right => "right",
    }
);

phase!(
    /// The four AVL imbalance shapes, named after the path to the heavy grandchild.
    RotationCase {
        LL => "LL",
        LR => "LR",
        RR => "RR",
        RL => "RL",
    }
);

phase!(
    TraversalOrder {
        InOrder => "inorder",
        PreOrder => "preorder",
        PostOrder => "postorder",
        LevelOrder => "levelorder",
    }
);

phase!(
    TraversalStep {
        VisitLeft => "visitLeft",
        VisitNode => "visitNode",
        VisitRight => "visitRight",
        NewLevel => "newLevel",
    }
);

phase!(
    HeapInsertStep {
        Add => "add",
    }
);

phase!(
    SiftUpStep {
        Compare => "compare",
        Complete => "complete",
    }
);

phase!(
    SiftDownStep {
        CompareLeft => "compareLeft",
        CompareRight => "compareRight",
        SelectChild => "selectChild",
        MaintainsHeapProperty => "maintainsHeapProperty",
        Complete => "complete",
    }
);

phase!(
    SwapStep {
        BeforeSwap => "beforeSwap",
        AfterSwap => "afterSwap",
    }
);

phase!(
    ExtractStep {
        Empty => "empty",
        ExtractRoot => "extractRoot",
        ReplaceRoot => "replaceRoot",
        Complete => "complete",
    }
);

phase!(
    HeapifyStep {
        Insert => "insert",
        StartHeapify => "startHeapify",
        HeapifyNode => "heapifyNode",
        Complete => "complete",
    }
);

/// One synthetic call-stack frame of a divide-and-conquer sort.
///
/// Bounds are inclusive. Quicksort recurses into empty partitions, so
/// `right < left` is a legal, empty frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub depth: usize,
    pub left: isize,
    pub right: isize,
    pub values: Vec<Value>,
    pub action: String,
}

/// Payload of an [`AnimationEvent`](super::AnimationEvent), keyed by event type.
///
/// Every variant has a fixed field set so that a renderer can highlight the
/// right nodes or indices without looking at the live structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EventKind {
    Insert {
        step: InsertStep,
        node: NodeRef,
    },
    Search {
        step: SearchStep,
        value: Value,
        node: Option<NodeRef>,
    },
    Delete {
        step: DeleteStep,
        value: Value,
        node: Option<NodeRef>,
    },
    Balance {
        step: BalanceStep,
        node: NodeRef,
        balance_factor: i32,
        case: Option<RotationCase>,
    },
    /// `old_root`/`new_root` are only set on the `after` step.
    Rotation {
        step: RotationStep,
        direction: RotationDirection,
        pivot: NodeRef,
        old_root: Option<NodeRef>,
        new_root: Option<NodeRef>,
    },
    Traversal {
        order: TraversalOrder,
        step: TraversalStep,
        node: Option<NodeRef>,
        level: Option<usize>,
    },

    /// Tree insertions own the `insert` tag, so the heap's append is `heapInsert`.
    HeapInsert {
        step: HeapInsertStep,
        index: usize,
        value: Value,
    },
    HeapifyUp {
        step: SiftUpStep,
        index: usize,
        value: Value,
        parent_index: Option<usize>,
    },
    HeapifyDown {
        step: SiftDownStep,
        index: usize,
        value: Value,
        child_index: Option<usize>,
    },
    Swap {
        step: SwapStep,
        indices: [usize; 2],
        values: [Value; 2],
    },
    Extract {
        step: ExtractStep,
        index: Option<usize>,
        value: Option<Value>,
    },
    Heapify {
        step: HeapifyStep,
        index: Option<usize>,
        value: Option<Value>,
    },

    Compare {
        indices: Vec<usize>,
        values: Vec<Value>,
    },
    Found {
        index: usize,
        value: Value,
    },
    NotFound {
        target: Value,
    },
    Range {
        left: usize,
        right: usize,
        mid: usize,
    },
    MoveLeft {
        mid: usize,
    },
    MoveRight {
        mid: usize,
    },
    PreSorted {
        array: Vec<Value>,
    },
    ArraySwap {
        indices: [usize; 2],
        values: [Value; 2],
    },
    Update {
        array: Vec<Value>,
    },
    Sorted {
        indices: Vec<usize>,
    },
    EarlyExit {
        pass: usize,
    },
    Highlight {
        indices: Vec<usize>,
    },
    Shift {
        from: usize,
        to: usize,
        value: Value,
        array: Vec<Value>,
    },
    InsertAt {
        index: usize,
        value: Value,
        array: Vec<Value>,
    },
    NewMin {
        old_index: usize,
        new_index: usize,
        value: Value,
    },
    NoSwap {
        index: Option<usize>,
    },
    Divide {
        left: usize,
        mid: usize,
        right: usize,
    },
    MergeStart {
        left: usize,
        mid: usize,
        right: usize,
    },
    Copy {
        source: usize,
        destination: usize,
        value: Value,
    },
    MergeComplete {
        left: usize,
        right: usize,
        array: Vec<Value>,
    },
    Pivot {
        index: usize,
        value: Value,
    },
    Subarray {
        low: usize,
        high: usize,
    },
    PartitionComplete {
        index: usize,
        pivot: Value,
    },
    Message,
    Complete,

    ResetStack,
    PushFrame {
        frame: StackFrame,
        active_frame: usize,
    },
    UpdateFrame {
        frame_index: usize,
        action: String,
        values: Option<Vec<Value>>,
    },
    PopFrame {
        frame_index: usize,
        active_frame: usize,
    },
}

impl EventKind {
    /// The `type` tag this event serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Search { .. } => "search",
            Self::Delete { .. } => "delete",
            Self::Balance { .. } => "balance",
            Self::Rotation { .. } => "rotation",
            Self::Traversal { .. } => "traversal",
            Self::HeapInsert { .. } => "heapInsert",
            Self::HeapifyUp { .. } => "heapifyUp",
            Self::HeapifyDown { .. } => "heapifyDown",
            Self::Swap { .. } => "swap",
            Self::Extract { .. } => "extract",
            Self::Heapify { .. } => "heapify",
            Self::Compare { .. } => "compare",
            Self::Found { .. } => "found",
            Self::NotFound { .. } => "notFound",
            Self::Range { .. } => "range",
            Self::MoveLeft { .. } => "moveLeft",
            Self::MoveRight { .. } => "moveRight",
            Self::PreSorted { .. } => "preSorted",
            Self::ArraySwap { .. } => "arraySwap",
            Self::Update { .. } => "update",
            Self::Sorted { .. } => "sorted",
            Self::EarlyExit { .. } => "earlyExit",
            Self::Highlight { .. } => "highlight",
            Self::Shift { .. } => "shift",
            Self::InsertAt { .. } => "insertAt",
            Self::NewMin { .. } => "newMin",
            Self::NoSwap { .. } => "noSwap",
            Self::Divide { .. } => "divide",
            Self::MergeStart { .. } => "mergeStart",
            Self::Copy { .. } => "copy",
            Self::MergeComplete { .. } => "mergeComplete",
            Self::Pivot { .. } => "pivot",
            Self::Subarray { .. } => "subarray",
            Self::PartitionComplete { .. } => "partitionComplete",
            Self::Message => "message",
            Self::Complete => "complete",
            Self::ResetStack => "resetStack",
            Self::PushFrame { .. } => "pushFrame",
            Self::UpdateFrame { .. } => "updateFrame",
            Self::PopFrame { .. } => "popFrame",
        }
    }

    /// The phase tag within the operation, for event types that have one.
    pub fn step_name(&self) -> Option<&'static str> {
        match self {
            Self::Insert { step, .. } => Some(step.as_str()),
            Self::Search { step, .. } => Some(step.as_str()),
            Self::Delete { step, .. } => Some(step.as_str()),
            Self::Balance { step, .. } => Some(step.as_str()),
            Self::Rotation { step, .. } => Some(step.as_str()),
            Self::Traversal { step, .. } => Some(step.as_str()),
            Self::HeapInsert { step, .. } => Some(step.as_str()),
            Self::HeapifyUp { step, .. } => Some(step.as_str()),
            Self::HeapifyDown { step, .. } => Some(step.as_str()),
            Self::Swap { step, .. } => Some(step.as_str()),
            Self::Extract { step, .. } => Some(step.as_str()),
            Self::Heapify { step, .. } => Some(step.as_str()),
            _ => None,
        }
    }
}
