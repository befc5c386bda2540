use algo_visualiser_core::trace::{InsertStep, RotationDirection, RotationStep};
use algo_visualiser_core::tree::{measured_height, TreeNode};
use algo_visualiser_core::{
    AnimationEvent, AvlTree, BinarySearchTree, EventKind, NodeId, NodeRef, Value,
};
use proptest::prelude::*;

/// Search order with duplicates allowed on either side: rotations can lift a
/// right-routed duplicate above its twin.
fn ordered(node: Option<&TreeNode>, low: Option<Value>, high: Option<Value>) -> bool {
    let Some(node) = node else { return true };
    low.map_or(true, |low| node.value >= low)
        && high.map_or(true, |high| node.value <= high)
        && ordered(node.left(), low, Some(node.value))
        && ordered(node.right(), Some(node.value), high)
}

/// Plain search trees never rotate, so equal values stay strictly to the right.
fn strictly_ordered(node: Option<&TreeNode>, low: Option<Value>, high: Option<Value>) -> bool {
    let Some(node) = node else { return true };
    low.map_or(true, |low| node.value >= low)
        && high.map_or(true, |high| node.value < high)
        && strictly_ordered(node.left(), low, Some(node.value))
        && strictly_ordered(node.right(), Some(node.value), high)
}

fn heights_consistent(node: Option<&TreeNode>) -> bool {
    let Some(node) = node else { return true };
    let left = measured_height(node.left());
    let right = measured_height(node.right());
    node.height == measured_height(Some(node))
        && node.balance_factor == left - right
        && heights_consistent(node.left())
        && heights_consistent(node.right())
}

fn avl_balanced(node: Option<&TreeNode>) -> bool {
    let Some(node) = node else { return true };
    node.balance_factor.abs() <= 1 && avl_balanced(node.left()) && avl_balanced(node.right())
}

type ShapeLink = Option<Box<Shape>>;

/// Bare tree shape rebuilt from events alone.
#[derive(Debug, PartialEq)]
struct Shape {
    id: NodeId,
    value: Value,
    left: ShapeLink,
    right: ShapeLink,
}

impl Shape {
    fn leaf(node: NodeRef) -> Box<Self> {
        Box::new(Self {
            id: node.id,
            value: node.value,
            left: None,
            right: None,
        })
    }
}

fn shape_of(node: Option<&TreeNode>) -> ShapeLink {
    node.map(|node| {
        Box::new(Shape {
            id: node.id,
            value: node.value,
            left: shape_of(node.left()),
            right: shape_of(node.right()),
        })
    })
}

fn link_to(link: &mut ShapeLink, id: NodeId) -> Option<&mut ShapeLink> {
    if matches!(link, Some(node) if node.id == id) {
        return Some(link);
    }
    let node = link.as_mut()?;
    if let Some(found) = link_to(&mut node.left, id) {
        return Some(found);
    }
    link_to(&mut node.right, id)
}

fn rotate(link: &mut ShapeLink, direction: RotationDirection) {
    let Some(mut top) = link.take() else { return };
    let child = match direction {
        RotationDirection::Right => top.left.take(),
        RotationDirection::Left => top.right.take(),
    };
    let Some(mut child) = child else {
        *link = Some(top);
        return;
    };
    match direction {
        RotationDirection::Right => {
            top.left = child.right.take();
            child.right = Some(top);
        }
        RotationDirection::Left => {
            top.right = child.left.take();
            child.left = Some(top);
        }
    }
    *link = Some(child);
}

/// Attaches the added node under the last node the descent turned at, then
/// applies each rotation at its pivot.
fn replay_insert(root: &mut ShapeLink, events: &[AnimationEvent]) {
    let mut turn: Option<(NodeId, bool)> = None;
    for ev in events {
        match &ev.kind {
            EventKind::Insert { step, node } => match step {
                InsertStep::GoLeft => turn = Some((node.id, true)),
                InsertStep::GoRight => turn = Some((node.id, false)),
                InsertStep::Complete => *root = Some(Shape::leaf(*node)),
                InsertStep::AddedNode => {
                    let Some((parent_id, left)) = turn else { continue };
                    if let Some(Some(parent)) = link_to(root, parent_id) {
                        let side = if left { &mut parent.left } else { &mut parent.right };
                        *side = Some(Shape::leaf(*node));
                    }
                }
                _ => {}
            },
            EventKind::Rotation {
                step: RotationStep::Before,
                direction,
                pivot,
                ..
            } => {
                if let Some(link) = link_to(root, pivot.id) {
                    rotate(link, *direction);
                }
            }
            _ => {}
        }
    }
}

fn sorted(mut values: Vec<Value>) -> Vec<Value> {
    values.sort_unstable();
    values
}

proptest! {
    #[test]
    fn avl_search_finds_every_inserted_value(values in proptest::collection::vec(0i64..10, 1..40)) {
        let tree = AvlTree::from_values(values.iter().copied());
        for value in &values {
            prop_assert!(tree.contains(*value));
        }
    }

    #[test]
    fn bst_round_trip_is_sorted(values in proptest::collection::vec(-50i64..50, 0..64)) {
        let tree = BinarySearchTree::from_values(values.iter().copied());
        prop_assert_eq!(tree.to_array(), sorted(values.clone()));
        prop_assert_eq!(tree.len(), values.len());
        prop_assert!(strictly_ordered(tree.root(), None, None));
        prop_assert!(heights_consistent(tree.root()));
    }

    #[test]
    fn avl_stays_balanced_through_inserts(values in proptest::collection::vec(-100i64..100, 0..128)) {
        let mut tree = AvlTree::new();
        for value in &values {
            tree.insert(*value, false);
            prop_assert!(avl_balanced(tree.root()));
        }
        prop_assert!(ordered(tree.root(), None, None));
        prop_assert!(heights_consistent(tree.root()));
        prop_assert_eq!(tree.to_array(), sorted(values));
    }

    #[test]
    fn avl_stays_balanced_through_deletes(
        values in proptest::collection::vec(0i64..60, 1..80),
        removals in proptest::collection::vec(0i64..60, 0..80),
    ) {
        let mut tree = AvlTree::from_values(values.iter().copied());
        let mut expected = sorted(values);

        for value in removals {
            let removed = tree.delete(value, false).output;
            let position = expected.iter().position(|v| *v == value);
            prop_assert_eq!(removed, position.is_some());
            if let Some(position) = position {
                expected.remove(position);
            }
            prop_assert!(avl_balanced(tree.root()));
            prop_assert!(heights_consistent(tree.root()));
        }
        prop_assert!(ordered(tree.root(), None, None));
        prop_assert_eq!(tree.to_array(), expected.clone());
        prop_assert_eq!(tree.len(), expected.len());
    }

    #[test]
    fn bst_delete_keeps_order(
        values in proptest::collection::vec(0i64..40, 1..48),
        removals in proptest::collection::vec(0i64..40, 0..48),
    ) {
        let mut tree = BinarySearchTree::from_values(values.iter().copied());
        let mut expected = sorted(values);
        for value in removals {
            if tree.delete(value, false).output {
                let position = expected.iter().position(|v| *v == value);
                prop_assert!(position.is_some());
                if let Some(position) = position {
                    expected.remove(position);
                }
            }
            prop_assert!(strictly_ordered(tree.root(), None, None));
        }
        prop_assert_eq!(tree.to_array(), expected);
    }

    #[test]
    fn search_does_not_mutate(
        values in proptest::collection::vec(-20i64..20, 0..32),
        target in -25i64..25,
    ) {
        let tree = AvlTree::from_values(values.iter().copied());
        let before = tree.to_array();

        let first = tree.search(target, true);
        let second = tree.search(target, true);
        prop_assert_eq!(&first.output, &second.output);
        prop_assert_eq!(first.events, second.events);
        prop_assert_eq!(first.output.found, values.contains(&target));
        prop_assert_eq!(tree.to_array(), before);
    }

    #[test]
    fn animation_does_not_change_results(values in proptest::collection::vec(-30i64..30, 0..40)) {
        let mut silent = AvlTree::new();
        let mut animated = AvlTree::new();
        for value in &values {
            let quiet = silent.insert(*value, false);
            let loud = animated.insert(*value, true);
            prop_assert!(quiet.events.is_empty());
            prop_assert!(!loud.events.is_empty());
        }
        prop_assert_eq!(silent.to_array(), animated.to_array());
        prop_assert_eq!(silent.height(), animated.height());
    }

    #[test]
    fn avl_insert_traces_rebuild_the_live_shape(values in proptest::collection::vec(-40i64..40, 0..64)) {
        let mut tree = AvlTree::new();
        let mut replayed: ShapeLink = None;
        for value in values {
            let traced = tree.insert(value, true);
            replay_insert(&mut replayed, &traced.events);
            prop_assert_eq!(&replayed, &shape_of(tree.root()));
        }
    }
}
