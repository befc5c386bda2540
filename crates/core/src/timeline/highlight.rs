use std::collections::HashMap;

use crate::trace::{AnimationEvent, DeleteStep, EventKind, InsertStep, SearchStep};
use crate::tree::{HighlightState, NodeId, TreeNode};

/// Folds events `0..=step` into the highlight each node should show.
///
/// Later events overwrite earlier ones for the same node. Nodes that no event
/// touched are absent and render as [`HighlightState::Normal`].
pub fn highlight_states(events: &[AnimationEvent], step: usize) -> HashMap<NodeId, HighlightState> {
    let mut states = HashMap::new();

    for ev in events.iter().take(step.saturating_add(1)) {
        let marked = match &ev.kind {
            EventKind::Insert { step, node } => insert_state(*step).map(|state| (node.id, state)),
            EventKind::Search {
                step,
                node: Some(node),
                ..
            } => search_state(*step).map(|state| (node.id, state)),
            EventKind::Delete {
                step,
                node: Some(node),
                ..
            } => delete_state(*step).map(|state| (node.id, state)),
            _ => None,
        };
        if let Some((id, state)) = marked {
            states.insert(id, state);
        }
    }
    states
}

fn insert_state(step: InsertStep) -> Option<HighlightState> {
    match step {
        InsertStep::Comparing | InsertStep::GoLeft | InsertStep::GoRight => {
            Some(HighlightState::Highlight)
        }
        InsertStep::AddedNode | InsertStep::Complete => Some(HighlightState::Inserting),
        InsertStep::Start => None,
    }
}

fn search_state(step: SearchStep) -> Option<HighlightState> {
    match step {
        SearchStep::Visiting => Some(HighlightState::Highlight),
        SearchStep::GoLeft | SearchStep::GoRight => Some(HighlightState::Searching),
        SearchStep::Found => Some(HighlightState::Found),
        SearchStep::NotFound => None,
    }
}

fn delete_state(step: DeleteStep) -> Option<HighlightState> {
    match step {
        DeleteStep::Visiting
        | DeleteStep::Found
        | DeleteStep::FindSuccessor
        | DeleteStep::FindingMin
        | DeleteStep::FoundSuccessor => Some(HighlightState::Highlight),
        DeleteStep::GoLeft | DeleteStep::GoRight => Some(HighlightState::Searching),
        DeleteStep::RemoveLeaf
        | DeleteStep::ReplaceWithLeft
        | DeleteStep::ReplaceWithRight
        | DeleteStep::ReplaceWithSuccessor => Some(HighlightState::Deleting),
        DeleteStep::Start | DeleteStep::NotFound => None,
    }
}

/// Resets every node under `root`, then paints the given states. Ids that are
/// no longer in the tree are ignored.
pub fn apply_highlights(root: Option<&mut TreeNode>, states: &HashMap<NodeId, HighlightState>) {
    let Some(root) = root else { return };
    root.reset_highlights();
    for (&id, &state) in states {
        if let Some(node) = root.find_mut(id) {
            node.highlight = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BinarySearchTree;

    #[test]
    fn search_trace_paints_path_then_target() {
        let mut tree = BinarySearchTree::from_values([50, 30, 70, 20]);
        let trace = tree.search(20, true).events;

        let states = highlight_states(&trace, trace.len() - 1);
        apply_highlights(tree.root_mut(), &states);

        let root = tree.root().unwrap();
        assert_eq!(root.highlight, HighlightState::Searching);
        assert_eq!(root.left().unwrap().highlight, HighlightState::Searching);
        assert_eq!(root.left().unwrap().left().unwrap().highlight, HighlightState::Found);
        assert_eq!(root.right().unwrap().highlight, HighlightState::Normal);
    }

    #[test]
    fn early_steps_only_show_what_has_happened() {
        let tree = BinarySearchTree::from_values([50, 30]);
        let trace = tree.search(30, true).events;

        let states = highlight_states(&trace, 0);
        assert_eq!(states.len(), 1);
        assert_eq!(
            states.get(&tree.root().unwrap().id),
            Some(&HighlightState::Highlight)
        );
    }

    #[test]
    fn insert_marks_new_node_as_inserting() {
        let mut tree = BinarySearchTree::from_values([10]);
        let traced = tree.insert(15, true);
        let states = highlight_states(&traced.events, usize::MAX);
        assert_eq!(states.get(&traced.output.id), Some(&HighlightState::Inserting));
    }

    #[test]
    fn apply_resets_stale_highlights() {
        let mut tree = BinarySearchTree::from_values([2, 1]);
        if let Some(root) = tree.root_mut() {
            root.highlight = HighlightState::Deleting;
        }
        apply_highlights(tree.root_mut(), &HashMap::new());
        assert_eq!(tree.root().unwrap().highlight, HighlightState::Normal);
    }
}
