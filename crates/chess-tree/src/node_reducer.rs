//! Edit commands over a move tree, with undo/redo.
//!
//! [`NodeState::reduce`] applies one [`NodeAction`] and reports whether the
//! tree changed. Commands that change nothing leave the state untouched,
//! history included, so an undo never lands on a no-op.

use std::mem;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cursor::NodeCursor;
use crate::nag::Nag;
use crate::node::{Annotations, Children, Move, Node, Priority};
use crate::priority::{set_subtree_priority, update_ancestor_priority};
use crate::update::{update_child, update_to_start_of_branch};

// ── Actions ───────────────────────────────────────────────────────────────

/// One edit command. Paths are moves from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeAction {
    /// Insert every missing node along `moves`.
    Add { moves: Vec<Move> },
    /// Remove the node at `moves`; an empty path clears the root.
    Delete { moves: Vec<Move> },
    SetComment { moves: Vec<Move>, comment: String },
    SetAnnotations { moves: Vec<Move>, annotations: Annotations },
    SetNags { moves: Vec<Move>, nags: Vec<Nag> },
    /// Set the priority of the node at `moves` and its whole subtree.
    SetPriority { moves: Vec<Move>, priority: Priority },
    Undo,
    Redo,
}

fn collect_moves<I, M>(moves: I) -> Vec<Move>
where
    I: IntoIterator<Item = M>,
    M: Into<Move>,
{
    moves.into_iter().map(Into::into).collect()
}

impl NodeAction {
    pub fn add<I: IntoIterator<Item = M>, M: Into<Move>>(moves: I) -> Self {
        NodeAction::Add {
            moves: collect_moves(moves),
        }
    }

    pub fn delete<I: IntoIterator<Item = M>, M: Into<Move>>(moves: I) -> Self {
        NodeAction::Delete {
            moves: collect_moves(moves),
        }
    }

    pub fn set_comment<I, M>(moves: I, comment: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Move>,
    {
        NodeAction::SetComment {
            moves: collect_moves(moves),
            comment: comment.into(),
        }
    }

    pub fn set_priority<I: IntoIterator<Item = M>, M: Into<Move>>(moves: I, priority: Priority) -> Self {
        NodeAction::SetPriority {
            moves: collect_moves(moves),
            priority,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeAction::Add { .. } => "add",
            NodeAction::Delete { .. } => "delete",
            NodeAction::SetComment { .. } => "set-comment",
            NodeAction::SetAnnotations { .. } => "set-annotations",
            NodeAction::SetNags { .. } => "set-nags",
            NodeAction::SetPriority { .. } => "set-priority",
            NodeAction::Undo => "undo",
            NodeAction::Redo => "redo",
        }
    }
}

// ── State ─────────────────────────────────────────────────────────────────

/// Current tree plus undo/redo history.
///
/// Both stacks keep their most recent snapshot last. Snapshots share
/// structure with each other, so history costs one root-to-edit path per
/// entry. The undo/redo flags are read off the stacks.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub node: Arc<Node>,
    undo_stack: Vec<Arc<Node>>,
    redo_stack: Vec<Arc<Node>>,
}

impl NodeState {
    pub fn new(node: impl Into<Arc<Node>>) -> Self {
        Self {
            node: node.into(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Arc<Node>] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Arc<Node>] {
        &self.redo_stack
    }

    /// Apply `action`, returning `true` if the state changed.
    pub fn reduce(&mut self, action: &NodeAction) -> bool {
        match action {
            NodeAction::Undo => return self.undo(),
            NodeAction::Redo => return self.redo(),
            _ => {}
        }
        match apply_action(&self.node, action) {
            Some(node) => {
                debug!(action = action.name(), undo_depth = self.undo_stack.len() + 1, "edit applied");
                self.commit(node);
                true
            }
            None => {
                trace!(action = action.name(), "edit skipped, tree unchanged");
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        let Some(node) = self.undo_stack.pop() else {
            return false;
        };
        let current = mem::replace(&mut self.node, node);
        self.redo_stack.push(current);
        debug!(undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(node) = self.redo_stack.pop() else {
            return false;
        };
        let current = mem::replace(&mut self.node, node);
        self.undo_stack.push(current);
        debug!(undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo");
        true
    }

    /// Forget all history, keeping the current tree.
    pub fn reset_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn commit(&mut self, node: Arc<Node>) {
        let prior = mem::replace(&mut self.node, node);
        self.undo_stack.push(prior);
        self.redo_stack.clear();
    }
}

// ── Commands ──────────────────────────────────────────────────────────────

/// New root for `action`, or `None` if it changes nothing.
fn apply_action(node: &Arc<Node>, action: &NodeAction) -> Option<Arc<Node>> {
    match action {
        NodeAction::Add { moves } => add(node, moves),
        NodeAction::Delete { moves } => delete(node, moves),
        NodeAction::SetComment { moves, comment } => edit_node(node, moves, |target| {
            (target.comment != *comment).then(|| Node {
                comment: comment.clone(),
                ..target.clone()
            })
        }),
        NodeAction::SetAnnotations { moves, annotations } => edit_node(node, moves, |target| {
            (target.annotations != *annotations).then(|| Node {
                annotations: annotations.clone(),
                ..target.clone()
            })
        }),
        NodeAction::SetNags { moves, nags } => edit_node(node, moves, |target| {
            (target.nags != *nags).then(|| Node {
                nags: nags.clone(),
                ..target.clone()
            })
        }),
        NodeAction::SetPriority { moves, priority } => set_priority(node, moves, *priority),
        NodeAction::Undo | NodeAction::Redo => None,
    }
}

fn add(node: &Node, moves: &[Move]) -> Option<Arc<Node>> {
    let mut cursor = NodeCursor::init(node);
    let mut inserted = false;
    for mv in moves {
        inserted |= cursor.move_or_insert(mv);
    }
    inserted.then(|| Arc::new(cursor.into_root()))
}

pub(crate) fn delete(node: &Arc<Node>, moves: &[Move]) -> Option<Arc<Node>> {
    let Some((last, parent_moves)) = moves.split_last() else {
        if node.is_leaf() {
            return None;
        }
        return Some(Arc::new(Node {
            children: Children::new(),
            ..Node::clone(node)
        }));
    };
    if !node.get_descendant(parent_moves)?.children.contains_key(last) {
        return None;
    }
    // A parent left with one child takes that child's priority, and so does
    // the single-child run above it.
    let mut flood = None;
    let updated = update_child(node, parent_moves, |parent| {
        let mut parent = parent.clone();
        parent.children.shift_remove(last);
        if let Some(child) = parent.get_single_child() {
            if child.priority != parent.priority {
                flood = Some(child.priority);
            }
        }
        parent
    });
    Some(match flood {
        Some(priority) => update_to_start_of_branch(&updated, parent_moves, |node| Node {
            priority,
            ..node.clone()
        }),
        None => updated,
    })
}

fn set_priority(node: &Node, moves: &[Move], priority: Priority) -> Option<Arc<Node>> {
    let mut cursor = NodeCursor::init(node);
    if !cursor.bulk_move(moves) {
        return None;
    }
    let below = set_subtree_priority(&mut cursor, priority);
    let above = update_ancestor_priority(&mut cursor);
    (below || above).then(|| Arc::new(cursor.into_root()))
}

/// Replace the node at `moves` with `edit(node)`, unless the path doesn't
/// resolve or `edit` declines.
fn edit_node<F>(node: &Arc<Node>, moves: &[Move], edit: F) -> Option<Arc<Node>>
where
    F: FnOnce(&Node) -> Option<Node>,
{
    let updated = edit(node.get_descendant(moves)?)?;
    Some(update_child(node, moves, |_| updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::check_priority_invariant;
    use crate::testutil::build_node;
    use serde_json::json;

    fn state(value: serde_json::Value) -> NodeState {
        NodeState::new(build_node(&value))
    }

    #[test]
    fn initial_state() {
        let state = NodeState::new(Node::new());
        assert!(!state.can_undo());
        assert!(!state.can_redo());
        assert!(state.undo_stack().is_empty());
        assert!(state.redo_stack().is_empty());
    }

    #[test]
    fn add_inserts_missing_nodes() {
        let mut state = NodeState::new(Node::new());
        assert!(state.reduce(&NodeAction::add(["e4", "e5", "Nf3"])));
        assert!(state.reduce(&NodeAction::add(["e4", "e5", "Nc3"])));
        assert_eq!(*state.node, build_node(&json!({"e4": {"e5": {"Nf3": {}, "Nc3": {}}}})));
        assert!(state.can_undo());
        assert_eq!(state.undo_stack().len(), 2);
    }

    #[test]
    fn add_existing_line_is_noop() {
        let mut state = state(json!({"e4": {"e5": {}}}));
        let before = Arc::clone(&state.node);
        assert!(!state.reduce(&NodeAction::add(["e4", "e5"])));
        assert!(!state.reduce(&NodeAction::add(Vec::<Move>::new())));
        assert!(Arc::ptr_eq(&state.node, &before));
        assert!(!state.can_undo());
    }

    #[test]
    fn add_inherits_parent_priority() {
        let mut state = state(json!({"e4": {"e5": {"priority": 1}, "c5": {}}}));
        state.reduce(&NodeAction::add(["e4", "e5", "Nf3", "Nc6"]));
        assert_eq!(
            *state.node,
            build_node(&json!({
                "e4": {"e5": {"priority": 1, "Nf3": {"priority": 1, "Nc6": {"priority": 1}}}, "c5": {}},
            }))
        );
    }

    #[test]
    fn delete_collapses_branch() {
        let mut state = state(json!({"e4": {"e5": {"Nf3": {}, "Nc3": {}}}}));
        assert!(state.reduce(&NodeAction::delete(["e4", "e5", "Nf3"])));
        assert_eq!(*state.node, build_node(&json!({"e4": {"e5": {"Nc3": {}}}})));
    }

    #[test]
    fn delete_missing_node_is_noop() {
        let mut state = state(json!({"e4": {"e5": {}}}));
        assert!(!state.reduce(&NodeAction::delete(["e4", "c5"])));
        assert!(!state.reduce(&NodeAction::delete(["d4", "d5"])));
        assert!(!state.can_undo());
    }

    #[test]
    fn delete_root_clears_children() {
        let mut state = state(json!({"comment": "start", "e4": {}, "d4": {}}));
        assert!(state.reduce(&NodeAction::delete(Vec::<Move>::new())));
        assert_eq!(*state.node, build_node(&json!({"comment": "start"})));
        assert!(!state.reduce(&NodeAction::delete(Vec::<Move>::new())));
        assert_eq!(state.undo_stack().len(), 1);
    }

    #[test]
    fn delete_floods_remaining_priority_upward() {
        let mut state = state(json!({
            "e4": {"e5": {"Nf3": {}, "Nc3": {"priority": -1, "Nc6": {"priority": -1}}}},
        }));
        assert!(state.reduce(&NodeAction::delete(["e4", "e5", "Nf3"])));
        assert_eq!(
            *state.node,
            build_node(&json!({
                "priority": -1,
                "e4": {"priority": -1, "e5": {"priority": -1, "Nc3": {"priority": -1, "Nc6": {"priority": -1}}}},
            }))
        );
        assert!(check_priority_invariant(&state.node));
    }

    #[test]
    fn delete_flood_stops_at_branch() {
        let mut state = state(json!({
            "e4": {"e5": {"Nf3": {}, "Nc3": {"priority": 1}}},
            "d4": {},
        }));
        state.reduce(&NodeAction::delete(["e4", "e5", "Nf3"]));
        assert_eq!(
            *state.node,
            build_node(&json!({
                "e4": {"priority": 1, "e5": {"priority": 1, "Nc3": {"priority": 1}}},
                "d4": {},
            }))
        );
    }

    #[test]
    fn set_comment() {
        let mut state = state(json!({"e4": {"e5": {}}}));
        assert!(state.reduce(&NodeAction::set_comment(["e4"], "best by test")));
        assert_eq!(state.node.children["e4"].comment, "best by test");
        assert!(!state.reduce(&NodeAction::set_comment(["e4"], "best by test")));
        assert!(!state.reduce(&NodeAction::set_comment(["d4"], "nope")));
        assert_eq!(state.undo_stack().len(), 1);
    }

    #[test]
    fn set_annotations_and_nags() {
        let mut state = state(json!({"e4": {}}));
        let annotations = Annotations {
            squares: vec!["Ge4".to_string()],
            arrows: vec!["Gd1h5".to_string()],
        };
        let set_annotations = NodeAction::SetAnnotations {
            moves: vec!["e4".to_string()],
            annotations: annotations.clone(),
        };
        assert!(state.reduce(&set_annotations));
        assert!(!state.reduce(&set_annotations));
        assert_eq!(state.node.children["e4"].annotations, annotations);

        let set_nags = NodeAction::SetNags {
            moves: vec!["e4".to_string()],
            nags: vec![Nag::GOOD_MOVE],
        };
        assert!(state.reduce(&set_nags));
        assert!(!state.reduce(&set_nags));
        assert_eq!(state.node.children["e4"].nags, vec![Nag::GOOD_MOVE]);
    }

    #[test]
    fn set_priority_floods_both_ways() {
        let mut state = state(json!({
            "e4": {"e5": {"Nf3": {"Nc6": {}, "Nf6": {}}}},
            "d4": {},
        }));
        assert!(state.reduce(&NodeAction::set_priority(["e4", "e5", "Nf3"], Priority::TrainFirst)));
        assert_eq!(
            *state.node,
            build_node(&json!({
                "e4": {"priority": 1, "e5": {"priority": 1, "Nf3": {
                    "priority": 1, "Nc6": {"priority": 1}, "Nf6": {"priority": 1},
                }}},
                "d4": {},
            }))
        );
        assert!(!state.reduce(&NodeAction::set_priority(["e4", "e5", "Nf3"], Priority::TrainFirst)));
        assert!(!state.reduce(&NodeAction::set_priority(["c4"], Priority::TrainFirst)));
    }

    #[test]
    fn undo_redo() {
        let mut state = NodeState::new(Node::new());
        let empty = Arc::clone(&state.node);
        state.reduce(&NodeAction::add(["e4"]));
        let after_e4 = Arc::clone(&state.node);
        state.reduce(&NodeAction::add(["d4"]));
        let after_d4 = Arc::clone(&state.node);

        assert!(state.reduce(&NodeAction::Undo));
        assert!(Arc::ptr_eq(&state.node, &after_e4));
        assert!(state.can_undo() && state.can_redo());
        assert!(state.reduce(&NodeAction::Undo));
        assert!(Arc::ptr_eq(&state.node, &empty));
        assert!(!state.can_undo() && state.can_redo());
        assert!(!state.reduce(&NodeAction::Undo));

        assert!(state.reduce(&NodeAction::Redo));
        assert!(state.reduce(&NodeAction::Redo));
        assert!(Arc::ptr_eq(&state.node, &after_d4));
        assert!(state.can_undo() && !state.can_redo());
        assert!(!state.reduce(&NodeAction::Redo));
    }

    #[test]
    fn flags_follow_stacks() {
        let mut state = NodeState::new(Node::new());
        state.reduce(&NodeAction::add(["e4"]));
        assert_eq!((state.can_undo(), state.can_redo()), (true, false));
        state.undo();
        assert_eq!((state.can_undo(), state.can_redo()), (false, true));
        state.redo();
        state.reduce(&NodeAction::add(["d4"]));
        state.undo();
        assert_eq!((state.can_undo(), state.can_redo()), (true, true));
        assert_eq!(state.undo_stack().len(), 1);
        assert_eq!(state.redo_stack().len(), 1);
        state.reset_history();
        assert_eq!((state.can_undo(), state.can_redo()), (false, false));
    }

    #[test]
    fn edit_clears_redo() {
        let mut state = NodeState::new(Node::new());
        state.reduce(&NodeAction::add(["e4"]));
        state.reduce(&NodeAction::Undo);
        assert!(state.can_redo());
        state.reduce(&NodeAction::add(["d4"]));
        assert!(!state.can_redo());
        assert!(state.redo_stack().is_empty());
    }

    #[test]
    fn reset_history_keeps_tree() {
        let mut state = NodeState::new(Node::new());
        state.reduce(&NodeAction::add(["e4"]));
        state.reduce(&NodeAction::add(["d4"]));
        state.reduce(&NodeAction::Undo);
        state.reset_history();
        assert!(!state.can_undo() && !state.can_redo());
        assert_eq!(*state.node, build_node(&json!({"e4": {}})));
    }

    #[test]
    fn action_json_shape() {
        let action = NodeAction::set_comment(["e4"], "hi");
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "set-comment", "moves": ["e4"], "comment": "hi"})
        );
        assert_eq!(serde_json::to_value(&NodeAction::Undo).unwrap(), json!({"type": "undo"}));
        assert_eq!(action.name(), "set-comment");
    }
}
