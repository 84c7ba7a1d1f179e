//! Editing session anchored to a board.
//!
//! [`EditorState`] wraps a [`NodeState`] together with the moves currently
//! on the editing board. Commands act on the node at those moves.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nag::Nag;
use crate::node::{Annotations, Move, Node, Priority};
use crate::node_reducer::{NodeAction, NodeState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EditorAction {
    /// Replace the board moves. Never touches history.
    SetMoves { moves: Vec<Move> },
    /// Add the board line to the tree.
    Add,
    /// Delete the board node and step the board back one move.
    DeleteNode,
    /// Delete the whole branch the board node sits on.
    DeleteBranch,
    SetComment { comment: String },
    SetAnnotations { annotations: Annotations },
    SetNags { nags: Vec<Nag> },
    SetPriority { priority: Priority },
    Undo,
    Redo,
    /// Drop all undo/redo history.
    ResetUndo,
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub node_state: NodeState,
    /// Moves currently on the board.
    pub moves: Vec<Move>,
}

impl EditorState {
    pub fn new(node: impl Into<Arc<Node>>) -> Self {
        Self {
            node_state: NodeState::new(node),
            moves: Vec::new(),
        }
    }

    pub fn node(&self) -> &Node {
        &self.node_state.node
    }

    /// Apply `action`, returning `true` if the tree or the board changed.
    pub fn reduce(&mut self, action: &EditorAction) -> bool {
        let moves = self.moves.clone();
        match action {
            EditorAction::SetMoves { moves } => {
                let changed = self.moves != *moves;
                self.moves = moves.clone();
                changed
            }
            EditorAction::Add => self.node_state.reduce(&NodeAction::Add { moves }),
            EditorAction::DeleteNode => {
                if self.node().get_descendant(&moves).is_none() {
                    return false;
                }
                let changed = self.node_state.reduce(&NodeAction::Delete { moves });
                self.moves.pop();
                changed
            }
            EditorAction::DeleteBranch => {
                let Some(start) = branch_start(self.node(), &moves) else {
                    return false;
                };
                debug!(depth = moves.len(), start, "deleting branch");
                let changed = self.node_state.reduce(&NodeAction::Delete {
                    moves: moves[..start].to_vec(),
                });
                self.moves.truncate(start.saturating_sub(1));
                changed
            }
            EditorAction::SetComment { comment } => self.node_state.reduce(&NodeAction::SetComment {
                moves,
                comment: comment.clone(),
            }),
            EditorAction::SetAnnotations { annotations } => {
                self.node_state.reduce(&NodeAction::SetAnnotations {
                    moves,
                    annotations: annotations.clone(),
                })
            }
            EditorAction::SetNags { nags } => self.node_state.reduce(&NodeAction::SetNags {
                moves,
                nags: nags.clone(),
            }),
            EditorAction::SetPriority { priority } => self.node_state.reduce(&NodeAction::SetPriority {
                moves,
                priority: *priority,
            }),
            EditorAction::Undo => self.node_state.undo(),
            EditorAction::Redo => self.node_state.redo(),
            EditorAction::ResetUndo => {
                let had_history = self.node_state.can_undo() || self.node_state.can_redo();
                self.node_state.reset_history();
                had_history
            }
        }
    }
}

/// Length of the move prefix that leads to the start of the branch
/// containing the node at `moves`.
///
/// The branch starts just below the deepest node on the path that has
/// several children and whose next node has at most one. `None` if `moves`
/// doesn't resolve.
fn branch_start(root: &Node, moves: &[Move]) -> Option<usize> {
    let mut current = root;
    let mut start = 0;
    for (i, mv) in moves.iter().enumerate() {
        let next = current.children.get(mv)?;
        if current.child_count() > 1 && next.child_count() <= 1 {
            start = i + 1;
        }
        current = next;
    }
    Some(start)
}
