//! Copy-on-write cursor over a move tree.
//!
//! A [`NodeCursor`] walks a tree and edits it without touching the source:
//! every node it stands on is a private shallow copy (own child map, shared
//! grandchildren), so a walk from the root to some node copies exactly that
//! path. Siblings that were never visited stay shared with the source tree.
//!
//! Parents are not linked by pointer. The cursor keeps an explicit stack of
//! ancestors; the ancestor at index `i` is the node at depth `i`. Moving up
//! pops the stack and writes the edited child back into its parent, and
//! [`NodeCursor::into_root`] folds the whole stack into the edited root.

use std::mem;
use std::sync::Arc;

use crate::node::{Move, Node};

#[derive(Debug, Clone)]
struct Ancestor {
    node: Node,
    /// Move from this ancestor to the next node down the stack.
    mv: Move,
}

/// Supports moving through a [`Node`] and performing COW updates.
#[derive(Debug, Clone)]
pub struct NodeCursor {
    current: Node,
    ancestors: Vec<Ancestor>,
}

impl NodeCursor {
    /// Start a cursor at a private copy of `source`.
    ///
    /// `source` is never modified; call [`NodeCursor::into_root`] to get the
    /// edited tree.
    pub fn init(source: &Node) -> Self {
        Self {
            current: source.clone(),
            ancestors: Vec::new(),
        }
    }

    pub fn current(&self) -> &Node {
        &self.current
    }

    /// Mutable access to the current node.
    ///
    /// Safe to mutate in place: the node is the cursor's own copy.
    pub fn current_mut(&mut self) -> &mut Node {
        &mut self.current
    }

    pub fn parent_node(&self) -> Option<&Node> {
        self.ancestors.last().map(|ancestor| &ancestor.node)
    }

    /// Number of moves between the root and the current node.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Moves from the root to the current node.
    pub fn moves(&self) -> Vec<Move> {
        self.ancestors.iter().map(|ancestor| ancestor.mv.clone()).collect()
    }

    /// Move to a child node.
    ///
    /// Returns `false`, leaving the cursor where it was, if the move doesn't
    /// exist in the current node.
    pub fn move_child(&mut self, mv: &str) -> bool {
        let Some(child) = self.current.children.get(mv) else {
            return false;
        };
        let copy = Node::clone(child);
        self.descend(mv.to_string(), copy);
        true
    }

    /// Move to a child node, creating it if the move doesn't exist yet.
    ///
    /// A created child inherits the current node's priority. Returns `true`
    /// if a move was inserted.
    pub fn move_or_insert(&mut self, mv: &str) -> bool {
        if self.move_child(mv) {
            return false;
        }
        let child = Node::with_priority(self.current.priority);
        // Register the move right away so the parent's child count is
        // accurate while the cursor is below it.
        self.current
            .children
            .insert(mv.to_string(), Arc::new(child.clone()));
        self.descend(mv.to_string(), child);
        true
    }

    /// Make every move in `moves`.
    ///
    /// On failure returns `false` with the cursor on the last node that
    /// existed.
    pub fn bulk_move<S: AsRef<str>>(&mut self, moves: &[S]) -> bool {
        moves.iter().all(|mv| self.move_child(mv.as_ref()))
    }

    /// Move to the parent node, writing the current node back into it.
    ///
    /// Returns `false` at the root.
    pub fn move_to_parent(&mut self) -> bool {
        let Some(Ancestor { node, mv }) = self.ancestors.pop() else {
            return false;
        };
        let child = mem::replace(&mut self.current, node);
        self.current.children.insert(mv, Arc::new(child));
        true
    }

    /// Detach a child of the current node.
    pub fn remove_child(&mut self, mv: &str) -> Option<Arc<Node>> {
        self.current.children.shift_remove(mv)
    }

    /// One independent cursor per child of the current node.
    ///
    /// Each cursor is rooted at its child. Edited children are written back
    /// with [`NodeCursor::replace_child`].
    pub fn child_cursors(&self) -> Vec<(Move, NodeCursor)> {
        self.current
            .children
            .iter()
            .map(|(mv, child)| (mv.clone(), NodeCursor::init(child)))
            .collect()
    }

    /// Replace (or insert) the child at `mv`.
    pub fn replace_child(&mut self, mv: Move, child: Node) {
        self.current.children.insert(mv, Arc::new(child));
    }

    /// Finish editing and return the new root.
    pub fn into_root(mut self) -> Node {
        while self.move_to_parent() {}
        self.current
    }

    fn descend(&mut self, mv: Move, child: Node) {
        let parent = mem::replace(&mut self.current, child);
        self.ancestors.push(Ancestor { node: parent, mv });
    }
}
