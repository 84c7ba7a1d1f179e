//! Path-addressed functional updates.
//!
//! These never modify their input: each returns a new root that shares every
//! subtree off the updated path with the old root. An unresolved path returns
//! the input root itself (the same `Arc`), so callers can detect a no-op with
//! [`Arc::ptr_eq`].

use std::sync::Arc;

use crate::node::Node;

/// Replace the node at `moves` with `operation(node)`.
///
/// If `moves` doesn't resolve, `operation` is not called and `node` is
/// returned unchanged.
pub fn update_child<S, F>(node: &Arc<Node>, moves: &[S], operation: F) -> Arc<Node>
where
    S: AsRef<str>,
    F: FnOnce(&Node) -> Node,
{
    try_update_child(node, moves, operation).unwrap_or_else(|| Arc::clone(node))
}

fn try_update_child<S, F>(node: &Arc<Node>, moves: &[S], operation: F) -> Option<Arc<Node>>
where
    S: AsRef<str>,
    F: FnOnce(&Node) -> Node,
{
    let Some((mv, rest)) = moves.split_first() else {
        return Some(Arc::new(operation(node)));
    };
    let child = node.children.get(mv.as_ref())?;
    let updated = try_update_child(child, rest, operation)?;
    let mut copy = Node::clone(node);
    copy.children.insert(mv.as_ref().to_string(), updated);
    Some(Arc::new(copy))
}

/// Apply `operation` to the node at `moves` and to every node below it.
pub fn update_all_descendents<S, F>(node: &Arc<Node>, moves: &[S], operation: F) -> Arc<Node>
where
    S: AsRef<str>,
    F: Fn(&Node) -> Node,
{
    update_child(node, moves, |target| update_subtree(target, &operation))
}

fn update_subtree<F: Fn(&Node) -> Node>(node: &Node, operation: &F) -> Node {
    let mut updated = operation(node);
    updated.children = node
        .children
        .iter()
        .map(|(mv, child)| (mv.clone(), Arc::new(update_subtree(child, operation))))
        .collect();
    updated
}

/// Find where the single-child run ending at `moves` starts.
///
/// Returns the shortest prefix of `moves` such that every node from the end
/// of that prefix down to the parent of the target has exactly one child.
/// The node at the returned prefix is either the root or a child of a node
/// with several children. If `moves` doesn't resolve, it is returned whole.
pub fn find_start_of_branch<'a, S: AsRef<str>>(node: &Node, moves: &'a [S]) -> &'a [S] {
    let Some(path) = node.get_node_path(moves) else {
        return moves;
    };
    let mut start = moves.len();
    while start > 0 && path[start - 1].child_count() == 1 {
        start -= 1;
    }
    &moves[..start]
}

/// Apply `operation` to every node from [`find_start_of_branch`] down to the
/// end of `moves`, inclusive.
pub fn update_to_start_of_branch<S, F>(node: &Arc<Node>, moves: &[S], operation: F) -> Arc<Node>
where
    S: AsRef<str>,
    F: Fn(&Node) -> Node,
{
    let start = find_start_of_branch(node, moves).len();
    (start..=moves.len()).fold(Arc::clone(node), |root, end| {
        update_child(&root, &moves[..end], &operation)
    })
}
