//! Priority propagation.
//!
//! A node with exactly one child must carry that child's priority. Edits
//! that create or break single-child chains restore this with the cursor
//! helpers below; [`priority_violations`] checks it.

use crate::cursor::NodeCursor;
use crate::node::{Move, Node, Priority};

/// Set `priority` on the cursor's node and its whole subtree.
///
/// Children whose subtree already carries `priority` everywhere are left
/// shared. Returns `true` if any node changed.
pub(crate) fn set_subtree_priority(cursor: &mut NodeCursor, priority: Priority) -> bool {
    let mut changed = false;
    if cursor.current().priority != priority {
        cursor.current_mut().priority = priority;
        changed = true;
    }
    for (mv, mut child) in cursor.child_cursors() {
        if set_subtree_priority(&mut child, priority) {
            cursor.replace_child(mv, child.into_root());
            changed = true;
        }
    }
    changed
}

/// Copy the cursor node's priority up through single-child ancestors.
///
/// Stops at the first ancestor with several children, or at one that
/// already matches. The cursor ends on the last node it visited. Returns
/// `true` if any ancestor changed.
pub(crate) fn update_ancestor_priority(cursor: &mut NodeCursor) -> bool {
    let priority = cursor.current().priority;
    let mut changed = false;
    while let Some(parent) = cursor.parent_node() {
        if parent.child_count() != 1 || parent.priority == priority {
            break;
        }
        cursor.move_to_parent();
        cursor.current_mut().priority = priority;
        changed = true;
    }
    changed
}

/// Moves to every node that has a single child with a different priority.
pub fn priority_violations(node: &Node) -> Vec<Vec<Move>> {
    let mut violations = Vec::new();
    let mut path = Vec::new();
    collect_violations(node, &mut path, &mut violations);
    violations
}

fn collect_violations(node: &Node, path: &mut Vec<Move>, violations: &mut Vec<Vec<Move>>) {
    if let Some(child) = node.get_single_child() {
        if child.priority != node.priority {
            violations.push(path.clone());
        }
    }
    for (mv, child) in &node.children {
        path.push(mv.clone());
        collect_violations(child, path, violations);
        path.pop();
    }
}

/// Whether every single-child node in the tree matches its child's priority.
pub fn check_priority_invariant(node: &Node) -> bool {
    priority_violations(node).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::build_node;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn set_subtree_priority_floods_down() {
        let source = build_node(&json!({"e4": {"e5": {"Nf3": {}}, "c5": {}}, "d4": {}}));
        let mut cursor = NodeCursor::init(&source);
        cursor.move_child("e4");
        assert!(set_subtree_priority(&mut cursor, Priority::TrainFirst));
        let root = cursor.into_root();
        assert_eq!(
            root,
            build_node(&json!({
                "e4": {"priority": 1, "e5": {"priority": 1, "Nf3": {"priority": 1}}, "c5": {"priority": 1}},
                "d4": {},
            }))
        );
    }

    #[test]
    fn set_subtree_priority_keeps_matching_subtrees_shared() {
        let source = build_node(&json!({"e4": {"e5": {"priority": 1}, "c5": {}}}));
        let mut cursor = NodeCursor::init(&source);
        cursor.move_child("e4");
        assert!(set_subtree_priority(&mut cursor, Priority::TrainFirst));
        let root = cursor.into_root();
        let e4 = &root.children["e4"];
        assert!(Arc::ptr_eq(&e4.children["e5"], &source.children["e4"].children["e5"]));
        assert_eq!(e4.children["c5"].priority, Priority::TrainFirst);
    }

    #[test]
    fn set_subtree_priority_unchanged() {
        let source = build_node(&json!({"priority": -1, "e4": {"priority": -1}}));
        let mut cursor = NodeCursor::init(&source);
        assert!(!set_subtree_priority(&mut cursor, Priority::TrainLast));
    }

    #[test]
    fn update_ancestor_priority_stops_at_branch() {
        let source = build_node(&json!({
            "e4": {"e5": {"Nf3": {"Nc6": {}}}, "c5": {}},
        }));
        let mut cursor = NodeCursor::init(&source);
        cursor.bulk_move(&["e4", "e5", "Nf3", "Nc6"]);
        cursor.current_mut().priority = Priority::TrainLast;
        assert!(update_ancestor_priority(&mut cursor));
        assert_eq!(cursor.moves(), vec!["e4", "e5"]);
        let root = cursor.into_root();
        assert_eq!(
            root,
            build_node(&json!({
                "e4": {"e5": {"priority": -1, "Nf3": {"priority": -1, "Nc6": {"priority": -1}}}, "c5": {}},
            }))
        );
    }

    #[test]
    fn update_ancestor_priority_at_root() {
        let source = build_node(&json!({"e4": {}}));
        let mut cursor = NodeCursor::init(&source);
        assert!(!update_ancestor_priority(&mut cursor));
    }

    #[test]
    fn violations_are_reported_by_path() {
        let node = build_node(&json!({
            "e4": {"e5": {"priority": 1}},
            "d4": {"d5": {}, "Nf6": {"priority": -1}},
            "c4": {"priority": 1, "c5": {"priority": 1}},
        }));
        assert_eq!(priority_violations(&node), vec![vec!["e4".to_string()]]);
        assert!(!check_priority_invariant(&node));
        assert!(check_priority_invariant(&build_node(&json!({"e4": {"e5": {}}}))));
    }
}
