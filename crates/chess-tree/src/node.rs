//! Move tree nodes and the read-only queries over them.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::nag::Nag;

/// Move string (SAN).
pub type Move = String;

/// Position string (FEN).
pub type Position = String;

/// Child map of a node, in insertion order.
///
/// Children are shared: cloning a [`Node`] copies this map of pointers, not
/// the subtrees behind them.
pub type Children = IndexMap<Move, Arc<Node>>;

/// Training-order hint attached to every node.
///
/// Serialized as the integers `0`, `1` and `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Priority {
    #[default]
    Default,
    TrainFirst,
    TrainLast,
}

impl From<Priority> for i8 {
    fn from(priority: Priority) -> i8 {
        match priority {
            Priority::Default => 0,
            Priority::TrainFirst => 1,
            Priority::TrainLast => -1,
        }
    }
}

impl TryFrom<i8> for Priority {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::Default),
            1 => Ok(Priority::TrainFirst),
            -1 => Ok(Priority::TrainLast),
            other => Err(format!("invalid priority: {other}")),
        }
    }
}

/// Board markup for a node.
///
/// - `squares`: `%csl` entries that highlight squares
/// - `arrows`: `%cal` entries that draw arrows
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotations {
    pub squares: Vec<String>,
    pub arrows: Vec<String>,
}

/// Single position in a move tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Maps moves to the positions they lead to.
    pub children: Children,
    pub comment: String,
    pub annotations: Annotations,
    pub nags: Vec<Nag>,
    pub priority: Priority,
}

/// A move alongside the node that results from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveNode {
    pub mv: Move,
    pub node: Arc<Node>,
}

impl Node {
    /// Empty node: no moves, no comment, no markup, default priority.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty node carrying `priority`, as created under a parent with that priority.
    pub fn with_priority(priority: Priority) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }

    /// Number of moves / child nodes.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// If there is exactly one child node, return it.
    pub fn get_single_child(&self) -> Option<&Arc<Node>> {
        if self.children.len() == 1 {
            self.children.values().next()
        } else {
            None
        }
    }

    /// Follow `moves` one label at a time.
    ///
    /// Returns `None` as soon as a label is missing.
    pub fn get_descendant<S: AsRef<str>>(&self, moves: &[S]) -> Option<&Node> {
        let mut node = self;
        for mv in moves {
            node = node.children.get(mv.as_ref())?;
        }
        Some(node)
    }

    /// Like [`Node::get_descendant`], but returns every node along the way,
    /// starting with `self`.
    ///
    /// All-or-nothing: a partial path is never returned.
    pub fn get_node_path<S: AsRef<str>>(&self, moves: &[S]) -> Option<Vec<&Node>> {
        let mut path = Vec::with_capacity(moves.len() + 1);
        let mut node = self;
        path.push(node);
        for mv in moves {
            node = node.children.get(mv.as_ref())?;
            path.push(node);
        }
        Some(path)
    }

    /// Children as move-labelled values, in insertion order.
    pub fn move_nodes(&self) -> Vec<MoveNode> {
        self.children
            .iter()
            .map(|(mv, node)| MoveNode {
                mv: mv.clone(),
                node: Arc::clone(node),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::build_node;
    use serde_json::json;

    #[test]
    fn new_node_is_empty() {
        let node = Node::new();
        assert_eq!(node.child_count(), 0);
        assert_eq!(node.comment, "");
        assert_eq!(node.annotations, Annotations::default());
        assert!(node.nags.is_empty());
        assert_eq!(node.priority, Priority::Default);
    }

    #[test]
    fn get_descendant_follows_moves() {
        let node = build_node(&json!({"e4": {"e5": {"comment": "open game"}}, "d4": {}}));
        assert_eq!(node.get_descendant(&["e4", "e5"]).map(|n| n.comment.as_str()), Some("open game"));
        assert!(std::ptr::eq(node.get_descendant::<&str>(&[]).unwrap(), &node));
        assert!(node.get_descendant(&["e4", "c5"]).is_none());
        assert!(node.get_descendant(&["c4"]).is_none());
    }

    #[test]
    fn get_node_path_is_all_or_nothing() {
        let node = build_node(&json!({"e4": {"e5": {"Nf3": {}}}}));
        let path = node.get_node_path(&["e4", "e5", "Nf3"]).unwrap();
        assert_eq!(path.len(), 4);
        assert!(std::ptr::eq(path[0], &node));
        assert!(path[3].is_leaf());
        assert!(node.get_node_path(&["e4", "e5", "Nc3"]).is_none());
    }

    #[test]
    fn get_single_child() {
        let node = build_node(&json!({"e4": {"e5": {}, "c5": {}}}));
        let e4 = node.get_single_child().unwrap();
        assert_eq!(e4.child_count(), 2);
        assert!(e4.get_single_child().is_none());
        assert!(Node::new().get_single_child().is_none());
    }

    #[test]
    fn move_nodes_keep_insertion_order() {
        let node = build_node(&json!({"e4": {}, "d4": {}, "c4": {}}));
        let moves: Vec<_> = node.move_nodes().into_iter().map(|m| m.mv).collect();
        assert_eq!(moves, vec!["e4", "d4", "c4"]);
    }

    #[test]
    fn priority_serializes_as_integer() {
        assert_eq!(serde_json::to_value(Priority::TrainLast).unwrap(), json!(-1));
        assert_eq!(serde_json::from_value::<Priority>(json!(1)).unwrap(), Priority::TrainFirst);
        assert!(serde_json::from_value::<Priority>(json!(5)).is_err());
    }

    #[test]
    fn node_json_round_trip() {
        let node = build_node(&json!({
            "comment": "root",
            "e4": {"nags": [1], "squares": ["Ge4"], "priority": 1, "e5": {"priority": 1}},
        }));
        let encoded = serde_json::to_string(&node).unwrap();
        let decoded: Node = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, node);
    }
}
