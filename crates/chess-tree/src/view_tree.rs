//! Budgeted views of a move tree.
//!
//! [`view_node_tree`] picks the most detailed subtree that fits within a
//! branch budget and a depth budget. It first tries the whole tree, then
//! zooms in along the focus moves, then cuts lines off at decreasing depths.
//! A cut node keeps its `line_count` and loses its children.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nag::Nag;
use crate::node::{Annotations, Move, Node, Priority};

pub const DEFAULT_MAX_BRANCHES: usize = 20;
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Node of a view tree.
///
/// - `children`: `None` when the node was cut off by the depth budget
/// - `max_depth`: longest chain of moves below the node, in this view
/// - `line_count`: lines below the node in the source tree
/// - `branch_count`: lines below the node in this view; smaller than
///   `line_count` once descendants are cut off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    #[serde(rename = "move")]
    pub mv: Move,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<IndexMap<Move, ViewNode>>,
    pub comment: String,
    pub annotations: Annotations,
    pub nags: Vec<Nag>,
    pub priority: Priority,
    pub max_depth: usize,
    pub line_count: usize,
    pub branch_count: usize,
}

/// Input for [`view_node_tree`].
///
/// `moves` leads from `root_node` to the position the view should focus on
/// when the whole tree does not fit.
#[derive(Debug, Clone, Copy)]
pub struct ViewNodeTreeParams<'a> {
    pub root_node: &'a Node,
    pub moves: &'a [Move],
    pub max_branches: usize,
    pub max_depth: usize,
}

impl<'a> ViewNodeTreeParams<'a> {
    pub fn new(root_node: &'a Node, moves: &'a [Move]) -> Self {
        Self {
            root_node,
            moves,
            max_branches: DEFAULT_MAX_BRANCHES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_limits(self, max_branches: usize, max_depth: usize) -> Self {
        Self {
            max_branches,
            max_depth,
            ..self
        }
    }
}

/// View rooted at the node reached by `leading_moves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNodeTreeResult {
    pub leading_moves: Vec<Move>,
    pub child_nodes: Vec<ViewNode>,
    pub comment: String,
    pub annotations: Annotations,
    pub nags: Vec<Nag>,
}

/// Find the first view that fits the budget.
///
/// Never fails: if no depth fits, every child of the focus node becomes a
/// stub, even if that still exceeds `max_branches`.
pub fn view_node_tree(params: &ViewNodeTreeParams<'_>) -> ViewNodeTreeResult {
    let root = params.root_node;
    let mut result = ViewNodeTreeResult {
        leading_moves: Vec::new(),
        child_nodes: root
            .children
            .iter()
            .map(|(mv, child)| make_view_node(mv, child))
            .collect(),
        comment: root.comment.clone(),
        annotations: root.annotations.clone(),
        nags: root.nags.clone(),
    };
    if fits_limits(&result, params) {
        debug!(stage = "full", "view fits");
        return result;
    }

    for mv in params.moves {
        let Some(index) = result.child_nodes.iter().position(|child| child.mv == *mv) else {
            debug!(mv = mv.as_str(), leading = result.leading_moves.len(), "focus move not in tree");
            break;
        };
        let child = result.child_nodes.swap_remove(index);
        result.leading_moves.push(child.mv);
        result.child_nodes = child
            .children
            .map(|children| children.into_values().collect())
            .unwrap_or_default();
        result.comment = child.comment;
        result.annotations = child.annotations;
        result.nags = child.nags;
        if fits_limits(&result, params) {
            debug!(stage = "zoom", leading = result.leading_moves.len(), "view fits");
            return result;
        }
    }

    let expanded = std::mem::take(&mut result.child_nodes);
    for depth in (1..params.max_depth).rev() {
        result.child_nodes = truncate_all(&expanded, depth);
        if fits_limits(&result, params) {
            debug!(stage = "truncate", depth, "view fits");
            return result;
        }
    }
    debug!(stage = "fallback", "no depth fits, truncating at depth 0");
    result.child_nodes = truncate_all(&expanded, 0);
    result
}

fn make_view_node(mv: &str, node: &Node) -> ViewNode {
    let children: IndexMap<Move, ViewNode> = node
        .children
        .iter()
        .map(|(child_move, child)| (child_move.clone(), make_view_node(child_move, child)))
        .collect();
    let line_count = if children.is_empty() {
        1
    } else {
        children.values().map(|child| child.line_count).sum()
    };
    let max_depth = children
        .values()
        .map(|child| child.max_depth + 1)
        .max()
        .unwrap_or(0);
    ViewNode {
        mv: mv.to_string(),
        children: Some(children),
        comment: node.comment.clone(),
        annotations: node.annotations.clone(),
        nags: node.nags.clone(),
        priority: node.priority,
        max_depth,
        line_count,
        branch_count: line_count,
    }
}

fn fits_limits(result: &ViewNodeTreeResult, params: &ViewNodeTreeParams<'_>) -> bool {
    let branch_count: usize = result.child_nodes.iter().map(|node| node.branch_count).sum();
    let max_child_depth = result.child_nodes.iter().map(|node| node.max_depth).max();
    branch_count <= params.max_branches
        && max_child_depth.map_or(true, |depth| depth + 1 <= params.max_depth)
}

fn truncate_all(nodes: &[ViewNode], depth_left: usize) -> Vec<ViewNode> {
    nodes
        .iter()
        .map(|node| truncate_children(node, depth_left))
        .collect()
}

fn truncate_children(node: &ViewNode, depth_left: usize) -> ViewNode {
    let (children, branch_count, max_depth) = if depth_left == 0 {
        (None, 1, 0)
    } else {
        let children: IndexMap<Move, ViewNode> = node
            .children
            .iter()
            .flatten()
            .map(|(mv, child)| (mv.clone(), truncate_children(child, depth_left - 1)))
            .collect();
        let branch_count = if children.is_empty() {
            1
        } else {
            children.values().map(|child| child.branch_count).sum()
        };
        let max_depth = children
            .values()
            .map(|child| child.max_depth + 1)
            .max()
            .unwrap_or(0);
        (Some(children), branch_count, max_depth)
    };
    ViewNode {
        mv: node.mv.clone(),
        children,
        comment: node.comment.clone(),
        annotations: node.annotations.clone(),
        nags: node.nags.clone(),
        priority: node.priority,
        max_depth,
        line_count: node.line_count,
        branch_count,
    }
}
