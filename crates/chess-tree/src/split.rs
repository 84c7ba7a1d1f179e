//! Flat row encoding of a move tree.
//!
//! [`split_node`] turns a tree into one [`SplitNode`] row per node, with
//! children referenced by id instead of nested inline, so each node can be
//! stored in its own row. Every row carries the normalized FEN of its
//! position (see [`normalize_fen`]), so rows can be indexed by position and
//! transpositions share a key. [`combine_nodes`] rebuilds the tree.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::BookError;
use crate::nag::Nag;
use crate::node::{Annotations, Move, Node, Position, Priority};
use crate::position::{normalize_fen, MoveOracle};

/// One node of a split tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitNode {
    pub node_id: String,
    pub position: Position,
    /// Maps moves to child node ids.
    pub children: IndexMap<Move, String>,
    pub comment: String,
    pub annotations: Annotations,
    pub nags: Vec<Nag>,
    pub priority: Priority,
}

/// Convert `node` into rows, parents before children.
///
/// The root row gets `root_node_id`; every other row gets a fresh UUID.
/// Positions are computed by playing each move from `initial_position`
/// through `oracle`.
pub fn split_node<O: MoveOracle + ?Sized>(
    oracle: &mut O,
    initial_position: &str,
    node: &Node,
    root_node_id: &str,
) -> Result<Vec<SplitNode>, BookError> {
    let mut rows = Vec::new();
    visit(oracle, initial_position, node, root_node_id.to_string(), &mut rows)?;
    debug!(rows = rows.len(), root = root_node_id, "split node");
    Ok(rows)
}

fn visit<O: MoveOracle + ?Sized>(
    oracle: &mut O,
    position: &str,
    node: &Node,
    node_id: String,
    rows: &mut Vec<SplitNode>,
) -> Result<(), BookError> {
    let index = rows.len();
    rows.push(SplitNode {
        node_id,
        position: normalize_fen(position)?,
        children: IndexMap::with_capacity(node.child_count()),
        comment: node.comment.clone(),
        annotations: node.annotations.clone(),
        nags: node.nags.clone(),
        priority: node.priority,
    });
    for (mv, child) in &node.children {
        let child_position =
            oracle
                .make_move(position, mv)
                .ok_or_else(|| BookError::IllegalMove {
                    position: position.to_string(),
                    mv: mv.clone(),
                })?;
        let child_id = Uuid::new_v4().to_string();
        visit(oracle, &child_position, child, child_id.clone(), rows)?;
        rows[index].children.insert(mv.clone(), child_id);
    }
    Ok(())
}

/// Rebuild the tree rooted at `root_node_id` from `split_nodes`.
///
/// Rows not reachable from the root are ignored. A referenced id with no
/// row is a [`BookError::MissingNode`]; a row that is its own ancestor is a
/// [`BookError::NodeCycle`].
pub fn combine_nodes(split_nodes: &[SplitNode], root_node_id: &str) -> Result<Node, BookError> {
    let rows: HashMap<&str, &SplitNode> = split_nodes
        .iter()
        .map(|row| (row.node_id.as_str(), row))
        .collect();
    let node = make_node(&rows, root_node_id, 0)?;
    debug!(rows = split_nodes.len(), root = root_node_id, "combined nodes");
    Ok(node)
}

fn make_node(rows: &HashMap<&str, &SplitNode>, node_id: &str, depth: usize) -> Result<Node, BookError> {
    // A path longer than the row count must repeat a row.
    if depth > rows.len() {
        return Err(BookError::NodeCycle(node_id.to_string()));
    }
    let row = rows
        .get(node_id)
        .ok_or_else(|| BookError::MissingNode(node_id.to_string()))?;
    let mut children = IndexMap::with_capacity(row.children.len());
    for (mv, child_id) in &row.children {
        let child = make_node(rows, child_id, depth + 1)?;
        children.insert(mv.clone(), Arc::new(child));
    }
    Ok(Node {
        children,
        comment: row.comment.clone(),
        annotations: row.annotations.clone(),
        nags: row.nags.clone(),
        priority: row.priority,
    })
}
