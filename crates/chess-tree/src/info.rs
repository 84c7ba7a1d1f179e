//! Aggregate counts over a move tree.
//!
//! A line is one path from the queried node down to a leaf. The queried node
//! itself never counts as a line: a root with no moves recorded has zero
//! lines, while every childless node below it ends exactly one line.

use std::ops::AddAssign;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::{Move, Node, Priority};

/// Total number of lines below `node`.
pub fn line_count(node: &Node) -> usize {
    node.children.values().map(|child| subtree_lines(child)).sum()
}

/// Lines through a child: a leaf child ends one line.
fn subtree_lines(node: &Node) -> usize {
    if node.is_leaf() {
        1
    } else {
        line_count(node)
    }
}

/// Line counts split by the priority of the leaf that ends each line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountByPriority {
    pub default: usize,
    pub train_first: usize,
    pub train_last: usize,
}

impl LineCountByPriority {
    pub fn total(&self) -> usize {
        self.default + self.train_first + self.train_last
    }

    fn count(&mut self, priority: Priority) {
        match priority {
            Priority::Default => self.default += 1,
            Priority::TrainFirst => self.train_first += 1,
            Priority::TrainLast => self.train_last += 1,
        }
    }
}

impl AddAssign for LineCountByPriority {
    fn add_assign(&mut self, other: Self) {
        self.default += other.default;
        self.train_first += other.train_first;
        self.train_last += other.train_last;
    }
}

/// Lines below `node`, bucketed by leaf priority.
pub fn line_count_by_priority(node: &Node) -> LineCountByPriority {
    let mut counts = LineCountByPriority::default();
    for child in node.children.values() {
        count_leaves(child, &mut counts);
    }
    counts
}

fn count_leaves(node: &Node, counts: &mut LineCountByPriority) {
    if node.is_leaf() {
        counts.count(node.priority);
        return;
    }
    for child in node.children.values() {
        count_leaves(child, counts);
    }
}

/// Result of a [`calc_node_info`] call.
///
/// - `line_count`: number of distinct lines below the node
/// - `child_count`: number of moves / child nodes
/// - `child_line_count`: maps moves to the total lines through each child
/// - `max_depth`: longest chain of moves below the node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub line_count: usize,
    pub child_count: usize,
    pub child_line_count: IndexMap<Move, usize>,
    pub max_depth: usize,
}

pub fn calc_node_info(node: &Node) -> NodeInfo {
    let child_line_count: IndexMap<Move, usize> = node
        .children
        .iter()
        .map(|(mv, child)| (mv.clone(), subtree_lines(child)))
        .collect();
    NodeInfo {
        line_count: child_line_count.values().sum(),
        child_count: node.child_count(),
        child_line_count,
        max_depth: max_depth(node),
    }
}

/// Longest chain of moves below `node`; 0 for a leaf.
pub fn max_depth(node: &Node) -> usize {
    node.children
        .values()
        .map(|child| max_depth(child) + 1)
        .max()
        .unwrap_or(0)
}
