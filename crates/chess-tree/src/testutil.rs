//! Helpers shared by the unit and integration tests.
//!
//! Compiled for this crate's own tests and behind the `testutil` feature,
//! which the integration tests enable through a dev-dependency.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::nag::Nag;
use crate::node::{Move, Node, Position, Priority};
use crate::position::MoveOracle;

/// Build a tree from a compact JSON description.
///
/// Reserved keys set node fields: `"comment"` (string), `"nags"` (array of
/// integers), `"priority"` (`0`, `1` or `-1`), `"squares"` and `"arrows"`
/// (arrays of strings). Every other key is a move whose value describes the
/// child node, in insertion order.
pub fn build_node(value: &Value) -> Node {
    let mut node = Node::new();
    let Some(object) = value.as_object() else {
        return node;
    };
    for (key, value) in object {
        match key.as_str() {
            "comment" => node.comment = value.as_str().unwrap_or_default().to_string(),
            "nags" => node.nags = integers(value).map(|n| Nag(n as u8)).collect(),
            "priority" => {
                node.priority = value
                    .as_i64()
                    .and_then(|n| i8::try_from(n).ok())
                    .and_then(|n| Priority::try_from(n).ok())
                    .unwrap_or_default()
            }
            "squares" => node.annotations.squares = strings(value),
            "arrows" => node.annotations.arrows = strings(value),
            mv => {
                node.children.insert(mv.to_string(), Arc::new(build_node(value)));
            }
        }
    }
    node
}

fn integers(value: &Value) -> impl Iterator<Item = u64> + '_ {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_u64)
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Owned move list from string literals.
pub fn moves(labels: &[&str]) -> Vec<Move> {
    labels.iter().map(|mv| mv.to_string()).collect()
}

/// Deterministic stand-in for a chess engine.
///
/// Every move is legal except those listed in `illegal`. The resulting
/// position records the set of moves played so far in its placement field,
/// sorted, so move orders that reach the same set of moves with the same side
/// to move give the same position, like a transposition would. Clocks advance
/// the way a real engine advances them, so normalization has work to do.
#[derive(Debug, Clone, Default)]
pub struct FakeOracle {
    pub illegal: HashSet<Move>,
    /// Number of `make_move` calls served.
    pub calls: usize,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_illegal(moves: &[&str]) -> Self {
        Self {
            illegal: moves.iter().map(|mv| mv.to_string()).collect(),
            calls: 0,
        }
    }
}

impl MoveOracle for FakeOracle {
    fn make_move(&mut self, position: &str, mv: &str) -> Option<Position> {
        self.calls += 1;
        if self.illegal.contains(mv) {
            return None;
        }
        let fields: Vec<&str> = position.split_whitespace().collect();
        let &[placement, side, castling, _, halfmove, fullmove] = fields.as_slice() else {
            return None;
        };
        let (base, played) = placement.split_once('.').unwrap_or((placement, ""));
        let mut played: Vec<&str> = played.split('.').filter(|m| !m.is_empty()).collect();
        played.push(mv);
        played.sort_unstable();
        let halfmove: u32 = halfmove.parse().ok()?;
        let fullmove: u32 = fullmove.parse().ok()?;
        let (side, fullmove) = match side {
            "w" => ("b", fullmove),
            "b" => ("w", fullmove + 1),
            _ => return None,
        };
        Some(format!(
            "{base}.{} {side} {castling} - {} {fullmove}",
            played.join("."),
            halfmove + 1
        ))
    }

    fn move_to_square(&mut self, position: &str, mv: &str) -> Option<String> {
        if self.illegal.contains(mv) {
            return None;
        }
        let white = position.split_whitespace().nth(1)? == "w";
        let rank = if white { '1' } else { '8' };
        let san = mv.trim_end_matches(['+', '#']);
        match san {
            "O-O" => return Some(format!("g{rank}")),
            "O-O-O" => return Some(format!("c{rank}")),
            _ => {}
        }
        let san = san.split_once('=').map_or(san, |(head, _)| head);
        let square = san.get(san.len().checked_sub(2)?..)?;
        let mut chars = square.chars();
        let file_ok = chars.next().is_some_and(|c| ('a'..='h').contains(&c));
        let rank_ok = chars.next().is_some_and(|c| ('1'..='8').contains(&c));
        (file_ok && rank_ok).then(|| square.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{normalize_fen, INITIAL_POSITION};
    use serde_json::json;

    #[test]
    fn build_node_reads_fields_and_children() {
        let node = build_node(&json!({
            "comment": "start",
            "nags": [14],
            "priority": -1,
            "squares": ["Ge4"],
            "arrows": ["Ge2e4"],
            "e4": {},
            "d4": {"d5": {}},
        }));
        assert_eq!(node.comment, "start");
        assert_eq!(node.nags, vec![Nag::PLUS_EQUALS_POSITION]);
        assert_eq!(node.priority, Priority::TrainLast);
        assert_eq!(node.annotations.squares, vec!["Ge4"]);
        assert_eq!(node.annotations.arrows, vec!["Ge2e4"]);
        assert_eq!(node.children.keys().collect::<Vec<_>>(), vec!["e4", "d4"]);
        assert_eq!(node.children["d4"].child_count(), 1);
    }

    #[test]
    fn fake_oracle_transposes() {
        let mut oracle = FakeOracle::new();
        let a = oracle.make_move(INITIAL_POSITION, "e4").unwrap();
        let a = oracle.make_move(&a, "e5").unwrap();
        let a = oracle.make_move(&a, "Nf3").unwrap();
        let b = oracle.make_move(INITIAL_POSITION, "Nf3").unwrap();
        let b = oracle.make_move(&b, "e5").unwrap();
        let b = oracle.make_move(&b, "e4").unwrap();
        assert_eq!(a, b);
        assert!(a.ends_with(" b KQkq - 3 2"));
        assert_eq!(normalize_fen(&a).unwrap(), normalize_fen(&b).unwrap());
        assert_eq!(oracle.calls, 6);
    }

    #[test]
    fn fake_oracle_refuses_illegal_moves() {
        let mut oracle = FakeOracle::with_illegal(&["Ke2"]);
        assert!(oracle.make_move(INITIAL_POSITION, "Ke2").is_none());
        assert!(oracle.move_to_square(INITIAL_POSITION, "Ke2").is_none());
        assert!(oracle.make_move("garbage", "e4").is_none());
    }

    #[test]
    fn fake_oracle_move_to_square() {
        let mut oracle = FakeOracle::new();
        assert_eq!(oracle.move_to_square(INITIAL_POSITION, "Nf3").as_deref(), Some("f3"));
        assert_eq!(oracle.move_to_square(INITIAL_POSITION, "Qxf7#").as_deref(), Some("f7"));
        assert_eq!(oracle.move_to_square(INITIAL_POSITION, "e8=Q+").as_deref(), Some("e8"));
        assert_eq!(oracle.move_to_square(INITIAL_POSITION, "O-O").as_deref(), Some("g1"));
        assert!(oracle.move_to_square(INITIAL_POSITION, "??").is_none());
    }
}
