use thiserror::Error;

use crate::node::Move;

/// Contract violations raised by the book and storage layers.
///
/// Edits that merely fail to apply (an unknown path, an unchanged value) are
/// not errors; they leave their input untouched instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookError {
    #[error("combine_nodes: missing node: {0}")]
    MissingNode(String),
    #[error("combine_nodes: node {0} is its own ancestor")]
    NodeCycle(String),
    #[error("illegal move {mv} in position {position}")]
    IllegalMove { position: String, mv: Move },
    #[error("invalid position: {0}")]
    InvalidPosition(String),
    #[error("invalid initial moves: {0:?}")]
    InvalidInitialMoves(Vec<Move>),
    #[error("endgame position not found: {0}")]
    PositionNotFound(String),
    #[error("line not present in {book}: {moves:?}")]
    LineNotFound { book: String, moves: Vec<Move> },
    #[error("{book} initial moves do not start with: {moves:?}")]
    MovesOutsideBook { book: String, moves: Vec<Move> },
}
