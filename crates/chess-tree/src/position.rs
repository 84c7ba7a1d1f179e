//! Position strings and the move oracle boundary.
//!
//! The tree engine never applies chess rules itself. Anything that needs to
//! know what a move does goes through a [`MoveOracle`]; this module only
//! reads the fields of a FEN string.

use serde::{Deserialize, Serialize};

use crate::error::BookError;
use crate::node::Position;

/// FEN for the initial position.
pub const INITIAL_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN for a generic endgame position.
pub const GENERIC_ENDGAME: &str = "8/8/4k3/8/8/4K3/8/8 w - - 0 1";

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w")]
    White,
    #[serde(rename = "b")]
    Black,
}

/// Applies SAN moves to positions.
///
/// Implementations must be deterministic: the same `(position, move)` pair
/// always yields the same answer. They may keep a board loaded between calls,
/// which is why the methods take `&mut self`.
pub trait MoveOracle {
    /// Position after playing `mv`, or `None` if the move is illegal.
    fn make_move(&mut self, position: &str, mv: &str) -> Option<Position>;

    /// Destination square of `mv` (e.g. `"e4"`), or `None` if the move is illegal.
    fn move_to_square(&mut self, position: &str, mv: &str) -> Option<String>;
}

impl<O: MoveOracle + ?Sized> MoveOracle for &mut O {
    fn make_move(&mut self, position: &str, mv: &str) -> Option<Position> {
        (**self).make_move(position, mv)
    }

    fn move_to_square(&mut self, position: &str, mv: &str) -> Option<String> {
        (**self).move_to_square(position, mv)
    }
}

/// The six whitespace-separated FEN fields.
struct FenFields<'a> {
    fields: [&'a str; 6],
}

impl<'a> FenFields<'a> {
    fn parse(position: &'a str) -> Result<Self, BookError> {
        let invalid = || BookError::InvalidPosition(position.to_string());
        let mut iter = position.split_whitespace();
        let mut fields = [""; 6];
        for field in fields.iter_mut() {
            *field = iter.next().ok_or_else(invalid)?;
        }
        if iter.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { fields })
    }

    fn placement(&self) -> &'a str {
        self.fields[0]
    }

    fn color(&self) -> Option<Color> {
        match self.fields[1] {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }

    fn en_passant(&self) -> &'a str {
        self.fields[3]
    }
}

/// Get the color to move for a position.
pub fn position_color(position: &str) -> Result<Color, BookError> {
    FenFields::parse(position)?
        .color()
        .ok_or_else(|| BookError::InvalidPosition(position.to_string()))
}

/// Normalize a FEN so that transpositions map to the same string.
///
/// - the halfmove clock becomes `0`
/// - the fullmove number becomes `1`
/// - the en passant square becomes `-` unless a pawn of the side to move
///   stands next to the pawn that just double-pushed
pub fn normalize_fen(position: &str) -> Result<Position, BookError> {
    let fen = FenFields::parse(position)?;
    let color = fen
        .color()
        .ok_or_else(|| BookError::InvalidPosition(position.to_string()))?;
    let en_passant = match fen.en_passant() {
        "-" => "-",
        square => {
            if en_passant_capturable(fen.placement(), square, color)
                .ok_or_else(|| BookError::InvalidPosition(position.to_string()))?
            {
                square
            } else {
                "-"
            }
        }
    };
    let [placement, side, castling, _, _, _] = fen.fields;
    Ok(format!("{placement} {side} {castling} {en_passant} 0 1"))
}

/// Whether a pawn of `color` could capture onto the en passant `square`.
///
/// Returns `None` when the square or the placement field is malformed.
fn en_passant_capturable(placement: &str, square: &str, color: Color) -> Option<bool> {
    let mut chars = square.chars();
    let file = chars.next().filter(|c| ('a'..='h').contains(c))?;
    let rank = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let file = file as usize - 'a' as usize;
    // White just double-pushed past rank 3, so black pawns on rank 4 capture;
    // black past rank 6 means white pawns on rank 5.
    let (pawn_rank, capturer) = match (rank, color) {
        ('3', Color::Black) => (4, 'p'),
        ('6', Color::White) => (5, 'P'),
        _ => return None,
    };
    let row = expand_rank(placement, pawn_rank)?;
    let left = file.checked_sub(1).and_then(|f| row.get(f));
    let right = row.get(file + 1);
    Some(left == Some(&capturer) || right == Some(&capturer))
}

/// Expand one rank of the placement field into 8 squares (`' '` for empty).
fn expand_rank(placement: &str, rank: usize) -> Option<Vec<char>> {
    let row = placement.split('/').nth(8usize.checked_sub(rank)?)?;
    let mut squares = Vec::with_capacity(8);
    for c in row.chars() {
        match c.to_digit(10) {
            Some(empty) => squares.extend(std::iter::repeat(' ').take(empty as usize)),
            None => squares.push(c),
        }
    }
    (squares.len() == 8).then_some(squares)
}
