//! Opening and endgame books.
//!
//! An opening book holds one tree rooted at the position reached by its
//! initial moves. An endgame book holds several positions, each with its
//! own tree. Every operation here returns a new book and leaves its input
//! alone; `line_count` is kept in step with the trees.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cursor::NodeCursor;
use crate::error::BookError;
use crate::info::line_count;
use crate::node::{Move, Node, Position};
use crate::node_reducer;
use crate::position::{Color, MoveOracle, GENERIC_ENDGAME, INITIAL_POSITION};
use crate::priority::update_ancestor_priority;

/// Single tree trained from a known sequence of opening moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningBook {
    pub id: String,
    pub name: String,
    /// Position after `initial_moves`.
    pub position: Position,
    pub line_count: usize,
    pub initial_moves: Vec<Move>,
    /// Side the user trains.
    pub color: Color,
    pub root_node: Arc<Node>,
}

/// Set of positions, each with its own tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndgameBook {
    pub id: String,
    pub name: String,
    /// Position displayed for the whole book.
    pub position: Position,
    pub line_count: usize,
    pub positions: Vec<EndgamePosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndgamePosition {
    pub id: String,
    pub position: Position,
    pub color: Color,
    pub root_node: Arc<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Book {
    Opening(OpeningBook),
    Endgame(EndgameBook),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookKind {
    Opening,
    Endgame,
}

/// Book metadata without the trees, for listing many books at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    #[serde(rename = "type")]
    pub kind: BookKind,
    pub id: String,
    pub name: String,
    pub position: Position,
    pub line_count: usize,
}

impl Book {
    pub fn kind(&self) -> BookKind {
        match self {
            Book::Opening(_) => BookKind::Opening,
            Book::Endgame(_) => BookKind::Endgame,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Book::Opening(book) => &book.id,
            Book::Endgame(book) => &book.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Book::Opening(book) => &book.name,
            Book::Endgame(book) => &book.name,
        }
    }

    pub fn position(&self) -> &str {
        match self {
            Book::Opening(book) => &book.position,
            Book::Endgame(book) => &book.position,
        }
    }

    pub fn line_count(&self) -> usize {
        match self {
            Book::Opening(book) => book.line_count,
            Book::Endgame(book) => book.line_count,
        }
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            kind: self.kind(),
            id: self.id().to_string(),
            name: self.name().to_string(),
            position: self.position().to_string(),
            line_count: self.line_count(),
        }
    }
}

impl From<OpeningBook> for Book {
    fn from(book: OpeningBook) -> Self {
        Book::Opening(book)
    }
}

impl From<EndgameBook> for Book {
    fn from(book: EndgameBook) -> Self {
        Book::Endgame(book)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create an empty opening book.
///
/// The book position is found by playing `initial_moves` from the standard
/// starting position.
pub fn new_opening_book<O: MoveOracle + ?Sized>(
    oracle: &mut O,
    name: impl Into<String>,
    color: Color,
    initial_moves: Vec<Move>,
) -> Result<OpeningBook, BookError> {
    let mut position = INITIAL_POSITION.to_string();
    for mv in &initial_moves {
        position = match oracle.make_move(&position, mv) {
            Some(next) => next,
            None => return Err(BookError::InvalidInitialMoves(initial_moves.clone())),
        };
    }
    Ok(OpeningBook {
        id: new_id(),
        name: name.into(),
        position,
        line_count: 0,
        initial_moves,
        color,
        root_node: Arc::new(Node::new()),
    })
}

pub fn new_endgame_book(name: impl Into<String>) -> EndgameBook {
    EndgameBook {
        id: new_id(),
        name: name.into(),
        position: GENERIC_ENDGAME.to_string(),
        line_count: 0,
        positions: Vec::new(),
    }
}

pub fn new_endgame_position(position: impl Into<Position>, color: Color) -> EndgamePosition {
    EndgamePosition {
        id: new_id(),
        position: position.into(),
        color,
        root_node: Arc::new(Node::new()),
    }
}

/// Replace the tree of an opening book.
pub fn update_opening(book: &OpeningBook, root_node: Arc<Node>) -> OpeningBook {
    OpeningBook {
        line_count: line_count(&root_node),
        root_node,
        ..book.clone()
    }
}

pub fn add_endgame_position(book: &EndgameBook, position: EndgamePosition) -> EndgameBook {
    let mut positions = book.positions.clone();
    let lines = line_count(&position.root_node);
    positions.push(position);
    with_positions(book, positions, book.line_count + lines)
}

/// Replace the tree of one endgame position.
pub fn update_endgame_position(
    book: &EndgameBook,
    position_id: &str,
    root_node: Arc<Node>,
) -> Result<EndgameBook, BookError> {
    let index = book
        .positions
        .iter()
        .position(|p| p.id == position_id)
        .ok_or_else(|| BookError::PositionNotFound(position_id.to_string()))?;
    let mut positions = book.positions.clone();
    let old_lines = line_count(&positions[index].root_node);
    let new_lines = line_count(&root_node);
    positions[index].root_node = root_node;
    let total = (book.line_count + new_lines).saturating_sub(old_lines);
    Ok(with_positions(book, positions, total))
}

/// Remove an endgame position. Unknown ids leave the book as it is.
pub fn remove_endgame_position(book: &EndgameBook, position_id: &str) -> EndgameBook {
    let (removed, positions): (Vec<_>, Vec<_>) = book
        .positions
        .iter()
        .cloned()
        .partition(|p| p.id == position_id);
    let removed_lines: usize = removed.iter().map(|p| line_count(&p.root_node)).sum();
    with_positions(book, positions, book.line_count.saturating_sub(removed_lines))
}

fn with_positions(book: &EndgameBook, positions: Vec<EndgamePosition>, line_count: usize) -> EndgameBook {
    let position = positions
        .first()
        .map_or_else(|| GENERIC_ENDGAME.to_string(), |p| p.position.clone());
    EndgameBook {
        id: book.id.clone(),
        name: book.name.clone(),
        position,
        line_count,
        positions,
    }
}

/// Add `moves` to `node`, returning the new tree.
pub fn add_line<S: AsRef<str>>(node: &Node, moves: &[S]) -> Node {
    let mut cursor = NodeCursor::init(node);
    for mv in moves {
        cursor.move_or_insert(mv.as_ref());
    }
    cursor.into_root()
}

/// Move the line at `moves` from `source` into `destination`.
///
/// `moves` starts from the standard initial position, so it must begin with
/// the initial moves of both books. The subtree at `moves` is merged into
/// `destination`, where existing nodes win over moved ones, and then deleted
/// from `source`. Moved nodes the destination lacked keep their priority. Returns the updated `(source, destination)`.
pub fn move_line(
    source: &OpeningBook,
    destination: &OpeningBook,
    moves: &[Move],
) -> Result<(OpeningBook, OpeningBook), BookError> {
    let source_moves = book_relative(source, moves)?;
    let destination_moves = book_relative(destination, moves)?;
    let Some(subtree) = source.root_node.get_descendant(source_moves) else {
        return Err(BookError::LineNotFound {
            book: source.name.clone(),
            moves: moves.to_vec(),
        });
    };

    let mut cursor = NodeCursor::init(&destination.root_node);
    let mut inserted = false;
    for mv in destination_moves {
        inserted = cursor.move_or_insert(mv);
    }
    if inserted {
        cursor.current_mut().priority = subtree.priority;
    }
    merge_into(&mut cursor, subtree);
    update_ancestor_priority(&mut cursor);
    let destination_root = Arc::new(cursor.into_root());

    let source_root = node_reducer::delete(&source.root_node, source_moves)
        .unwrap_or_else(|| Arc::clone(&source.root_node));
    debug!(
        source = source.id.as_str(),
        destination = destination.id.as_str(),
        depth = moves.len(),
        "moved line"
    );
    Ok((
        update_opening(source, source_root),
        update_opening(destination, destination_root),
    ))
}

fn book_relative<'a>(book: &OpeningBook, moves: &'a [Move]) -> Result<&'a [Move], BookError> {
    moves
        .strip_prefix(book.initial_moves.as_slice())
        .ok_or_else(|| BookError::MovesOutsideBook {
            book: book.name.clone(),
            moves: moves.to_vec(),
        })
}

/// Merge `source` into the cursor's node.
///
/// Moves missing from the cursor's node are grafted in whole; shared moves
/// are merged recursively. Empty comment, markup and NAG fields are filled
/// from `source`. The cursor ends where it started.
fn merge_into(cursor: &mut NodeCursor, source: &Node) {
    let current = cursor.current_mut();
    if current.comment.is_empty() {
        current.comment = source.comment.clone();
    }
    if current.annotations.squares.is_empty() && current.annotations.arrows.is_empty() {
        current.annotations = source.annotations.clone();
    }
    if current.nags.is_empty() {
        current.nags = source.nags.clone();
    }
    for (mv, child) in &source.children {
        if cursor.move_child(mv) {
            merge_into(cursor, child);
            cursor.move_to_parent();
        } else {
            cursor.replace_child(mv.clone(), Node::clone(child));
        }
    }
    // A node that just gained its only child takes the child's priority.
    let single_child_priority = cursor.current().get_single_child().map(|child| child.priority);
    if let Some(priority) = single_child_priority {
        cursor.current_mut().priority = priority;
    }
}
