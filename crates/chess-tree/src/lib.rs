//! chess-tree: persistent move trees for building and studying chess books.
//!
//! A book is a tree of moves (SAN labels) annotated with comments, markup,
//! NAG codes and a training priority. Trees are immutable values: children
//! are shared through [`Arc`](std::sync::Arc), and every edit returns a new
//! root that shares every untouched subtree with the old one.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`node`] | [`Node`], [`Priority`], [`Annotations`] and path queries |
//! | [`nag`] | [`Nag`] codes and their display text |
//! | [`info`] | line counts, per-priority counts, [`NodeInfo`] |
//! | [`cursor`] | [`NodeCursor`], the copy-on-write traversal |
//! | [`update`] | functional path updaters |
//! | [`priority`] | priority propagation along single-child chains |
//! | [`node_reducer`] | edit commands with undo/redo history |
//! | [`editor`] | board-anchored editing session over `node_reducer` |
//! | [`split`] | flatten/unflatten for row storage |
//! | [`view_tree`] | budgeted view truncation |
//! | [`book`] | opening and endgame books |
//! | [`position`] | FEN helpers and the [`MoveOracle`] boundary |
//!
//! # Example
//!
//! ```
//! use chess_tree::{Node, NodeAction, NodeState};
//!
//! let mut state = NodeState::new(Node::new());
//! assert!(state.reduce(&NodeAction::add(["e4", "e5", "Nf3"])));
//! assert!(state.reduce(&NodeAction::add(["e4", "e5", "Nc3"])));
//! assert_eq!(chess_tree::line_count(&state.node), 2);
//!
//! assert!(state.reduce(&NodeAction::Undo));
//! assert_eq!(chess_tree::line_count(&state.node), 1);
//! ```

pub mod book;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod info;
pub mod nag;
pub mod node;
pub mod node_reducer;
pub mod position;
pub mod priority;
pub mod split;
#[cfg(any(test, feature = "testutil"))]
#[doc(hidden)]
pub mod testutil;
pub mod update;
pub mod view_tree;

pub use book::{
    add_endgame_position, add_line, move_line, new_endgame_book, new_endgame_position,
    new_opening_book, remove_endgame_position, update_endgame_position, update_opening, Book,
    BookKind, BookSummary, EndgameBook, EndgamePosition, OpeningBook,
};
pub use cursor::NodeCursor;
pub use editor::{EditorAction, EditorState};
pub use error::BookError;
pub use info::{calc_node_info, line_count, line_count_by_priority, LineCountByPriority, NodeInfo};
pub use nag::{Nag, MOVE_NAGS, POSITION_NAGS};
pub use node::{Annotations, Children, Move, MoveNode, Node, Position, Priority};
pub use node_reducer::{NodeAction, NodeState};
pub use priority::{check_priority_invariant, priority_violations};
pub use position::{
    normalize_fen, position_color, Color, MoveOracle, GENERIC_ENDGAME, INITIAL_POSITION,
};
pub use split::{combine_nodes, split_node, SplitNode};
pub use update::{
    find_start_of_branch, update_all_descendents, update_child, update_to_start_of_branch,
};
pub use view_tree::{
    view_node_tree, ViewNode, ViewNodeTreeParams, ViewNodeTreeResult, DEFAULT_MAX_BRANCHES,
    DEFAULT_MAX_DEPTH,
};
