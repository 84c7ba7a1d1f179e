//! Numeric Annotation Glyphs.

use serde::{Deserialize, Serialize};

/// NAG value (Numeric Annotation Glyph).
///
/// The tree engine treats NAGs as opaque codes; the named constants and
/// [`Nag::text`] exist for consumers that render them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nag(pub u8);

impl Nag {
    pub const GOOD_MOVE: Nag = Nag(1);
    pub const POOR_MOVE: Nag = Nag(2);
    pub const BRILLIANT_MOVE: Nag = Nag(3);
    pub const BLUNDER_MOVE: Nag = Nag(4);
    pub const INTERESTING_MOVE: Nag = Nag(5);
    pub const DUBIOUS_MOVE: Nag = Nag(6);
    pub const FORCED_MOVE: Nag = Nag(7);
    pub const EQUAL_POSITION: Nag = Nag(10);
    pub const UNCLEAR_POSITION: Nag = Nag(13);
    pub const PLUS_EQUALS_POSITION: Nag = Nag(14);
    pub const EQUALS_PLUS_POSITION: Nag = Nag(15);
    pub const PLUS_MINUS_POSITION: Nag = Nag(16);
    pub const MINUS_PLUS_POSITION: Nag = Nag(17);
    pub const PLUS_OVER_MINUS_POSITION: Nag = Nag(18);
    pub const MINUS_OVER_PLUS_POSITION: Nag = Nag(19);
    // 222..=237 are unused by other software.
    pub const PRIORITY_TRAIN_FIRST: Nag = Nag(222);
    pub const PRIORITY_TRAIN_LAST: Nag = Nag(223);

    /// Display text for the NAG, `"<?>"` when there is none.
    pub fn text(self) -> &'static str {
        match self {
            Nag::BRILLIANT_MOVE => "!!",
            Nag::GOOD_MOVE => "!",
            Nag::INTERESTING_MOVE => "!?",
            Nag::DUBIOUS_MOVE => "?!",
            Nag::POOR_MOVE => "?",
            Nag::BLUNDER_MOVE => "??",
            Nag::PLUS_MINUS_POSITION => "+-",
            Nag::PLUS_EQUALS_POSITION => "+",
            Nag::EQUAL_POSITION => "=",
            Nag::UNCLEAR_POSITION => "\u{221E}",
            Nag::EQUALS_PLUS_POSITION => "=+",
            Nag::MINUS_PLUS_POSITION => "-+",
            _ => "<?>",
        }
    }

    pub fn is_move_nag(self) -> bool {
        MOVE_NAGS.contains(&self)
    }

    pub fn is_position_nag(self) -> bool {
        POSITION_NAGS.contains(&self)
    }
}

impl From<u8> for Nag {
    fn from(value: u8) -> Self {
        Nag(value)
    }
}

/// NAGs that judge the move itself.
pub const MOVE_NAGS: [Nag; 7] = [
    Nag::GOOD_MOVE,
    Nag::POOR_MOVE,
    Nag::BRILLIANT_MOVE,
    Nag::BLUNDER_MOVE,
    Nag::INTERESTING_MOVE,
    Nag::DUBIOUS_MOVE,
    Nag::FORCED_MOVE,
];

/// NAGs that judge the resulting position.
pub const POSITION_NAGS: [Nag; 8] = [
    Nag::EQUAL_POSITION,
    Nag::UNCLEAR_POSITION,
    Nag::PLUS_EQUALS_POSITION,
    Nag::EQUALS_PLUS_POSITION,
    Nag::PLUS_MINUS_POSITION,
    Nag::MINUS_PLUS_POSITION,
    Nag::PLUS_OVER_MINUS_POSITION,
    Nag::MINUS_OVER_PLUS_POSITION,
];
