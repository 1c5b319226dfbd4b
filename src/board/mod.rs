//! Board representation for the 15x15 game

pub mod bitboard;
pub mod board;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, StoneGuard};

/// Board size (15x15)
pub const BOARD_SIZE: usize = 15;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 225

/// The four line axes. Opposite directions are implied.
pub const DIRECTIONS: [(i32, i32); 4] = [
    (1, 0),  // Horizontal
    (0, 1),  // Vertical
    (1, 1),  // Diagonal SE
    (1, -1), // Diagonal NE
];

/// Stone colors. `Black` is the first-moving color, drawn as `O`,
/// and the only one restricted by renju.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }

    /// Board symbol: `.`, `O` or `X`
    pub fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'O',
            Stone::White => 'X',
        }
    }
}

/// Position on the board. `x` is the column, `y` the row, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    /// Build a position. Coordinates are not checked; see [`Pos::in_bounds`].
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Checked constructor from signed coordinates
    #[inline]
    pub fn try_new(x: i32, y: i32) -> Option<Self> {
        if Self::is_valid(x, y) {
            Some(Self::new(x as u8, y as u8))
        } else {
            None
        }
    }

    #[inline]
    pub fn in_bounds(self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            x: (idx % BOARD_SIZE) as u8,
            y: (idx / BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(x: i32, y: i32) -> bool {
        x >= 0 && x < BOARD_SIZE as i32 && y >= 0 && y < BOARD_SIZE as i32
    }

    /// Step `k` cells along `(dx, dy)`, or `None` past the edge
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, k: i32) -> Option<Pos> {
        Self::try_new(self.x as i32 + dx * k, self.y as i32 + dy * k)
    }

    /// The board center (H8)
    pub const fn center() -> Pos {
        Pos::new((BOARD_SIZE / 2) as u8, (BOARD_SIZE / 2) as u8)
    }
}

impl std::fmt::Display for Pos {
    /// Chess-style notation, e.g. `H8` for (7, 7). Cells off the board
    /// print as raw coordinates.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.in_bounds() {
            return write!(f, "({},{})", self.x, self.y);
        }
        write!(f, "{}{}", char::from(b'A' + self.x), u32::from(self.y) + 1)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

/// A placed stone: where and which color. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub pos: Pos,
    pub stone: Stone,
}

impl Move {
    #[inline]
    pub const fn new(pos: Pos, stone: Stone) -> Self {
        Self { pos, stone }
    }
}
