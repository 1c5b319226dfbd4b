//! Board structure with move history

use std::ops::{Deref, DerefMut};

use super::bitboard::Bitboard;
use super::{Move, Pos, Stone, BOARD_SIZE, TOTAL_CELLS};

/// Game board with reversible move history.
///
/// The grid only changes through [`Board::apply`] and [`Board::undo`];
/// undo restores the exact prior grid and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Black stones bitboard
    black: Bitboard,
    /// White stones bitboard
    white: Bitboard,
    /// Applied moves, oldest first
    history: Vec<Move>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
            history: Vec::with_capacity(TOTAL_CELLS),
        }
    }

    /// Rebuild a board by replaying moves in order
    pub fn from_moves<I: IntoIterator<Item = Move>>(moves: I) -> Self {
        let mut board = Self::new();
        for mv in moves {
            board.apply(mv);
        }
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone and record it.
    ///
    /// The cell must be in bounds and empty; callers validate first.
    #[inline]
    pub fn apply(&mut self, mv: Move) {
        debug_assert!(mv.pos.in_bounds(), "apply out of bounds: {:?}", mv.pos);
        debug_assert!(self.is_empty(mv.pos), "apply on occupied cell: {:?}", mv.pos);
        match mv.stone {
            Stone::Black => self.black.set(mv.pos),
            Stone::White => self.white.set(mv.pos),
            Stone::Empty => return,
        }
        self.history.push(mv);
    }

    /// Shorthand for `apply(Move::new(pos, stone))`
    #[inline]
    pub fn place(&mut self, pos: Pos, stone: Stone) {
        self.apply(Move::new(pos, stone));
    }

    /// Take back the last move, returning it
    #[inline]
    pub fn undo(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        self.black.clear(mv.pos);
        self.white.clear(mv.pos);
        Some(mv)
    }

    /// Place a stone for the lifetime of the returned guard.
    ///
    /// The stone is taken back when the guard drops, on every exit path.
    #[inline]
    pub fn scoped(&mut self, mv: Move) -> StoneGuard<'_> {
        let placed = mv.stone != Stone::Empty;
        self.apply(mv);
        StoneGuard { board: self, placed }
    }

    /// Reset to an empty board
    pub fn clear(&mut self) {
        self.black = Bitboard::new();
        self.white = Bitboard::new();
        self.history.clear();
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn stones(&self, stone: Stone) -> Option<&Bitboard> {
        match stone {
            Stone::Black => Some(&self.black),
            Stone::White => Some(&self.white),
            Stone::Empty => None,
        }
    }

    /// Iterate over all occupied cells in scan order
    pub fn occupied(&self) -> impl Iterator<Item = Move> + '_ {
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter_map(|pos| match self.get(pos) {
                Stone::Empty => None,
                stone => Some(Move::new(pos, stone)),
            })
    }

    /// Iterate over empty cells in scan order
    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..TOTAL_CELLS)
            .map(Pos::from_index)
            .filter(|&pos| self.is_empty(pos))
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Number of moves applied (equals the stone count)
    #[inline]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.history.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.history.len() >= TOTAL_CELLS
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A hypothetical placement. Derefs to the board with the stone on it and
/// takes the stone back on drop.
pub struct StoneGuard<'a> {
    board: &'a mut Board,
    placed: bool,
}

impl Deref for StoneGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for StoneGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for StoneGuard<'_> {
    fn drop(&mut self) {
        if self.placed {
            self.board.undo();
        }
    }
}
