//! Zobrist hashing for position identification
//!
//! Zobrist hashing allows O(1) incremental hash updates when placing or
//! removing stones, which keeps transposition table lookups cheap.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut board = Board::new();
//! let hash1 = zt.hash(&board, Stone::Black);
//!
//! let pos = Pos::new(7, 7);
//! board.place(pos, Stone::Black);
//! let hash2 = zt.hash(&board, Stone::White);
//!
//! // Incremental update is equivalent to full recomputation
//! assert_eq!(zt.toggle(hash1, pos, Stone::Black), hash2);
//! ```

use crate::board::{Board, Pos, Stone, TOTAL_CELLS};

/// Random keys for every (cell, color) pair plus the side to move
pub struct ZobristTable {
    black: [u64; TOTAL_CELLS],
    white: [u64; TOTAL_CELLS],
    black_to_move: u64,
}

impl ZobristTable {
    /// Build the table from a fixed seed, so hashes are reproducible
    #[must_use]
    pub fn new() -> Self {
        // splitmix64
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = || {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        };

        let mut black = [0u64; TOTAL_CELLS];
        let mut white = [0u64; TOTAL_CELLS];
        for (b, w) in black.iter_mut().zip(white.iter_mut()) {
            *b = next();
            *w = next();
        }

        Self {
            black,
            white,
            black_to_move: next(),
        }
    }

    /// Full hash of a position
    #[must_use]
    pub fn hash(&self, board: &Board, side_to_move: Stone) -> u64 {
        let mut h = board
            .occupied()
            .fold(0u64, |h, mv| h ^ self.key(mv.pos, mv.stone));
        if side_to_move == Stone::Black {
            h ^= self.black_to_move;
        }
        h
    }

    /// Hash after placing or removing `stone` at `pos`.
    ///
    /// XOR is its own inverse, so the same call undoes itself. The side to
    /// move flips too.
    #[inline]
    #[must_use]
    pub fn toggle(&self, hash: u64, pos: Pos, stone: Stone) -> u64 {
        hash ^ self.key(pos, stone) ^ self.black_to_move
    }

    #[inline]
    fn key(&self, pos: Pos, stone: Stone) -> u64 {
        match stone {
            Stone::Black => self.black[pos.to_index()],
            Stone::White => self.white[pos.to_index()],
            Stone::Empty => 0,
        }
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
