//! Main AI engine wrapping the searcher
//!
//! The engine maps a [`Level`] to concrete search limits and turns a search
//! result into a move for the computer-controlled side. Limits grow with
//! the level and contain no wall-clock component, so the chosen move is a
//! pure function of board, color, level and renju flag.
//!
//! | level | depth | root | inner | node budget |
//! |-------|-------|------|-------|-------------|
//! | 1     | 2     | 10   | 8     | 20 000      |
//! | 2     | 3     | 12   | 10    | 60 000      |
//! | 3     | 4     | 14   | 10    | 150 000     |
//! | 4     | 5     | 16   | 12    | 400 000     |
//! | 5     | 6     | 18   | 12    | 1 000 000   |
//!
//! # Example
//!
//! ```
//! use gomoku::config::Level;
//! use gomoku::{AIEngine, Board, Pos, Stone};
//!
//! let mut engine = AIEngine::new(Level::new(1)?, true);
//! let mut board = Board::new();
//! board.place(Pos::new(7, 7), Stone::Black);
//!
//! let result = engine.choose_move(&board, Stone::White)?;
//! assert!(board.is_empty(result.best_move));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::board::{Board, Pos, Stone};
use crate::config::Level;
use crate::search::{SearchLimits, Searcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The side to move has no legal cell; the game is a draw
    #[error("no legal moves left for {0:?}")]
    NoLegalMoves(Stone),
}

/// How the move was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Completes five on the spot
    ImmediateWin,
    /// Regular alpha-beta search result
    AlphaBeta,
}

/// Result of a move search with statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub best_move: Pos,
    /// Score from the mover's perspective
    pub score: i32,
    pub search_type: SearchType,
    /// Deepest completed iteration
    pub depth: u8,
    pub nodes: u64,
    /// Wall time, for diagnostics only
    pub time_ms: u64,
}

/// Search limits for a level
pub fn limits_for(level: Level) -> SearchLimits {
    let (max_depth, root_width, inner_width, node_budget) = match level.get() {
        1 => (2, 10, 8, 20_000),
        2 => (3, 12, 10, 60_000),
        3 => (4, 14, 10, 150_000),
        4 => (5, 16, 12, 400_000),
        _ => (6, 18, 12, 1_000_000),
    };
    SearchLimits {
        max_depth,
        root_width,
        inner_width,
        node_budget,
    }
}

/// Computer opponent for single-player sessions
pub struct AIEngine {
    level: Level,
    limits: SearchLimits,
    searcher: Searcher,
}

impl AIEngine {
    pub fn new(level: Level, renju: bool) -> Self {
        Self {
            level,
            limits: limits_for(level),
            searcher: Searcher::new(renju),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn renju(&self) -> bool {
        self.searcher.renju()
    }

    /// Pick a move for `color`.
    ///
    /// Never returns an occupied or forbidden cell. Fails with
    /// [`SearchError::NoLegalMoves`] when the side has nowhere to play.
    #[instrument(skip(self, board), fields(level = self.level.get(), stones = board.stone_count()))]
    pub fn choose_move(&mut self, board: &Board, color: Stone) -> Result<MoveResult, SearchError> {
        let start = Instant::now();
        let result = self.searcher.search(board, color, &self.limits);
        let best_move = result.best_move.ok_or(SearchError::NoLegalMoves(color))?;

        let search_type = if result.depth == 0 && result.is_winning() {
            SearchType::ImmediateWin
        } else {
            SearchType::AlphaBeta
        };

        let time_ms = start.elapsed().as_millis() as u64;
        debug!(
            mv = %best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            cutoffs = result.stats.beta_cutoffs,
            first_cut_pct = result.stats.first_move_rate(),
            tt_hits = result.stats.tt.hits,
            time_ms,
            "search finished"
        );

        Ok(MoveResult {
            best_move,
            score: result.score,
            search_type,
            depth: result.depth,
            nodes: result.nodes,
            time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TOTAL_CELLS;
    use crate::rules::is_forbidden;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn test_limits_monotonic() {
        let limits: Vec<_> = Level::all().map(limits_for).collect();
        for pair in limits.windows(2) {
            assert!(pair[0].max_depth < pair[1].max_depth);
            assert!(pair[0].root_width <= pair[1].root_width);
            assert!(pair[0].node_budget < pair[1].node_budget);
        }
        assert_eq!(limits[0].max_depth, 2);
        assert_eq!(limits[4].max_depth, 6);
    }

    #[test]
    fn test_engine_opening_is_center() {
        let mut engine = AIEngine::new(level(1), true);
        let result = engine.choose_move(&Board::new(), Stone::Black).unwrap();
        assert_eq!(result.best_move, Pos::center());
    }

    #[test]
    fn test_engine_immediate_win() {
        let mut board = Board::new();
        for y in 2..6 {
            board.place(Pos::new(4, y), Stone::White);
        }
        board.place(Pos::new(4, 1), Stone::Black);
        board.place(Pos::new(9, 9), Stone::Black);
        let mut engine = AIEngine::new(level(3), true);
        let result = engine.choose_move(&board, Stone::White).unwrap();
        assert_eq!(result.best_move, Pos::new(4, 6));
        assert_eq!(result.search_type, SearchType::ImmediateWin);
    }

    #[test]
    fn test_engine_full_board_signals_draw() {
        let mut board = Board::new();
        let mut stone = Stone::Black;
        for idx in 0..TOTAL_CELLS {
            board.place(Pos::from_index(idx), stone);
            stone = stone.opponent();
        }
        let mut engine = AIEngine::new(level(5), false);
        assert_eq!(
            engine.choose_move(&board, Stone::White),
            Err(SearchError::NoLegalMoves(Stone::White))
        );
    }

    #[test]
    fn test_engine_deterministic_per_level() {
        let mut board = Board::new();
        board.place(Pos::new(7, 7), Stone::Black);
        board.place(Pos::new(6, 6), Stone::White);
        board.place(Pos::new(8, 7), Stone::Black);
        for n in 1..=2 {
            let a = AIEngine::new(level(n), true).choose_move(&board, Stone::White).unwrap();
            let b = AIEngine::new(level(n), true).choose_move(&board, Stone::White).unwrap();
            assert_eq!(a.best_move, b.best_move);
            assert_eq!(a.score, b.score);
            assert_eq!(a.nodes, b.nodes);
        }
    }

    #[test]
    fn test_engine_black_avoids_forbidden() {
        let mut board = Board::new();
        for (x, y) in [(6, 7), (8, 7), (7, 6), (7, 8)] {
            board.place(Pos::new(x, y), Stone::Black);
        }
        for (x, y) in [(3, 3), (11, 3), (3, 11), (11, 11)] {
            board.place(Pos::new(x, y), Stone::White);
        }
        let mut engine = AIEngine::new(level(2), true);
        let result = engine.choose_move(&board, Stone::Black).unwrap();
        assert!(is_forbidden(&board, result.best_move, Stone::Black, true).is_none());
        assert_ne!(result.best_move, Pos::center());
    }

    #[test]
    fn test_engine_white_ignores_dead_gap() {
        let mut board = Board::new();
        for x in 2..6 {
            board.place(Pos::new(x, 7), Stone::Black);
        }
        for (x, y) in [(7, 7), (11, 3)] {
            board.place(Pos::new(x, y), Stone::Black);
        }
        for (x, y) in [(1, 7), (8, 7), (9, 10), (10, 10), (12, 12)] {
            board.place(Pos::new(x, y), Stone::White);
        }
        let gap = Pos::new(6, 7);
        assert!(is_forbidden(&board, gap, Stone::Black, true).is_some());

        for n in [1, 2] {
            let mut engine = AIEngine::new(level(n), true);
            let result = engine.choose_move(&board, Stone::White).unwrap();
            assert_ne!(result.best_move, gap, "level {}", n);
        }
    }
}
