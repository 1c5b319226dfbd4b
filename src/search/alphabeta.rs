//! Alpha-Beta search with iterative deepening and transposition table
//!
//! This module implements the core search algorithm for the Gomoku AI.
//! It uses negamax with alpha-beta pruning and a transposition table.
//!
//! # Features
//!
//! - Iterative deepening, keeping the result of the last completed depth
//! - A node budget instead of a clock, so a search is a pure function of
//!   its inputs
//! - Immediate win detection at every node
//! - Renju-aware candidate generation (forbidden cells are never searched)
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone};
//! use gomoku::search::{SearchLimits, Searcher};
//!
//! let mut board = Board::new();
//! board.place(Pos::new(7, 7), Stone::Black);
//!
//! let mut searcher = Searcher::new(true);
//! let limits = SearchLimits { max_depth: 2, root_width: 8, inner_width: 6, node_budget: 5_000 };
//! let result = searcher.search(&board, Stone::White, &limits);
//! assert!(result.best_move.is_some());
//! ```

use crate::board::{Board, Move, Pos, Stone};
use crate::eval::evaluate;
use crate::rules::is_win;

use super::movegen::ordered_moves;
use super::{Bound, TTStats, TranspositionTable, ZobristTable};

/// Score of a won position at ply 0; shorter wins score higher
pub const MATE: i32 = 10_000_000;

/// Infinity score for alpha-beta bounds
const INF: i32 = MATE + 1;

/// Mate scores closer than this to `MATE` are forced results
const MATE_THRESHOLD: i32 = MATE - 1_000;

/// Transposition table entries per searcher
const TT_CAPACITY: usize = 1 << 18;

/// How far and wide one search may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration
    pub max_depth: u8,
    /// Candidates tried at the root
    pub root_width: usize,
    /// Candidates tried below the root
    pub inner_width: usize,
    /// Nodes after which deepening stops; the first iteration always completes
    pub node_budget: u64,
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    pub tt: TTStats,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move found; `None` only when the side to move has no legal cell
    pub best_move: Option<Pos>,
    /// Score of the best move from the mover's perspective
    pub score: i32,
    /// Depth of the last completed iteration
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
    pub stats: SearchStats,
}

impl SearchResult {
    /// Whether the score is a forced win for the mover
    pub fn is_winning(&self) -> bool {
        self.score >= MATE_THRESHOLD
    }

    /// Whether the score is a forced loss for the mover
    pub fn is_losing(&self) -> bool {
        self.score <= -MATE_THRESHOLD
    }
}

/// Negamax searcher. Reusable across calls; every call starts from a
/// cleared table.
pub struct Searcher {
    zobrist: ZobristTable,
    tt: TranspositionTable,
    renju: bool,
    nodes: u64,
    budget: u64,
    /// Set once the budget runs out after the first iteration
    stopped: bool,
    /// Whether at least one iteration has completed in this search
    completed: bool,
    stats: SearchStats,
}

impl Searcher {
    #[must_use]
    pub fn new(renju: bool) -> Self {
        Self {
            zobrist: ZobristTable::new(),
            tt: TranspositionTable::with_capacity(TT_CAPACITY),
            renju,
            nodes: 0,
            budget: 0,
            stopped: false,
            completed: false,
            stats: SearchStats::default(),
        }
    }

    pub fn renju(&self) -> bool {
        self.renju
    }

    /// Search for the best move for `color` using iterative deepening.
    ///
    /// The same board, color, limits and renju flag always give the same
    /// result. Root ties keep the earlier move in the candidate order.
    #[must_use]
    pub fn search(&mut self, board: &Board, color: Stone, limits: &SearchLimits) -> SearchResult {
        self.tt.clear();
        self.nodes = 0;
        self.budget = limits.node_budget;
        self.stopped = false;
        self.completed = false;
        self.stats = SearchStats::default();

        let mut root_moves = ordered_moves(board, color, self.renju, None, limits.root_width.max(1));
        let mut result = SearchResult {
            best_move: root_moves.first().copied(),
            score: 0,
            depth: 0,
            nodes: 0,
            stats: SearchStats::default(),
        };
        let Some(&first) = root_moves.first() else {
            return result;
        };

        if is_win(board, first, color, self.renju) {
            result.score = MATE - 1;
            result.nodes = 1;
            return result;
        }

        let mut work_board = board.clone();
        let hash = self.zobrist.hash(board, color);

        for depth in 1..=limits.max_depth.max(1) {
            let Some((best, score)) =
                self.search_root(&mut work_board, color, depth, &root_moves, hash, limits)
            else {
                break;
            };
            self.completed = true;
            result.best_move = Some(best);
            result.score = score;
            result.depth = depth;

            // Try the last best move first on the next iteration
            if let Some(idx) = root_moves.iter().position(|&p| p == best) {
                let mv = root_moves.remove(idx);
                root_moves.insert(0, mv);
            }

            if score.abs() >= MATE_THRESHOLD || self.nodes >= self.budget {
                break;
            }
        }

        result.nodes = self.nodes;
        self.stats.tt = self.tt.stats();
        result.stats = self.stats;
        result
    }

    /// One root iteration. `None` when the budget ran out before it completed.
    fn search_root(
        &mut self,
        board: &mut Board,
        color: Stone,
        depth: u8,
        moves: &[Pos],
        hash: u64,
        limits: &SearchLimits,
    ) -> Option<(Pos, i32)> {
        let mut alpha = -INF;
        let mut best: Option<(Pos, i32)> = None;

        for &mv in moves {
            let score = if is_win(board, mv, color, self.renju) {
                MATE - 1
            } else {
                let child_hash = self.zobrist.toggle(hash, mv, color);
                let mut child = board.scoped(Move::new(mv, color));
                -self.alpha_beta(
                    &mut child,
                    color.opponent(),
                    depth - 1,
                    -INF,
                    -alpha,
                    child_hash,
                    1,
                    limits.inner_width,
                )
            };

            if self.stopped {
                return None;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        if let Some((mv, score)) = best {
            self.tt.store(hash, depth, score, Bound::Exact, Some(mv));
        }
        best
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        color: Stone,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        hash: u64,
        ply: i32,
        width: usize,
    ) -> i32 {
        self.nodes += 1;
        if self.completed && self.nodes > self.budget {
            self.stopped = true;
        }
        if self.stopped {
            return 0;
        }

        if depth == 0 {
            return evaluate(board, color, self.renju);
        }

        if let Some(score) = self.tt.probe(hash, depth, alpha, beta) {
            return score;
        }

        let hint = self.tt.best_move(hash);
        let moves = ordered_moves(board, color, self.renju, hint, width);
        if moves.is_empty() {
            // No legal cell: draw
            return 0;
        }

        let original_alpha = alpha;
        let mut best_score = -INF;
        let mut best_move = None;

        for (i, &mv) in moves.iter().enumerate() {
            let score = if is_win(board, mv, color, self.renju) {
                MATE - ply - 1
            } else {
                let child_hash = self.zobrist.toggle(hash, mv, color);
                let mut child = board.scoped(Move::new(mv, color));
                -self.alpha_beta(
                    &mut child,
                    color.opponent(),
                    depth - 1,
                    -beta,
                    -alpha,
                    child_hash,
                    ply + 1,
                    width,
                )
            };

            if self.stopped {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
            alpha = alpha.max(score);
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt.store(hash, depth, best_score, bound, best_move);
        best_score
    }
}
