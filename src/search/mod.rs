//! Search module for Gomoku AI
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Candidate generation and move ordering
//! - Alpha-Beta search with iterative deepening

pub mod alphabeta;
pub mod movegen;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{SearchLimits, SearchResult, SearchStats, Searcher, MATE};
pub use movegen::{neighborhood, ordered_moves};
pub use tt::{Bound, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
