//! Transposition table for caching search results
//!
//! The table stores search results indexed by Zobrist hash so transposed
//! move orders are searched once. It is owned by a single searcher and
//! cleared before every root search, which keeps each search a pure
//! function of its inputs.
//!
//! # Example
//!
//! ```
//! use gomoku::board::Pos;
//! use gomoku::search::{Bound, TranspositionTable};
//!
//! let mut tt = TranspositionTable::with_capacity(1 << 10);
//! tt.store(0x1234_5678, 3, 250, Bound::Exact, Some(Pos::new(7, 7)));
//!
//! assert_eq!(tt.probe(0x1234_5678, 3, -1000, 1000), Some(250));
//! assert_eq!(tt.best_move(0x1234_5678), Some(Pos::new(7, 7)));
//! ```

use crate::board::Pos;

/// How a stored score relates to the true value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// Score >= stored value (beta cutoff)
    Lower,
    /// Score <= stored value (failed low)
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    hash: u64,
    depth: u8,
    score: i32,
    bound: Bound,
    best_move: Option<Pos>,
}

/// Probe and store counters, reported in search diagnostics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

/// Direct-mapped transposition table with depth-preferred replacement
pub struct TranspositionTable {
    entries: Vec<Option<Entry>>,
    mask: usize,
    stats: TTStats,
}

impl TranspositionTable {
    /// Create a table with room for `capacity` entries, rounded up to a
    /// power of two
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let size = capacity.max(1024).next_power_of_two();
        Self {
            entries: vec![None; size],
            mask: size - 1,
            stats: TTStats::default(),
        }
    }

    #[inline]
    fn slot(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Score usable at `depth` within `(alpha, beta)`, if any
    pub fn probe(&mut self, hash: u64, depth: u8, alpha: i32, beta: i32) -> Option<i32> {
        self.stats.probes += 1;
        let entry = self.entries[self.slot(hash)].filter(|e| e.hash == hash)?;
        if entry.depth < depth {
            return None;
        }
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        if usable {
            self.stats.hits += 1;
            Some(entry.score)
        } else {
            None
        }
    }

    /// Best move from an earlier visit, for move ordering
    #[must_use]
    pub fn best_move(&self, hash: u64) -> Option<Pos> {
        self.entries[self.slot(hash)]
            .filter(|e| e.hash == hash)
            .and_then(|e| e.best_move)
    }

    /// Store a result. A slot is replaced when empty, holding the same
    /// position, or holding a shallower result.
    pub fn store(&mut self, hash: u64, depth: u8, score: i32, bound: Bound, best_move: Option<Pos>) {
        let idx = self.slot(hash);
        let replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.hash == hash || e.depth <= depth,
        };
        if replace {
            self.stats.stores += 1;
            self.entries[idx] = Some(Entry {
                hash,
                depth,
                score,
                bound,
                best_move,
            });
        }
    }

    /// Drop every entry and reset counters
    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
        self.stats = TTStats::default();
    }

    #[must_use]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
