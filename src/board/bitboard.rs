//! One bit per cell for occupancy sets

use super::{Pos, TOTAL_CELLS};

/// `u64` words needed to cover the board (225 cells in 4 words)
const WORDS: usize = TOTAL_CELLS.div_ceil(64);

/// Valid bits of the last word. Bits above it never map to a cell and are
/// never set, so every set bit is a board position.
const LAST_WORD_MASK: u64 = match TOTAL_CELLS % 64 {
    0 => u64::MAX,
    used => (1u64 << used) - 1,
};

/// Word index and bit mask of a cell
#[inline]
fn locate(pos: Pos) -> (usize, u64) {
    let idx = pos.to_index();
    (idx / 64, 1u64 << (idx % 64))
}

/// Set of board cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    words: [u64; WORDS],
}

impl Bitboard {
    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    #[inline]
    pub fn set(&mut self, pos: Pos) {
        let (word, mask) = locate(pos);
        self.words[word] |= mask;
    }

    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        let (word, mask) = locate(pos);
        self.words[word] &= !mask;
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        let (word, mask) = locate(pos);
        self.words[word] & mask != 0
    }

    /// Number of cells in the set
    #[inline]
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words == [0; WORDS]
    }

    /// Cells in scan order, row by row
    pub fn iter_ones(&self) -> Ones {
        debug_assert_eq!(self.words[WORDS - 1] & !LAST_WORD_MASK, 0);
        Ones {
            words: self.words,
            word: 0,
        }
    }
}

/// Iterator over the cells of a [`Bitboard`]
pub struct Ones {
    words: [u64; WORDS],
    word: usize,
}

impl Iterator for Ones {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        while self.word < WORDS {
            let bits = &mut self.words[self.word];
            if *bits != 0 {
                let idx = self.word * 64 + bits.trailing_zeros() as usize;
                *bits &= *bits - 1;
                return Some(Pos::from_index(idx));
            }
            self.word += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left: u32 = self.words[self.word.min(WORDS)..]
            .iter()
            .map(|w| w.count_ones())
            .sum();
        (left as usize, Some(left as usize))
    }
}

impl ExactSizeIterator for Ones {}
