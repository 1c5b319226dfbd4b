//! Heuristic evaluation function for Gomoku board positions
//!
//! This module provides the static evaluation used at the search horizon.
//! It evaluates board positions based on:
//! - Five detection
//! - Tempo threats (a four for the side to move wins; an open four or two
//!   fours for the other side cannot be stopped)
//! - Pattern scoring (fours, threes, twos and their combinations)
//! - Positional bonuses (center control)

use crate::board::{Board, Pos, Stone, BOARD_SIZE, DIRECTIONS};
use crate::rules::is_restricted;

use super::patterns::{PatternScore, Shape};

/// Score of a position the side to move wins by force next turn
pub const FORCED_WIN: i32 = PatternScore::FIVE / 2;

/// Maximum Manhattan distance from center on a 15x15 board
const MAX_CENTER_DIST: i32 = 14;

/// Weight per distance unit from center
const POSITION_WEIGHT: i32 = 3;

/// Shape counts and pattern score for one color
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub score: i32,
    pub fives: u32,
    pub open_fours: u32,
    pub fours: u32,
    pub open_threes: u32,
}

impl Tally {
    /// Any shape that makes five with one more stone
    #[inline]
    pub fn has_four(&self) -> bool {
        self.open_fours + self.fours > 0
    }

    /// Threat the opponent can no longer block with a single stone
    #[inline]
    pub fn is_unstoppable(&self) -> bool {
        self.open_fours > 0 || self.fours >= 2
    }
}

/// Evaluate the board from the perspective of `to_move`, the side about to play.
///
/// Returns a score where:
/// - `PatternScore::FIVE` / `-PatternScore::FIVE` mean a five is on the board
/// - `FORCED_WIN` means `to_move` has a four and completes five next
/// - `-FORCED_WIN` means the opponent has a threat that cannot be blocked
/// - anything else is the pattern and position difference
///
/// With `renju` on, a Black four only counts while some cell still
/// completes it to exactly five.
///
/// For quiet positions (no fours or fives) the score is symmetric:
/// `evaluate(board, Black, renju) == -evaluate(board, White, renju)`.
#[must_use]
pub fn evaluate(board: &Board, to_move: Stone, renju: bool) -> i32 {
    let opponent = to_move.opponent();
    let mine = tally(board, to_move, renju);
    let theirs = tally(board, opponent, renju);

    if mine.fives > 0 {
        return PatternScore::FIVE;
    }
    if theirs.fives > 0 {
        return -PatternScore::FIVE;
    }
    if mine.has_four() {
        return FORCED_WIN;
    }
    if theirs.is_unstoppable() {
        return -FORCED_WIN;
    }

    let pattern_score = mine.score - theirs.score;
    let position_score = evaluate_positions(board, to_move) - evaluate_positions(board, opponent);
    pattern_score + position_score
}

/// Count shapes for a color.
///
/// Scans all stones of the color in all four directions. Each segment is
/// read once, from the stone with no same-color neighbor behind it.
/// Combinations the opponent cannot block with one stone earn an extra
/// open-four bonus.
pub fn tally(board: &Board, color: Stone, renju: bool) -> Tally {
    let mut tally = Tally::default();
    let Some(stones) = board.stones(color) else {
        return tally;
    };
    let restricted = is_restricted(color, renju);

    for pos in stones.iter_ones() {
        for &(dx, dy) in &DIRECTIONS {
            let segment = evaluate_line(board, pos, dx, dy, color);
            let shape = if restricted {
                segment.restricted_shape(board, color)
            } else {
                segment.shape
            };
            tally.score += shape.score();
            match shape {
                Shape::Five => tally.fives += 1,
                Shape::OpenFour => tally.open_fours += 1,
                Shape::Four => tally.fours += 1,
                Shape::OpenThree => tally.open_threes += 1,
                _ => {}
            }
        }
    }

    if tally.open_fours >= 1 && (tally.fours >= 1 || tally.open_threes >= 1) {
        tally.score += PatternScore::OPEN_FOUR;
    }
    if tally.fours >= 2 {
        tally.score += PatternScore::OPEN_FOUR;
    }
    if tally.fours >= 1 && tally.open_threes >= 1 {
        tally.score += PatternScore::OPEN_FOUR;
    }
    if tally.open_threes >= 2 {
        tally.score += PatternScore::OPEN_FOUR;
    }
    tally
}

/// One segment of a line, read from its first stone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    shape: Shape,
    count: usize,
    /// Axis the segment lies on
    dir: (i32, i32),
    /// Empty cells bordering the segment: back end, gap, front end
    completions: [Option<Pos>; 3],
}

impl Segment {
    const NONE: Segment = Segment {
        shape: Shape::None,
        count: 0,
        dir: (0, 0),
        completions: [None, None, None],
    };

    /// Shape for a color held to exact fives: a four counts once per cell
    /// that makes exactly five along the segment, and is dead without one.
    fn restricted_shape(&self, board: &Board, color: Stone) -> Shape {
        match self.shape {
            Shape::Five if self.count != 5 => Shape::None,
            Shape::Four | Shape::OpenFour => {
                let live = self
                    .completions
                    .iter()
                    .flatten()
                    .filter(|&&cell| run_if_placed(board, cell, color, self.dir) == 5)
                    .count();
                match live {
                    0 => Shape::None,
                    1 => Shape::Four,
                    _ => Shape::OpenFour,
                }
            }
            shape => shape,
        }
    }
}

/// Read the segment starting at `pos` along `(dx, dy)`, allowing one gap.
///
/// Returns `Segment::NONE` when `pos` is not the first stone of its segment.
fn evaluate_line(board: &Board, pos: Pos, dx: i32, dy: i32, color: Stone) -> Segment {
    let behind = pos.offset(dx, dy, -1);
    let back = behind.map(|p| board.get(p));
    if back == Some(color) {
        return Segment::NONE;
    }

    let back_end = behind.filter(|_| back == Some(Stone::Empty));
    let mut front_end = None;
    let mut gap = None;
    let mut count = 1;
    let mut k = 1;
    while let Some(p) = pos.offset(dx, dy, k) {
        match board.get(p) {
            s if s == color => count += 1,
            Stone::Empty => {
                let next = pos.offset(dx, dy, k + 1).map(|n| board.get(n));
                if gap.is_none() && next == Some(color) {
                    gap = Some(p);
                } else {
                    front_end = Some(p);
                    break;
                }
            }
            _ => break,
        }
        k += 1;
    }

    let open_ends = u8::from(back_end.is_some()) + u8::from(front_end.is_some());
    Segment {
        shape: Shape::classify(count, open_ends, gap.is_some()),
        count,
        dir: (dx, dy),
        completions: [back_end, gap, front_end],
    }
}

/// Length of the run through `cell` along `dir` if it held `color`
fn run_if_placed(board: &Board, cell: Pos, color: Stone, (dx, dy): (i32, i32)) -> usize {
    let mut len = 1;
    for sign in [1, -1] {
        let mut k = 1;
        while cell
            .offset(dx * sign, dy * sign, k)
            .is_some_and(|p| board.get(p) == color)
        {
            len += 1;
            k += 1;
        }
    }
    len
}

/// Stones closer to the center are worth more
fn evaluate_positions(board: &Board, color: Stone) -> i32 {
    let Some(stones) = board.stones(color) else {
        return 0;
    };

    let center = (BOARD_SIZE / 2) as i32;
    stones
        .iter_ones()
        .map(|pos| {
            let dist = (i32::from(pos.x) - center).abs() + (i32::from(pos.y) - center).abs();
            (MAX_CENTER_DIST - dist) * POSITION_WEIGHT
        })
        .sum()
}
