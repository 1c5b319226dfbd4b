//! Line scanning along one axis
//!
//! Every rule question (win, overline, three, four) is answered on an
//! 11-cell window centred on the cell under test. The centre is always read
//! as the candidate stone, so a check never needs the stone to be on the
//! board and never mutates it.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

/// Cells on each side of the centre
const REACH: i32 = 5;
/// Window length
pub(crate) const WINDOW: usize = (2 * REACH + 1) as usize;
/// Index of the centre cell
pub(crate) const CENTER: usize = REACH as usize;

/// A cell as seen by one color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cell {
    Own,
    Empty,
    /// Opponent stone or off the board
    Blocked,
}

/// Window of cells through `pos` along `(dx, dy)`, with `pos` read as `color`
pub(crate) type Line = [Cell; WINDOW];

pub(crate) fn scan(board: &Board, pos: Pos, color: Stone, dx: i32, dy: i32) -> Line {
    let mut line = [Cell::Blocked; WINDOW];
    for (i, cell) in line.iter_mut().enumerate() {
        let k = i as i32 - REACH;
        if k == 0 {
            *cell = Cell::Own;
            continue;
        }
        *cell = match pos.offset(dx, dy, k) {
            None => Cell::Blocked,
            Some(p) => match board.get(p) {
                s if s == color => Cell::Own,
                Stone::Empty => Cell::Empty,
                _ => Cell::Blocked,
            },
        };
    }
    line
}

/// The four windows through `pos`
pub(crate) fn scan_all(board: &Board, pos: Pos, color: Stone) -> [Line; 4] {
    DIRECTIONS.map(|(dx, dy)| scan(board, pos, color, dx, dy))
}

/// Bounds `(start, end)` inclusive of the run of own stones through `i`.
/// `line[i]` must be `Own`.
#[inline]
pub(crate) fn run_bounds(line: &Line, i: usize) -> (usize, usize) {
    let mut start = i;
    while start > 0 && line[start - 1] == Cell::Own {
        start -= 1;
    }
    let mut end = i;
    while end + 1 < WINDOW && line[end + 1] == Cell::Own {
        end += 1;
    }
    (start, end)
}

#[inline]
pub(crate) fn run_len(line: &Line, i: usize) -> usize {
    let (start, end) = run_bounds(line, i);
    end - start + 1
}

/// Whether a run of `len` stones counts as five. Overlines only count
/// for colors the overline rule does not restrict.
#[inline]
pub(crate) fn is_five_len(len: usize, exact: bool) -> bool {
    if exact {
        len == 5
    } else {
        len >= 5
    }
}

/// Filling empty `e` makes a five that contains the centre
pub(crate) fn completes_five(line: &Line, e: usize, exact: bool) -> bool {
    if line[e] != Cell::Empty {
        return false;
    }
    let mut filled = *line;
    filled[e] = Cell::Own;
    let (start, end) = run_bounds(&filled, e);
    start <= CENTER && CENTER <= end && is_five_len(end - start + 1, exact)
}

/// Any empty cell of the window completes a five through the centre
pub(crate) fn is_four(line: &Line, exact: bool) -> bool {
    (0..WINDOW).any(|e| completes_five(line, e, exact))
}

/// Exactly four in a row through the centre, both ends empty, and both
/// ends complete a five: `.OOOO.`
pub(crate) fn is_straight_four(line: &Line, exact: bool) -> bool {
    let (start, end) = run_bounds(line, CENTER);
    if end - start + 1 != 4 || start == 0 || end + 1 >= WINDOW {
        return false;
    }
    completes_five(line, start - 1, exact) && completes_five(line, end + 1, exact)
}

/// One more stone in this window makes a straight four through the centre
pub(crate) fn is_open_three(line: &Line, exact: bool) -> bool {
    if is_four(line, exact) {
        return false;
    }
    (0..WINDOW).any(|e| {
        if line[e] != Cell::Empty {
            return false;
        }
        let mut filled = *line;
        filled[e] = Cell::Own;
        is_straight_four(&filled, exact)
    })
}

/// Count consecutive same-color stones through `(x, y)` along `(dx, dy)`,
/// and how many of the run's two ends are empty and on the board.
///
/// The color is the one on the cell; an empty cell gives `(0, 0)`.
pub fn line_run(board: &Board, pos: Pos, dx: i32, dy: i32) -> (usize, u8) {
    let color = board.get(pos);
    if color == Stone::Empty {
        return (0, 0);
    }
    let mut length = 1;
    let mut open_ends = 0;
    for sign in [1, -1] {
        let mut k = 1;
        loop {
            match pos.offset(dx * sign, dy * sign, k) {
                Some(p) if board.get(p) == color => {
                    length += 1;
                    k += 1;
                }
                Some(p) if board.get(p) == Stone::Empty => {
                    open_ends += 1;
                    break;
                }
                _ => break,
            }
        }
    }
    (length, open_ends)
}
