//! Win condition checking
//!
//! Five in a row wins. Under renju the first-moving color (Black) must make
//! exactly five; a longer line is an overline and does not win. White, and
//! Black with renju off, also win with six or more.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

use super::line::{is_five_len, run_bounds, run_len, scan, scan_all, CENTER};

/// Whether the overline rule restricts this color
#[inline]
pub fn is_restricted(color: Stone, renju: bool) -> bool {
    renju && color == Stone::Black
}

/// Check whether a stone of `color` at `pos` makes five.
///
/// `pos` is read as holding `color` whether or not the stone has been
/// placed yet, so this works before and after applying the move.
pub fn is_win(board: &Board, pos: Pos, color: Stone, renju: bool) -> bool {
    if color == Stone::Empty {
        return false;
    }
    let exact = is_restricted(color, renju);
    scan_all(board, pos, color)
        .iter()
        .any(|line| is_five_len(run_len(line, CENTER), exact))
}

/// Longest run through `pos` over all four axes
pub fn longest_run(board: &Board, pos: Pos, color: Stone) -> usize {
    scan_all(board, pos, color)
        .iter()
        .map(|line| run_len(line, CENTER))
        .max()
        .unwrap_or(1)
}

/// Find the five winning cells through `pos`, ordered along the line.
///
/// For an unrestricted overline the first five cells of the run are given.
pub fn winning_line(board: &Board, pos: Pos, color: Stone, renju: bool) -> Option<[Pos; 5]> {
    if color == Stone::Empty {
        return None;
    }
    let exact = is_restricted(color, renju);
    for &(dx, dy) in &DIRECTIONS {
        let line = scan(board, pos, color, dx, dy);
        let (start, end) = run_bounds(&line, CENTER);
        if !is_five_len(end - start + 1, exact) {
            continue;
        }
        let first = start as i32 - CENTER as i32;
        let mut cells = [pos; 5];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = pos.offset(dx, dy, first + i as i32)?;
        }
        return Some(cells);
    }
    None
}
