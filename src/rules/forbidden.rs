//! Renju forbidden-move rules
//!
//! Under renju the first-moving color (Black) may not play:
//! - an overline (six or more in a row),
//! - a double-three (two or more open threes made by one stone),
//! - a double-four (two or more fours made by one stone).
//!
//! A stone that makes exactly five is never forbidden. White is never
//! restricted. All checks read the candidate stone virtually and only look
//! at lines through the candidate cell, so patterns elsewhere on the board
//! are never counted.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Pos, Stone};

use super::line::{is_four, is_open_three, is_straight_four, run_len, scan_all, CENTER};
use super::win::{is_restricted, is_win};

/// Which renju restriction a move breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForbiddenKind {
    Overline,
    DoubleThree,
    DoubleFour,
}

impl std::fmt::Display for ForbiddenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForbiddenKind::Overline => write!(f, "overline (6+)"),
            ForbiddenKind::DoubleThree => write!(f, "double-three (3-3)"),
            ForbiddenKind::DoubleFour => write!(f, "double-four (4-4)"),
        }
    }
}

/// Rule verdict for a stone on an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    /// Legal and the game goes on
    Legal,
    /// Legal and makes five
    Winning,
    /// Rejected by renju
    Forbidden(ForbiddenKind),
}

/// Five counts only when exact for Black (the color the counts below are
/// used for); White counts overlines.
#[inline]
fn exact_for(color: Stone) -> bool {
    color == Stone::Black
}

/// Count directions in which a stone of `color` at `pos` makes an open three
pub fn count_open_threes(board: &Board, color: Stone, pos: Pos) -> u8 {
    let exact = exact_for(color);
    scan_all(board, pos, color)
        .iter()
        .filter(|line| is_open_three(line, exact))
        .count() as u8
}

/// Count directions in which a stone of `color` at `pos` makes a straight
/// open four (`.OOOO.`)
pub fn count_open_fours(board: &Board, color: Stone, pos: Pos) -> u8 {
    let exact = exact_for(color);
    scan_all(board, pos, color)
        .iter()
        .filter(|line| is_straight_four(line, exact))
        .count() as u8
}

/// Count directions in which a stone of `color` at `pos` makes any four:
/// one more stone would complete five through `pos`. Includes straight,
/// closed and broken fours.
pub fn count_fours(board: &Board, color: Stone, pos: Pos) -> u8 {
    let exact = exact_for(color);
    scan_all(board, pos, color)
        .iter()
        .filter(|line| is_four(line, exact))
        .count() as u8
}

/// Check whether `color` at empty `pos` breaks a renju restriction.
///
/// Only applies when `renju` is on and `color` is Black. Priority:
/// exact five (never forbidden) > overline > double-three > double-four.
pub fn is_forbidden(board: &Board, pos: Pos, color: Stone, renju: bool) -> Option<ForbiddenKind> {
    if !is_restricted(color, renju) {
        return None;
    }
    if is_win(board, pos, color, renju) {
        return None;
    }

    let lines = scan_all(board, pos, color);
    if lines.iter().any(|line| run_len(line, CENTER) > 5) {
        return Some(ForbiddenKind::Overline);
    }
    if lines.iter().filter(|line| is_open_three(line, true)).count() >= 2 {
        return Some(ForbiddenKind::DoubleThree);
    }
    if lines.iter().filter(|line| is_four(line, true)).count() >= 2 {
        return Some(ForbiddenKind::DoubleFour);
    }
    None
}

/// Full rule verdict for `color` at `pos`. The cell must be empty.
pub fn check_move(board: &Board, pos: Pos, color: Stone, renju: bool) -> MoveCheck {
    debug_assert!(board.is_empty(pos));
    if is_win(board, pos, color, renju) {
        return MoveCheck::Winning;
    }
    match is_forbidden(board, pos, color, renju) {
        Some(kind) => MoveCheck::Forbidden(kind),
        None => MoveCheck::Legal,
    }
}

/// Check if a move is valid: empty cell and not forbidden
pub fn is_valid_move(board: &Board, pos: Pos, color: Stone, renju: bool) -> bool {
    pos.in_bounds() && board.is_empty(pos) && is_forbidden(board, pos, color, renju).is_none()
}

/// All empty cells `color` may play, in scan order
pub fn legal_moves(board: &Board, color: Stone, renju: bool) -> Vec<Move> {
    board
        .empty_cells()
        .filter(|&pos| is_forbidden(board, pos, color, renju).is_none())
        .map(|pos| Move::new(pos, color))
        .collect()
}
