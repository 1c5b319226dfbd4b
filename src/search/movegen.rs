//! Candidate move generation and ordering
//!
//! Candidates are empty cells within [`RADIUS`] of a stone. They are
//! ordered by a cheap attack/defense score and then by scan order, so the
//! list is fully deterministic. Forbidden cells are filtered lazily while
//! taking from the ordered list.

use std::cmp::Reverse;

use crate::board::{Bitboard, Board, Pos, Stone, BOARD_SIZE, DIRECTIONS};
use crate::eval::{PatternScore, Shape};
use crate::rules::{is_five_len, is_forbidden, is_restricted, legal_moves};

/// Chebyshev distance from a stone that still counts as "near"
pub const RADIUS: i32 = 2;

/// Completes five
const WIN_PRIORITY: i32 = 4 * PatternScore::FIVE;
/// Best move from an earlier visit of this position
const HINT_PRIORITY: i32 = 3 * PatternScore::FIVE;

/// Empty cells within `RADIUS` of any stone, in scan order
pub fn neighborhood(board: &Board) -> Vec<Pos> {
    let mut near = Bitboard::new();
    for mv in board.occupied() {
        for dy in -RADIUS..=RADIUS {
            for dx in -RADIUS..=RADIUS {
                let cell = Pos::try_new(i32::from(mv.pos.x) + dx, i32::from(mv.pos.y) + dy);
                if let Some(p) = cell.filter(|&p| board.is_empty(p)) {
                    near.set(p);
                }
            }
        }
    }
    near.iter_ones().collect()
}

/// Ordered candidates for `color`, best first, at most `limit` of them.
///
/// `hint` (usually the transposition-table move) goes first unless a
/// winning move exists. When no cell near the stones is playable (empty
/// board, or every near cell forbidden) all legal cells are considered,
/// nearest to the center first.
pub fn ordered_moves(
    board: &Board,
    color: Stone,
    renju: bool,
    hint: Option<Pos>,
    limit: usize,
) -> Vec<Pos> {
    let mut scored: Vec<(i32, Pos)> = neighborhood(board)
        .into_iter()
        .map(|pos| {
            let score = score_move(board, pos, color, renju);
            if hint == Some(pos) {
                (score.max(HINT_PRIORITY), pos)
            } else {
                (score, pos)
            }
        })
        .collect();
    scored.sort_by_key(|&(score, pos)| (Reverse(score), pos));

    let restricted = is_restricted(color, renju);
    let moves: Vec<Pos> = scored
        .into_iter()
        .map(|(_, pos)| pos)
        .filter(|&pos| !restricted || is_forbidden(board, pos, color, renju).is_none())
        .take(limit)
        .collect();
    if !moves.is_empty() {
        return moves;
    }

    let mut fallback: Vec<Pos> = legal_moves(board, color, renju)
        .into_iter()
        .map(|mv| mv.pos)
        .collect();
    fallback.sort_by_key(|&pos| (center_distance(pos), pos));
    fallback.truncate(limit);
    fallback
}

/// Cheap ordering score: shapes made for `color` plus shapes blocked for
/// the opponent, read as solid runs through `pos`.
///
/// Runs past five count for neither side when that side is held to exact
/// fives: the cell is an overline it can never play.
pub fn score_move(board: &Board, pos: Pos, color: Stone, renju: bool) -> i32 {
    let opponent = color.opponent();
    let exact = is_restricted(color, renju);
    let opponent_exact = is_restricted(opponent, renju);
    let mut attack = 0;
    let mut defense = 0;

    for &(dx, dy) in &DIRECTIONS {
        let (len, open) = run_through(board, pos, color, dx, dy);
        if is_five_len(len, exact) {
            return WIN_PRIORITY;
        }
        if len < 5 {
            attack += Shape::classify(len, open, false).score();
        }

        let (len, open) = run_through(board, pos, opponent, dx, dy);
        if len < 5 || is_five_len(len, opponent_exact) {
            defense += Shape::classify(len, open, false).score();
        }
    }

    attack + defense * 9 / 10 + (BOARD_SIZE as i32 - center_distance(pos))
}

/// Run length through `pos` as if it held `color`, and how many of the
/// run's ends are empty
fn run_through(board: &Board, pos: Pos, color: Stone, dx: i32, dy: i32) -> (usize, u8) {
    let mut len = 1;
    let mut open = 0;
    for sign in [1, -1] {
        let mut k = 1;
        while let Some(p) = pos.offset(dx * sign, dy * sign, k) {
            match board.get(p) {
                s if s == color => len += 1,
                Stone::Empty => {
                    open += 1;
                    break;
                }
                _ => break,
            }
            k += 1;
        }
    }
    (len, open)
}

#[inline]
fn center_distance(pos: Pos) -> i32 {
    let c = Pos::center();
    (i32::from(pos.x) - i32::from(c.x)).abs() + (i32::from(pos.y) - i32::from(c.y)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TOTAL_CELLS;

    #[test]
    fn test_empty_board_prefers_center() {
        let board = Board::new();
        assert!(neighborhood(&board).is_empty());
        let moves = ordered_moves(&board, Stone::Black, true, None, 5);
        assert_eq!(moves[0], Pos::center());
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|&p| center_distance(p) <= 1));
    }

    #[test]
    fn test_neighborhood_radius() {
        let mut board = Board::new();
        board.place(Pos::center(), Stone::Black);
        let near = neighborhood(&board);
        assert_eq!(near.len(), 24);
        assert!(near.windows(2).all(|w| w[0] < w[1]), "scan order");

        let mut corner = Board::new();
        corner.place(Pos::new(0, 0), Stone::White);
        assert_eq!(neighborhood(&corner).len(), 8);
    }

    #[test]
    fn test_winning_move_first() {
        let mut board = Board::new();
        for x in 3..7 {
            board.place(Pos::new(x, 7), Stone::White);
        }
        board.place(Pos::new(2, 7), Stone::Black);
        let moves = ordered_moves(&board, Stone::White, true, Some(Pos::new(5, 5)), 10);
        assert_eq!(moves[0], Pos::new(7, 7));
        assert_eq!(moves[1], Pos::new(5, 5), "hint right after the win");
    }

    #[test]
    fn test_block_five_ranks_high() {
        let mut board = Board::new();
        for x in 3..7 {
            board.place(Pos::new(x, 7), Stone::White);
        }
        board.place(Pos::new(2, 7), Stone::Black);
        board.place(Pos::new(10, 10), Stone::Black);
        let moves = ordered_moves(&board, Stone::Black, true, None, 3);
        assert_eq!(moves[0], Pos::new(7, 7));
    }

    #[test]
    fn test_forbidden_cells_skipped() {
        let mut board = Board::new();
        for (x, y) in [(6, 7), (8, 7), (7, 6), (7, 8)] {
            board.place(Pos::new(x, y), Stone::Black);
        }
        board.place(Pos::new(0, 14), Stone::White);
        let moves = ordered_moves(&board, Stone::Black, true, Some(Pos::center()), 100);
        assert!(!moves.contains(&Pos::center()));
        let relaxed = ordered_moves(&board, Stone::Black, false, Some(Pos::center()), 100);
        assert_eq!(relaxed[0], Pos::center());
    }

    #[test]
    fn test_limit_and_determinism() {
        let mut board = Board::new();
        board.place(Pos::new(7, 7), Stone::Black);
        board.place(Pos::new(8, 8), Stone::White);
        let a = ordered_moves(&board, Stone::Black, true, None, 6);
        let b = ordered_moves(&board, Stone::Black, true, None, 6);
        assert_eq!(a.len(), 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_near_full_board_offers_remaining_cells() {
        let mut board = Board::new();
        let mut stone = Stone::Black;
        let keep = [Pos::new(0, 0), Pos::new(14, 14)];
        for idx in 0..TOTAL_CELLS {
            let pos = Pos::from_index(idx);
            if keep.contains(&pos) {
                continue;
            }
            board.place(pos, stone);
            stone = stone.opponent();
        }
        let moves = ordered_moves(&board, Stone::White, false, None, 10);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|p| keep.contains(p)));
    }

    #[test]
    fn test_overline_gap_not_a_block() {
        // xOOOO.Ox: Black can never fill the gap under renju
        let mut board = Board::new();
        board.place(Pos::new(1, 7), Stone::White);
        for x in 2..6 {
            board.place(Pos::new(x, 7), Stone::Black);
        }
        board.place(Pos::new(7, 7), Stone::Black);
        board.place(Pos::new(8, 7), Stone::White);
        let gap = Pos::new(6, 7);

        assert!(score_move(&board, gap, Stone::White, true) < PatternScore::CLOSED_TWO);
        assert!(score_move(&board, gap, Stone::White, false) > PatternScore::OPEN_FOUR);

        let moves = ordered_moves(&board, Stone::White, true, None, 5);
        assert!(!moves.contains(&gap), "{:?}", moves);
        let relaxed = ordered_moves(&board, Stone::White, false, None, 5);
        assert_eq!(relaxed[0], gap);
    }
}
