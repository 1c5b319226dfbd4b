use super::*;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_stone_symbols() {
    assert_eq!(Stone::Black.symbol(), 'O');
    assert_eq!(Stone::White.symbol(), 'X');
    assert_eq!(Stone::Empty.symbol(), '.');
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center
    assert_eq!(pos.to_index(), 7 * 15 + 7);
    assert_eq!(pos.to_index(), 112);

    let pos2 = Pos::from_index(112);
    assert_eq!(pos2, Pos::center());
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(14, 14));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, -1));
    assert!(!Pos::is_valid(15, 0));
    assert!(!Pos::is_valid(0, 15));
    assert!(!Pos::new(15, 3).in_bounds());
    assert_eq!(Pos::try_new(3, 15), None);
}

#[test]
fn test_pos_display() {
    assert_eq!(Pos::new(7, 7).to_string(), "H8");
    assert_eq!(Pos::new(0, 0).to_string(), "A1");
    assert_eq!(Pos::new(14, 14).to_string(), "O15");
    assert_eq!(Pos::new(15, 0).to_string(), "(15,0)");
    assert_eq!(Pos::new(200, 255).to_string(), "(200,255)");
}

#[test]
fn test_pos_offset_stops_at_edge() {
    let corner = Pos::new(0, 0);
    assert_eq!(corner.offset(1, 1, 2), Some(Pos::new(2, 2)));
    assert_eq!(corner.offset(-1, 0, 1), None);
}

#[test]
fn test_board_constants() {
    assert_eq!(BOARD_SIZE, 15);
    assert_eq!(TOTAL_CELLS, 225);
}

#[test]
fn test_pos_ordering_is_scan_order() {
    let pos1 = Pos::new(0, 0);
    let pos2 = Pos::new(1, 0);
    let pos3 = Pos::new(0, 1);

    assert!(pos1 < pos2);
    assert!(pos2 < pos3);
}

#[test]
fn test_apply_and_undo() {
    let mut board = Board::new();
    board.place(Pos::new(7, 7), Stone::Black);
    assert_eq!(board.get(Pos::new(7, 7)), Stone::Black);
    assert_eq!(board.move_count(), 1);
    assert_eq!(board.stone_count(), 1);

    let mv = board.undo();
    assert_eq!(mv, Some(Move::new(Pos::new(7, 7), Stone::Black)));
    assert!(board.is_board_empty());
    assert_eq!(board.undo(), None);
}

#[test]
fn test_scoped_placement_reverts() {
    let mut board = Board::new();
    board.place(Pos::new(3, 3), Stone::White);
    let before = board.clone();
    {
        let guard = board.scoped(Move::new(Pos::new(4, 4), Stone::Black));
        assert_eq!(guard.get(Pos::new(4, 4)), Stone::Black);
        assert_eq!(guard.move_count(), 2);
    }
    assert_eq!(board, before);
}

#[test]
fn test_scoped_empty_stone_is_noop() {
    let mut board = Board::new();
    board.place(Pos::new(3, 3), Stone::White);
    let before = board.clone();
    drop(board.scoped(Move::new(Pos::new(4, 4), Stone::Empty)));
    assert_eq!(board, before);
}

#[test]
fn test_undo_is_perfect_inverse_random_games() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..20 {
        let mut cells: Vec<Pos> = (0..TOTAL_CELLS).map(Pos::from_index).collect();
        cells.shuffle(&mut rng);

        let mut board = Board::new();
        let mut stone = Stone::Black;
        let plies = rng.gen_range(1..80);
        for &pos in cells.iter().take(plies) {
            let snapshot = board.clone();
            board.place(pos, stone);
            board.undo();
            assert_eq!(board, snapshot, "undo must restore the exact prior board");
            board.place(pos, stone);
            stone = stone.opponent();
        }
    }
}

#[test]
fn test_full_board_and_clear() {
    let mut board = Board::new();
    let mut stone = Stone::Black;
    for idx in 0..TOTAL_CELLS {
        board.place(Pos::from_index(idx), stone);
        stone = stone.opponent();
    }
    assert!(board.is_full());
    assert_eq!(board.empty_cells().count(), 0);
    assert_eq!(board.occupied().count(), TOTAL_CELLS);

    board.clear();
    assert!(board.is_board_empty());
    assert_eq!(board.empty_cells().count(), TOTAL_CELLS);
}

#[test]
fn test_from_moves_replays_history() {
    let moves = [
        Move::new(Pos::new(7, 7), Stone::Black),
        Move::new(Pos::new(7, 8), Stone::White),
    ];
    let board = Board::from_moves(moves);
    assert_eq!(board.history(), &moves);
    assert_eq!(board.last_move(), Some(moves[1]));
}
