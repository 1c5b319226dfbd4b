//! Game rules for Gomoku with optional renju restrictions
//!
//! This module implements the rule set:
//! - Win conditions (five in a row; exact five for a restricted Black)
//! - Forbidden moves for Black under renju (overline, double-three, double-four)
//! - Legal move enumeration
//!
//! Every check reads the candidate stone virtually and leaves the board as it was.

mod line;

pub mod forbidden;
pub mod win;

pub use forbidden::{
    check_move, count_fours, count_open_fours, count_open_threes, is_forbidden, is_valid_move,
    legal_moves, ForbiddenKind, MoveCheck,
};
pub use line::line_run;
pub(crate) use line::is_five_len;
pub use win::{is_restricted, is_win, longest_run, winning_line};
