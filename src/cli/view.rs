//! Text rendering of the board and the status line

use std::fmt::Write as _;

use crate::board::{Board, Pos, Stone, BOARD_SIZE};
use crate::session::{EndReason, GameView, Participant, Phase};

/// Kind tag shown in front of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
    YouMove,
    OppMove,
    Swap,
    Undo,
    Restart,
    Quit,
}

impl NoticeKind {
    fn tag(self) -> &'static str {
        match self {
            NoticeKind::Error => "ERR",
            NoticeKind::Info => "INFO",
            NoticeKind::YouMove => "YOU MOVE",
            NoticeKind::OppMove => "OPP MOVE",
            NoticeKind::Swap => "SWAP",
            NoticeKind::Undo => "UNDO",
            NoticeKind::Restart => "RESTART",
            NoticeKind::Quit => "QUIT",
        }
    }
}

/// One line of feedback between the board and the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, text)
    }

    pub fn render(&self) -> String {
        if self.text.is_empty() {
            format!("[{}]", self.kind.tag())
        } else {
            format!("[{}] {}", self.kind.tag(), self.text)
        }
    }
}

/// Grid with column letters and 1-based row numbers. The last move is
/// bracketed and a winning line is wrapped in parentheses.
pub fn render_board(board: &Board, winning: Option<[Pos; 5]>) -> String {
    let last = board.last_move().map(|mv| mv.pos);
    let mut out = String::from("    ");
    for x in 0..BOARD_SIZE as u8 {
        let _ = write!(out, " {} ", (b'A' + x) as char);
    }
    out.push('\n');

    for y in 0..BOARD_SIZE as u8 {
        let _ = write!(out, "{:>3} ", y + 1);
        for x in 0..BOARD_SIZE as u8 {
            let pos = Pos::new(x, y);
            let symbol = board.get(pos).symbol();
            let (open, close) = if Some(pos) == last {
                ('[', ']')
            } else if winning.is_some_and(|line| line.contains(&pos)) {
                ('(', ')')
            } else {
                (' ', ' ')
            };
            out.push(open);
            out.push(symbol);
            out.push(close);
        }
        out.push('\n');
    }
    out
}

/// Whose turn it is, or how the game ended, from this side's view
pub fn turn_indicator(view: &impl GameView) -> &'static str {
    match view.phase() {
        Phase::Ended(EndReason::Win(stone)) if *stone == view.my_stone() => "* YOU WON *",
        Phase::Ended(EndReason::Win(_)) => "* YOU LOST *",
        Phase::Ended(EndReason::Draw) => "DRAW",
        Phase::Ended(EndReason::Quit(Participant::Local)) => "YOU QUIT",
        Phase::Ended(EndReason::Quit(Participant::Peer)) => "OPPONENT QUIT",
        Phase::Ended(EndReason::Disconnected) => "DISCONNECTED",
        Phase::AwaitingConfirmation(request) if request.requester == Participant::Local => {
            "WAITING FOR ANSWER"
        }
        Phase::AwaitingConfirmation(_) => "ANSWER Y/N",
        Phase::Setup | Phase::InProgress if view.is_my_turn() => ">>> YOUR TURN <<<",
        Phase::Setup | Phase::InProgress => ">>> OPP TURN <<<",
    }
}

pub fn status_line(view: &impl GameView, opponent: &str) -> String {
    let me = view.my_stone();
    let them = if me == Stone::Empty { Stone::Empty } else { me.opponent() };
    let rules = if view.renju() { "renju" } else { "free" };
    format!(
        "{}   You: {}   Opponent: {} ({})   Rules: {}",
        turn_indicator(view),
        me.symbol(),
        them.symbol(),
        opponent,
        rules
    )
}

/// Everything drawn for one frame
pub fn render_frame(view: &impl GameView, opponent: &str, notice: Option<&Notice>) -> String {
    let mut out = render_board(view.board(), view.winning_line());
    out.push('\n');
    if let Some(notice) = notice {
        out.push_str(&notice.render());
    }
    out.push('\n');
    out.push_str(&status_line(view, opponent));
    out.push('\n');
    out
}

/// ANSI clear-screen and cursor-home
pub const CLEAR: &str = "\x1b[2J\x1b[H";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn test_board_header_and_rows() {
        let text = render_board(&Board::new(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), BOARD_SIZE + 1);
        assert!(lines[0].trim_start().starts_with("A "));
        assert!(lines[0].trim_end().ends_with('O'));
        assert!(lines[1].starts_with("  1 "));
        assert!(lines[15].starts_with(" 15 "));
    }

    #[test]
    fn test_last_move_is_bracketed() {
        let mut board = Board::new();
        board.place(Pos::new(0, 0), Stone::Black);
        board.place(Pos::new(7, 7), Stone::White);
        let text = render_board(&board, None);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains(" O "));
        assert!(lines[8].contains("[X]"));
        assert_eq!(text.matches('[').count(), 1);
    }

    #[test]
    fn test_status_line_reports_turn() {
        let mut session = Session::two_player(true);
        assert!(status_line(&session, "Guest").starts_with(">>> YOUR TURN <<<"));
        session.play(Participant::Local, Pos::new(7, 7)).unwrap();
        let line = status_line(&session, "Guest");
        assert!(line.starts_with(">>> OPP TURN <<<"));
        assert!(line.contains("You: O"));
        assert!(line.contains("Opponent: X (Guest)"));
    }

    #[test]
    fn test_notice_render() {
        assert_eq!(Notice::error("occupied").render(), "[ERR] occupied");
        assert_eq!(Notice::new(NoticeKind::Undo, "").render(), "[UNDO]");
    }
}
