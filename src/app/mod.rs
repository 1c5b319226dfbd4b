//! Interactive drivers
//!
//! Each driver owns its session (or replica) and runs one loop over a
//! single event channel fed by a stdin thread and, for networked games, the
//! transport's receiver thread. Nothing else touches game state.

mod guest;
mod host;
mod input;
mod pvc;

use std::io::{self, Write};

use crate::cli::view::CLEAR;
use crate::cli::{help_text, render_frame, Command, Input, Notice, NoticeKind};
use crate::net::Incoming;
use crate::session::{
    ConfirmKind, GameStatus, GameView, MetaOutcome, MoveReport, Participant, Session, SessionError,
};

pub use guest::{run_join, JoinOptions};
pub use host::{run_host, HostOptions};
pub use pvc::{run_pvc, PvcOptions};

/// Everything a driver loop reacts to
#[derive(Debug)]
pub(crate) enum Event {
    Line(String),
    InputClosed,
    Net(Incoming),
}

pub(crate) fn draw(view: &impl GameView, opponent: &str, notice: Option<&Notice>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "{CLEAR}{}> ", render_frame(view, opponent, notice))?;
    out.flush()
}

pub(crate) fn describe_move(report: &MoveReport) -> String {
    match report.status {
        GameStatus::Won(stone) => format!("{} wins at {}", stone.symbol(), report.mv.pos),
        GameStatus::Draw => format!("{}, board is full: draw", report.mv.pos),
        GameStatus::Continue { .. } => report.mv.pos.to_string(),
    }
}

pub(crate) fn confirm_notice(kind: ConfirmKind) -> NoticeKind {
    match kind {
        ConfirmKind::Restart => NoticeKind::Restart,
        ConfirmKind::Undo => NoticeKind::Undo,
    }
}

/// Apply one parsed line from the local user to an authoritative session
pub(crate) fn apply_local(
    session: &mut Session,
    input: Input,
) -> Result<Option<Notice>, SessionError> {
    let me = Participant::Local;
    let notice = match input {
        Input::Nothing => return Ok(None),
        Input::Command(Command::Help) => Notice::info(help_text()),
        Input::Command(Command::Quit) => {
            session.propose_quit(me);
            Notice::new(NoticeKind::Quit, "Exiting...")
        }
        Input::Command(Command::Swap) => {
            let opening = session.propose_swap(me)?;
            let text = match opening {
                Some(report) => format!("Colors swapped, computer opens at {}", report.mv.pos),
                None => "Colors swapped".to_string(),
            };
            Notice::new(NoticeKind::Swap, text)
        }
        Input::Command(Command::Restart) => {
            let outcome = session.propose_restart(me)?;
            meta_notice(ConfirmKind::Restart, outcome)
        }
        Input::Command(Command::Undo) => {
            let outcome = session.propose_undo(me)?;
            meta_notice(ConfirmKind::Undo, outcome)
        }
        Input::Answer(accept) => {
            let resolution = session.respond_confirmation(me, accept)?;
            let text = if resolution.accepted { "Accepted" } else { "Declined" };
            Notice::new(confirm_notice(resolution.kind), text)
        }
        Input::Cell(pos) => {
            let outcome = session.play(me, pos)?;
            let mut text = describe_move(&outcome.played);
            if let Some(reply) = &outcome.reply {
                text = format!("{text}, computer {}", describe_move(reply));
            }
            Notice::new(NoticeKind::YouMove, text)
        }
    };
    Ok(Some(notice))
}

fn meta_notice(kind: ConfirmKind, outcome: MetaOutcome) -> Notice {
    let text = match outcome {
        MetaOutcome::Requested => "Requested, waiting for the opponent".to_string(),
        MetaOutcome::Applied { reply: Some(report) } => {
            format!("Done, computer opens at {}", report.mv.pos)
        }
        MetaOutcome::Applied { reply: None } => "Done".to_string(),
    };
    Notice::new(confirm_notice(kind), text)
}

/// Whether the local user is being asked to answer y/n
pub(crate) fn expecting_answer(view: &impl GameView) -> bool {
    view.phase()
        .pending()
        .is_some_and(|request| request.requester == Participant::Peer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::cli::parse_input;
    use crate::config::Level;

    #[test]
    fn test_apply_local_reports_errors_without_change() {
        let mut session = Session::two_player(true);
        let input = parse_input("8 8", false).unwrap();
        let notice = apply_local(&mut session, input).unwrap().unwrap();
        assert_eq!(notice.kind, NoticeKind::YouMove);
        assert_eq!(notice.text, "H8");

        let err = apply_local(&mut session, input).unwrap_err();
        assert!(err.to_string().contains("not your turn"));
        assert_eq!(session.board().move_count(), 1);
    }

    #[test]
    fn test_apply_local_against_computer() {
        let mut session = Session::single_player(Level::new(1).unwrap(), true);
        let notice = apply_local(&mut session, Input::Cell(Pos::new(7, 7)))
            .unwrap()
            .unwrap();
        assert!(notice.text.starts_with("H8, computer "));

        let notice = apply_local(&mut session, Input::Command(Command::Undo))
            .unwrap()
            .unwrap();
        assert_eq!(notice, Notice::new(NoticeKind::Undo, "Done"));
        assert!(session.board().is_board_empty());
    }

    #[test]
    fn test_expecting_answer_only_for_peer_requests() {
        let mut session = Session::two_player(true);
        session.play(Participant::Local, Pos::new(7, 7)).unwrap();
        session.propose_undo(Participant::Local).unwrap();
        assert!(!expecting_answer(&session));
        session.respond_confirmation(Participant::Peer, false).unwrap();
        session.propose_undo(Participant::Peer).unwrap();
        assert!(expecting_answer(&session));
    }
}
