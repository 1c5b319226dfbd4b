//! Guest side of a networked game
//!
//! The guest never changes the board itself: it pre-checks input against
//! its [`Replica`], sends the request, and redraws when the host's
//! `StateSync` arrives.

use std::sync::mpsc::{self, Receiver};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::board::Stone;
use crate::cli::{help_text, parse_input, Command, Input, Notice, NoticeKind};
use crate::config::GameConfig;
use crate::net::{Incoming, Message, NetError, TcpTransport, Transport, PROTOCOL_VERSION};
use crate::session::{ConfirmKind, GameView, Replica, SessionError};

use super::host::HANDSHAKE_TIMEOUT;
use super::{confirm_notice, draw, expecting_answer, input, Event};

#[derive(Debug, Clone)]
pub struct JoinOptions {
    /// `host:port`
    pub addr: String,
    pub name: String,
}

pub fn run_join(opts: JoinOptions) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let net_tx = tx.clone();
    let mut link = TcpTransport::connect(&opts.addr, move |event| {
        net_tx.send(Event::Net(event)).is_ok()
    })
    .with_context(|| format!("failed to connect to {}", opts.addr))?;

    link.send(&Message::Hello {
        version: PROTOCOL_VERSION,
        name: opts.name.clone(),
    })?;
    let (host, config, stone) = await_welcome(&rx).context("handshake failed")?;
    info!(%host, renju = config.renju, "joined game");

    let mut replica = Replica::new(config, stone);
    input::spawn_stdin(tx);

    let mut notice = Some(Notice::new(NoticeKind::Swap, "Connected. Game ready."));
    draw(&replica, &host, notice.as_ref())?;

    while let Ok(event) = rx.recv() {
        notice = match event {
            Event::Line(line) => match local_request(&mut replica, &line) {
                Ok((msg, notice)) => {
                    if let Some(msg) = msg {
                        if let Err(err) = link.send(&msg) {
                            warn!(%err, "send failed");
                            replica.disconnect();
                        }
                    }
                    notice
                }
                Err(err) => Some(Notice::error(err)),
            },
            Event::InputClosed => {
                let _ = link.send(&Message::Quit);
                replica.quit();
                Some(Notice::new(NoticeKind::Quit, "Input closed"))
            }
            Event::Net(Incoming::Message(msg)) => host_message(&mut replica, msg).or(notice.take()),
            Event::Net(Incoming::Disconnected) => {
                replica.disconnect();
                Some(Notice::new(NoticeKind::Quit, "Host disconnected"))
            }
        };

        draw(&replica, &host, notice.as_ref())?;
        if replica.phase().is_final() {
            break;
        }
    }

    link.close();
    println!();
    Ok(())
}

fn await_welcome(rx: &Receiver<Event>) -> Result<(String, GameConfig, Stone)> {
    match rx.recv_timeout(HANDSHAKE_TIMEOUT) {
        Ok(Event::Net(Incoming::Message(Message::Welcome {
            version,
            name,
            config,
            your_stone,
        }))) => {
            if version != PROTOCOL_VERSION {
                return Err(NetError::VersionMismatch {
                    ours: PROTOCOL_VERSION,
                    theirs: version,
                }
                .into());
            }
            Ok((name, config, your_stone))
        }
        Ok(Event::Net(Incoming::Message(Message::Reject { reason }))) => {
            Err(NetError::Handshake(reason).into())
        }
        Ok(Event::Net(Incoming::Message(other))) => bail!("expected welcome, got {}", other.kind()),
        Ok(_) => Err(NetError::Closed.into()),
        Err(_) => bail!("no welcome within {}s", HANDSHAKE_TIMEOUT.as_secs()),
    }
}

/// Turn a line of input into a request for the host. Invalid requests are
/// refused locally and never sent.
fn local_request(
    replica: &mut Replica,
    line: &str,
) -> Result<(Option<Message>, Option<Notice>), String> {
    let input = parse_input(line, expecting_answer(replica)).map_err(|err| err.to_string())?;
    let refused = |err: SessionError| err.to_string();

    let sent = match input {
        Input::Nothing => return Ok((None, None)),
        Input::Command(Command::Help) => return Ok((None, Some(Notice::info(help_text())))),
        Input::Command(Command::Quit) => {
            replica.quit();
            (Message::Quit, Notice::new(NoticeKind::Quit, "Exiting..."))
        }
        Input::Command(Command::Swap) => {
            replica.check_swap().map_err(refused)?;
            (Message::SwapRequest, Notice::new(NoticeKind::Swap, "Requested"))
        }
        Input::Command(Command::Restart) => {
            replica.check_request(ConfirmKind::Restart).map_err(refused)?;
            (
                Message::RestartRequest,
                Notice::new(NoticeKind::Restart, "Requested, waiting for the host"),
            )
        }
        Input::Command(Command::Undo) => {
            replica.check_request(ConfirmKind::Undo).map_err(refused)?;
            (
                Message::UndoRequest,
                Notice::new(NoticeKind::Undo, "Requested, waiting for the host"),
            )
        }
        Input::Answer(accept) => {
            let kind = replica.check_answer().map_err(refused)?;
            let msg = match kind {
                ConfirmKind::Restart => Message::RestartResponse { accept },
                ConfirmKind::Undo => Message::UndoResponse { accept },
            };
            let text = if accept { "Accepted" } else { "Declined" };
            (msg, Notice::new(confirm_notice(kind), text))
        }
        Input::Cell(pos) => {
            replica.check_move(pos).map_err(refused)?;
            (
                Message::Move { x: pos.x, y: pos.y },
                Notice::new(NoticeKind::YouMove, pos.to_string()),
            )
        }
    };
    Ok((Some(sent.0), Some(sent.1)))
}

fn host_message(replica: &mut Replica, msg: Message) -> Option<Notice> {
    let notice = match msg {
        Message::StateSync(sync) => {
            let moves_before = replica.board().move_count();
            let stone_before = replica.my_stone();
            if let Err(err) = replica.apply_sync(sync) {
                return Some(Notice::error(err.to_string()));
            }
            if replica.my_stone() != stone_before {
                let text = format!("Colors swapped, you play {}", replica.my_stone().symbol());
                return Some(Notice::new(NoticeKind::Swap, text));
            }
            let last = replica.board().last_move()?;
            let grew = replica.board().move_count() > moves_before;
            if !grew || last.stone == replica.my_stone() {
                return None;
            }
            Notice::new(NoticeKind::OppMove, last.pos.to_string())
        }
        Message::SwapAck => Notice::new(NoticeKind::Swap, "Colors swapped"),
        Message::RestartRequest => Notice::new(NoticeKind::Restart, "Host asks to restart. Accept? (y/n)"),
        Message::UndoRequest => Notice::new(NoticeKind::Undo, "Host asks to undo. Accept? (y/n)"),
        Message::RestartResponse { accept } | Message::UndoResponse { accept } => {
            let verdict = if accept { "accepted" } else { "declined" };
            Notice::info(format!("Host {verdict}"))
        }
        Message::Quit => {
            replica.peer_quit();
            Notice::new(NoticeKind::Quit, "Host left")
        }
        Message::Reject { reason } => Notice::error(reason),
        other => {
            debug!(kind = other.kind(), "ignoring message");
            return None;
        }
    };
    Some(notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::net::StateSync;
    use crate::session::Phase;

    fn replica_to_move() -> Replica {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::White);
        replica
            .apply_sync(StateSync {
                history: vec![crate::board::Move::new(Pos::new(7, 7), Stone::Black)],
                phase: Phase::InProgress,
                turn: Stone::White,
                your_stone: Stone::White,
            })
            .unwrap();
        replica
    }

    #[test]
    fn test_local_move_becomes_request() {
        let mut replica = replica_to_move();
        let (msg, _) = local_request(&mut replica, "9 9").unwrap();
        assert_eq!(msg, Some(Message::Move { x: 8, y: 8 }));
        // The replica waits for the host before showing the stone
        assert!(replica.board().is_empty(Pos::new(8, 8)));
    }

    #[test]
    fn test_invalid_requests_stay_local() {
        let mut replica = replica_to_move();
        assert!(local_request(&mut replica, "H8").is_err());
        assert!(local_request(&mut replica, "/swap").is_err());
        assert!(local_request(&mut replica, "y").is_err());
        assert!(local_request(&mut replica, "/dance").is_err());
    }

    #[test]
    fn test_host_quit_ends_replica() {
        let mut replica = replica_to_move();
        let notice = host_message(&mut replica, Message::Quit).unwrap();
        assert_eq!(notice.kind, NoticeKind::Quit);
        assert!(replica.phase().is_final());
    }

    #[test]
    fn test_host_swap_shows_in_sync() {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::White);
        let sync = StateSync {
            history: Vec::new(),
            phase: Phase::Setup,
            turn: Stone::Black,
            your_stone: Stone::Black,
        };
        let notice = host_message(&mut replica, Message::StateSync(sync)).unwrap();
        assert_eq!(notice.kind, NoticeKind::Swap);
        assert_eq!(replica.my_stone(), Stone::Black);
    }
}
