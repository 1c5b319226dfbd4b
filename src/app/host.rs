//! Host side of a networked game

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::cli::{parse_input, Notice, NoticeKind};
use crate::net::{Incoming, Message, NetError, TcpTransport, Transport, PROTOCOL_VERSION};
use crate::session::{GameView, Participant, PeerEvent, Session};

use super::{apply_local, confirm_notice, describe_move, draw, expecting_answer, input, Event};

pub(crate) const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HostOptions {
    pub port: u16,
    pub renju: bool,
    pub name: String,
}

pub fn run_host(opts: HostOptions) -> Result<()> {
    let mut session = Session::two_player(opts.renju);

    let (tx, rx) = mpsc::channel();
    let net_tx = tx.clone();
    println!("Listening on port {}, waiting for one opponent...", opts.port);
    let mut link = TcpTransport::listen_and_accept(&format!("0.0.0.0:{}", opts.port), move |event| {
        net_tx.send(Event::Net(event)).is_ok()
    })
    .context("failed to accept a guest")?;

    let guest = greet(&rx, &mut link, &session, &opts.name).context("handshake failed")?;
    info!(%guest, peer = %link.peer_addr(), "guest joined");
    input::spawn_stdin(tx);

    let mut notice = Some(Notice::new(NoticeKind::Swap, "Connected. Game ready."));
    draw(&session, &guest, notice.as_ref())?;

    while let Ok(event) = rx.recv() {
        notice = match event {
            Event::Line(line) => match parse_input(&line, expecting_answer(&session)) {
                Ok(input) => match apply_local(&mut session, input) {
                    Ok(notice) => notice,
                    Err(err) => Some(Notice::error(err.to_string())),
                },
                Err(err) => Some(Notice::error(err.to_string())),
            },
            Event::InputClosed => {
                session.propose_quit(Participant::Local);
                Some(Notice::new(NoticeKind::Quit, "Input closed"))
            }
            Event::Net(Incoming::Message(msg)) => peer_notice(&mut session, msg),
            Event::Net(Incoming::Disconnected) => {
                session.disconnect();
                Some(Notice::new(NoticeKind::Quit, "Opponent disconnected"))
            }
        };

        if let Err(err) = link.send_all(session.take_outbox()) {
            warn!(%err, "send failed");
            session.disconnect();
        }
        draw(&session, &guest, notice.as_ref())?;
        if session.phase().is_final() {
            break;
        }
    }

    link.close();
    println!();
    Ok(())
}

/// Wait for the guest's hello, then send the match settings and the
/// initial state. Returns the guest's name.
fn greet(
    rx: &Receiver<Event>,
    link: &mut TcpTransport,
    session: &Session,
    name: &str,
) -> Result<String> {
    let (version, guest) = match rx.recv_timeout(HANDSHAKE_TIMEOUT) {
        Ok(Event::Net(Incoming::Message(Message::Hello { version, name }))) => (version, name),
        Ok(Event::Net(Incoming::Message(other))) => {
            bail!("expected hello, got {}", other.kind())
        }
        Ok(_) => return Err(NetError::Closed.into()),
        Err(_) => bail!("no hello within {}s", HANDSHAKE_TIMEOUT.as_secs()),
    };

    if version != PROTOCOL_VERSION {
        let err = NetError::VersionMismatch {
            ours: PROTOCOL_VERSION,
            theirs: version,
        };
        link.send(&Message::Reject {
            reason: err.to_string(),
        })?;
        return Err(err.into());
    }

    link.send(&Message::Welcome {
        version: PROTOCOL_VERSION,
        name: name.to_string(),
        config: *session.config(),
        your_stone: session.stone_of(Participant::Peer),
    })?;
    link.send(&Message::StateSync(session.snapshot_for_peer()))?;
    Ok(guest)
}

fn peer_notice(session: &mut Session, msg: Message) -> Option<Notice> {
    let notice = match session.handle_peer(msg) {
        Ok(PeerEvent::Moved(report)) => Notice::new(NoticeKind::OppMove, describe_move(&report)),
        Ok(PeerEvent::Swapped) => Notice::new(NoticeKind::Swap, "Opponent swapped colors"),
        Ok(PeerEvent::Requested(kind)) => Notice::new(
            confirm_notice(kind),
            format!("Opponent asks to {kind}. Accept? (y/n)"),
        ),
        Ok(PeerEvent::Resolved(resolution)) => {
            let verdict = if resolution.accepted { "accepted" } else { "declined" };
            Notice::new(confirm_notice(resolution.kind), format!("Opponent {verdict}"))
        }
        Ok(PeerEvent::Quit) => Notice::new(NoticeKind::Quit, "Opponent left"),
        Err(err) => Notice::error(format!("opponent: {err}")),
    };
    Some(notice)
}
