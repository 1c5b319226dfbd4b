//! Human against the computer

use std::sync::mpsc;

use anyhow::Result;
use tracing::info;

use crate::cli::{parse_input, Notice, NoticeKind};
use crate::config::Level;
use crate::session::{GameView, Participant, Session};

use super::{apply_local, draw, expecting_answer, input, Event};

#[derive(Debug, Clone, Copy)]
pub struct PvcOptions {
    pub level: Level,
    pub renju: bool,
}

pub fn run_pvc(opts: PvcOptions) -> Result<()> {
    info!(level = %opts.level, renju = opts.renju, "starting game against the computer");
    let mut session = Session::single_player(opts.level, opts.renju);
    let opponent = format!("Computer Lv.{}", opts.level);

    let (tx, rx) = mpsc::channel();
    input::spawn_stdin(tx);

    let mut notice = Some(Notice::info("New game. Type /help for commands."));
    draw(&session, &opponent, notice.as_ref())?;

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
            Event::Net(_) => None,
        };

        draw(&session, &opponent, notice.as_ref())?;
        if session.phase().is_final() {
            break;
        }
    }
    println!();
    Ok(())
}
