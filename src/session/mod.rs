//! Session state machine
//!
//! A [`Session`] owns the authoritative board of one game and serializes
//! every mutation through `&mut self`: moves, swap, restart, undo and quit.
//! A refused operation returns a [`SessionError`] and leaves the session
//! exactly as it was.
//!
//! In single-player the computer is the [`Participant::Peer`] and answers
//! synchronously inside the call that hands it the turn. In two-player the
//! session is owned by the host; restart and undo wait for the other side's
//! answer, and everything the guest must learn is queued as [`Message`]s
//! (see [`Session::take_outbox`]). The guest keeps a [`Replica`] that only
//! changes through `StateSync`.
//!
//! ```
//! use gomoku::board::{Pos, Stone};
//! use gomoku::session::{GameStatus, GameView, Participant, Phase, Session};
//!
//! let mut session = Session::two_player(true);
//! let outcome = session.play(Participant::Local, Pos::new(7, 7))?;
//! assert_eq!(outcome.played.status, GameStatus::Continue { next: Stone::White });
//! assert_eq!(session.phase(), &Phase::InProgress);
//!
//! // Not the host's turn any more
//! assert!(session.play(Participant::Local, Pos::new(8, 8)).is_err());
//! # Ok::<(), gomoku::session::SessionError>(())
//! ```

mod error;
mod phase;
mod replica;


use std::collections::VecDeque;

use tracing::{debug, info, instrument, warn};

use crate::board::{Board, Move, Pos, Stone};
use crate::config::{GameConfig, Level};
use crate::engine::AIEngine;
use crate::net::{Message, StateSync};
use crate::rules::{is_forbidden, is_win, winning_line};

pub use error::{Action, IllegalReason, SessionError};
pub use phase::{ConfirmKind, EndReason, Participant, PendingRequest, Phase};
pub use replica::Replica;

/// What a move did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Continue { next: Stone },
    Won(Stone),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub mv: Move,
    pub status: GameStatus,
}

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub played: MoveReport,
    /// The computer's answer in single-player
    pub reply: Option<MoveReport>,
}

/// Result of a restart or undo proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaOutcome {
    /// Waiting for the other side's answer
    Requested,
    /// Applied at once; `reply` is the computer's opening move after a restart
    Applied { reply: Option<MoveReport> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub kind: ConfirmKind,
    pub accepted: bool,
}

/// What a peer message did, for the host's display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerEvent {
    Moved(MoveReport),
    Swapped,
    Requested(ConfirmKind),
    Resolved(Resolution),
    Quit,
}

/// Read access shared by the authoritative session and the guest replica
pub trait GameView {
    fn board(&self) -> &Board;
    fn phase(&self) -> &Phase;
    fn renju(&self) -> bool;
    /// Stone played by this process's user
    fn my_stone(&self) -> Stone;

    /// Black moves first, then colors alternate
    fn turn(&self) -> Stone {
        if self.board().move_count() % 2 == 0 {
            Stone::Black
        } else {
            Stone::White
        }
    }

    fn is_my_turn(&self) -> bool {
        self.phase().accepts_moves() && self.turn() == self.my_stone()
    }

    /// The five stones of a finished game, if it was won
    fn winning_line(&self) -> Option<[Pos; 5]> {
        let Phase::Ended(EndReason::Win(stone)) = self.phase() else {
            return None;
        };
        let last = self.board().last_move()?;
        winning_line(self.board(), last.pos, *stone, self.renju())
    }
}

enum Opponent {
    Computer(Box<AIEngine>),
    Remote { outbox: VecDeque<Message> },
}

pub struct Session {
    config: GameConfig,
    board: Board,
    phase: Phase,
    /// Who holds the first-moving stone
    black: Participant,
    opponent: Opponent,
}

impl Session {
    /// Human against the computer; the human starts with Black
    pub fn single_player(level: Level, renju: bool) -> Self {
        Self {
            config: GameConfig::single_player(level, renju),
            board: Board::new(),
            phase: Phase::Setup,
            black: Participant::Local,
            opponent: Opponent::Computer(Box::new(AIEngine::new(level, renju))),
        }
    }

    /// Host side of a networked game; the host starts with Black
    pub fn two_player(renju: bool) -> Self {
        Self {
            config: GameConfig::two_player(renju),
            board: Board::new(),
            phase: Phase::Setup,
            black: Participant::Local,
            opponent: Opponent::Remote {
                outbox: VecDeque::new(),
            },
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_single_player(&self) -> bool {
        matches!(self.opponent, Opponent::Computer(_))
    }

    pub fn stone_of(&self, who: Participant) -> Stone {
        if who == self.black {
            Stone::Black
        } else {
            Stone::White
        }
    }

    pub fn holder_of(&self, stone: Stone) -> Participant {
        if stone == Stone::Black {
            self.black
        } else {
            self.black.other()
        }
    }

    /// Messages queued for the peer since the last call, oldest first
    pub fn take_outbox(&mut self) -> Vec<Message> {
        match &mut self.opponent {
            Opponent::Remote { outbox } => outbox.drain(..).collect(),
            Opponent::Computer(_) => Vec::new(),
        }
    }

    /// Full state as the peer should see it
    pub fn snapshot_for_peer(&self) -> StateSync {
        StateSync {
            history: self.board.history().to_vec(),
            phase: self.phase.for_peer(),
            turn: self.turn(),
            your_stone: self.stone_of(Participant::Peer),
        }
    }

    // ------------------------------------------------------------------
    // Moves
    // ------------------------------------------------------------------

    /// Play `color` at `pos`.
    ///
    /// On success the move is applied and checked for a win or draw. In
    /// single-player, if the computer is to move next, its reply is played
    /// before returning.
    pub fn propose_move(&mut self, color: Stone, pos: Pos) -> Result<Outcome, SessionError> {
        self.validate_move(color, pos)?;
        let played = self.apply_move(color, pos);
        let reply = match played.status {
            GameStatus::Continue { next } if self.is_computer(next) => self.computer_move()?,
            _ => None,
        };
        self.sync_peer();
        Ok(Outcome { played, reply })
    }

    /// Play for a participant with the stone they hold
    pub fn play(&mut self, by: Participant, pos: Pos) -> Result<Outcome, SessionError> {
        self.propose_move(self.stone_of(by), pos)
    }

    fn validate_move(&self, color: Stone, pos: Pos) -> Result<(), SessionError> {
        if !self.phase.accepts_moves() {
            return Err(self.refuse(Action::Move));
        }
        if color != self.turn() {
            return Err(SessionError::IllegalMove(IllegalReason::WrongTurn));
        }
        if !pos.in_bounds() {
            return Err(SessionError::IllegalMove(IllegalReason::OutOfBounds));
        }
        if !self.board.is_empty(pos) {
            return Err(SessionError::IllegalMove(IllegalReason::Occupied));
        }
        if let Some(kind) = is_forbidden(&self.board, pos, color, self.config.renju) {
            return Err(SessionError::ForbiddenMove { kind });
        }
        Ok(())
    }

    fn apply_move(&mut self, color: Stone, pos: Pos) -> MoveReport {
        let mv = Move::new(pos, color);
        self.board.apply(mv);

        let next = color.opponent();
        let status = if is_win(&self.board, pos, color, self.config.renju) {
            GameStatus::Won(color)
        } else if !self.has_legal_move(next) {
            GameStatus::Draw
        } else {
            GameStatus::Continue { next }
        };

        self.phase = match status {
            GameStatus::Won(stone) => Phase::Ended(EndReason::Win(stone)),
            GameStatus::Draw => Phase::Ended(EndReason::Draw),
            GameStatus::Continue { .. } => Phase::InProgress,
        };

        debug!(%pos, stone = ?color, moves = self.board.move_count(), "move applied");
        if self.phase.is_ended() {
            info!(phase = %self.phase, "game over");
        }
        MoveReport { mv, status }
    }

    fn has_legal_move(&self, color: Stone) -> bool {
        self.board
            .empty_cells()
            .any(|pos| is_forbidden(&self.board, pos, color, self.config.renju).is_none())
    }

    fn is_computer(&self, stone: Stone) -> bool {
        self.is_single_player() && self.holder_of(stone) == Participant::Peer
    }

    /// Let the computer play for the side to move
    fn computer_move(&mut self) -> Result<Option<MoveReport>, SessionError> {
        let color = self.turn();
        let Opponent::Computer(engine) = &mut self.opponent else {
            return Ok(None);
        };
        let result = engine.choose_move(&self.board, color)?;
        self.validate_move(color, result.best_move)?;
        Ok(Some(self.apply_move(color, result.best_move)))
    }

    // ------------------------------------------------------------------
    // Meta actions
    // ------------------------------------------------------------------

    /// Exchange which participant holds Black. Only before the first move.
    ///
    /// In single-player, when the computer ends up with Black it opens at
    /// once and its move is returned.
    #[instrument(skip(self))]
    pub fn propose_swap(&mut self, by: Participant) -> Result<Option<MoveReport>, SessionError> {
        if self.phase != Phase::Setup || !self.board.is_board_empty() {
            return Err(self.refuse(Action::Swap));
        }
        self.black = self.black.other();
        info!(black = ?self.black, "roles swapped");

        if by == Participant::Peer {
            self.push(Message::SwapAck);
        }
        let reply = if self.is_computer(Stone::Black) {
            self.computer_move()?
        } else {
            None
        };
        self.sync_peer();
        Ok(reply)
    }

    /// Ask to restart. Applied at once in single-player.
    #[instrument(skip(self))]
    pub fn propose_restart(&mut self, by: Participant) -> Result<MetaOutcome, SessionError> {
        let allowed = match &self.phase {
            Phase::Setup | Phase::InProgress => true,
            Phase::Ended(_) => !self.phase.is_final(),
            Phase::AwaitingConfirmation(_) => false,
        };
        if !allowed {
            return Err(self.refuse(Action::Restart));
        }

        if self.is_single_player() {
            self.reset();
            let reply = if self.is_computer(Stone::Black) {
                self.computer_move()?
            } else {
                None
            };
            return Ok(MetaOutcome::Applied { reply });
        }
        self.request(ConfirmKind::Restart, by);
        Ok(MetaOutcome::Requested)
    }

    /// Ask to take back a move. Applied at once in single-player, where it
    /// rolls back to the human's previous turn.
    #[instrument(skip(self))]
    pub fn propose_undo(&mut self, by: Participant) -> Result<MetaOutcome, SessionError> {
        if self.phase != Phase::InProgress {
            return Err(self.refuse(Action::Undo));
        }

        if self.is_single_player() {
            let human = self.stone_of(Participant::Local);
            if !self.board.history().iter().any(|mv| mv.stone == human) {
                return Err(self.refuse(Action::Undo));
            }
            while let Some(mv) = self.board.undo() {
                if mv.stone == human {
                    break;
                }
            }
            self.phase = self.resume_phase();
            info!(moves = self.board.move_count(), "undo applied");
            return Ok(MetaOutcome::Applied { reply: None });
        }
        self.request(ConfirmKind::Undo, by);
        Ok(MetaOutcome::Requested)
    }

    fn request(&mut self, kind: ConfirmKind, by: Participant) {
        let resume = std::mem::replace(&mut self.phase, Phase::InProgress);
        self.phase = Phase::AwaitingConfirmation(PendingRequest {
            kind,
            requester: by,
            resume: Box::new(resume),
        });
        info!(%kind, requester = ?by, "confirmation requested");

        if by == Participant::Local {
            self.push(match kind {
                ConfirmKind::Restart => Message::RestartRequest,
                ConfirmKind::Undo => Message::UndoRequest,
            });
        }
        self.sync_peer();
    }

    /// Answer the pending restart or undo. Only the side that did not ask
    /// may answer.
    #[instrument(skip(self))]
    pub fn respond_confirmation(
        &mut self,
        by: Participant,
        accept: bool,
    ) -> Result<Resolution, SessionError> {
        let request = match std::mem::replace(&mut self.phase, Phase::InProgress) {
            Phase::AwaitingConfirmation(request) if request.requester != by => request,
            other => {
                self.phase = other;
                return Err(self.refuse(Action::Answer));
            }
        };

        if accept {
            match request.kind {
                ConfirmKind::Undo => {
                    self.board.undo();
                    self.phase = self.resume_phase();
                }
                ConfirmKind::Restart => self.reset(),
            }
        } else {
            self.phase = *request.resume;
        }
        info!(kind = %request.kind, accept, "confirmation resolved");

        if by == Participant::Local {
            self.push(match request.kind {
                ConfirmKind::Restart => Message::RestartResponse { accept },
                ConfirmKind::Undo => Message::UndoResponse { accept },
            });
        }
        self.sync_peer();
        Ok(Resolution {
            kind: request.kind,
            accepted: accept,
        })
    }

    /// End the session. Always honored, even while a confirmation is pending.
    #[instrument(skip(self))]
    pub fn propose_quit(&mut self, by: Participant) {
        if self.phase.is_final() {
            return;
        }
        self.phase = Phase::Ended(EndReason::Quit(by));
        info!("session quit");
        if by == Participant::Local {
            self.push(Message::Quit);
        }
    }

    /// The connection to the peer is gone; nothing more will be accepted
    pub fn disconnect(&mut self) {
        if self.phase.is_final() {
            return;
        }
        warn!("peer disconnected");
        self.phase = Phase::Ended(EndReason::Disconnected);
    }

    /// Apply a request from the guest.
    ///
    /// A refused request is answered with `Reject` so the guest learns why.
    pub fn handle_peer(&mut self, msg: Message) -> Result<PeerEvent, SessionError> {
        let peer = Participant::Peer;
        let result = match msg {
            Message::Move { x, y } => self
                .play(peer, Pos::new(x, y))
                .map(|outcome| PeerEvent::Moved(outcome.played)),
            Message::SwapRequest => self.propose_swap(peer).map(|_| PeerEvent::Swapped),
            Message::RestartRequest => self
                .propose_restart(peer)
                .map(|_| PeerEvent::Requested(ConfirmKind::Restart)),
            Message::UndoRequest => self
                .propose_undo(peer)
                .map(|_| PeerEvent::Requested(ConfirmKind::Undo)),
            Message::RestartResponse { accept } => self.answer(peer, ConfirmKind::Restart, accept),
            Message::UndoResponse { accept } => self.answer(peer, ConfirmKind::Undo, accept),
            Message::Quit => {
                self.propose_quit(peer);
                Ok(PeerEvent::Quit)
            }
            other => Err(SessionError::UnexpectedMessage(other.kind().to_string())),
        };

        if let Err(err) = &result {
            warn!(%err, "refused peer request");
            self.push(Message::Reject {
                reason: err.to_string(),
            });
        }
        result
    }

    fn answer(
        &mut self,
        by: Participant,
        kind: ConfirmKind,
        accept: bool,
    ) -> Result<PeerEvent, SessionError> {
        if self.phase.pending().map(|request| request.kind) != Some(kind) {
            return Err(self.refuse(Action::Answer));
        }
        self.respond_confirmation(by, accept).map(PeerEvent::Resolved)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn reset(&mut self) {
        self.board.clear();
        self.phase = Phase::Setup;
        info!(black = ?self.black, "game restarted");
    }

    fn resume_phase(&self) -> Phase {
        if self.board.is_board_empty() {
            Phase::Setup
        } else {
            Phase::InProgress
        }
    }

    fn refuse(&self, action: Action) -> SessionError {
        if self.phase == Phase::Ended(EndReason::Disconnected) {
            return SessionError::TransportFailure("peer disconnected".to_string());
        }
        SessionError::InvalidPhaseAction {
            action,
            phase: self.phase.clone(),
        }
    }

    fn push(&mut self, msg: Message) {
        if let Opponent::Remote { outbox } = &mut self.opponent {
            outbox.push_back(msg);
        }
    }

    fn sync_peer(&mut self) {
        if !self.is_single_player() {
            let sync = self.snapshot_for_peer();
            self.push(Message::StateSync(sync));
        }
    }
}

impl GameView for Session {
    fn board(&self) -> &Board {
        &self.board
    }

    fn phase(&self) -> &Phase {
        &self.phase
    }

    fn renju(&self) -> bool {
        self.config.renju
    }

    fn my_stone(&self) -> Stone {
        self.stone_of(Participant::Local)
    }
}
