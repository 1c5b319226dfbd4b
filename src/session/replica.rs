//! Guest-side mirror of the host's session

use tracing::{debug, warn};

use crate::board::{Board, Pos, Stone};
use crate::config::GameConfig;
use crate::net::StateSync;
use crate::rules::is_forbidden;

use super::{Action, ConfirmKind, EndReason, GameView, IllegalReason, Participant, Phase, SessionError};

/// The guest's copy of the game.
///
/// The board and phase only change through [`Replica::apply_sync`]; the
/// `check_*` methods pre-validate local input before it is sent to the host,
/// which stays the only authority.
#[derive(Debug, Clone)]
pub struct Replica {
    config: GameConfig,
    board: Board,
    phase: Phase,
    my_stone: Stone,
}

impl Replica {
    pub fn new(config: GameConfig, my_stone: Stone) -> Self {
        Self {
            config,
            board: Board::new(),
            phase: Phase::Setup,
            my_stone,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Replace local state with the host's.
    ///
    /// The history is replayed cell by cell; a history that overlaps itself
    /// or leaves the board is refused and the replica is left unchanged.
    pub fn apply_sync(&mut self, sync: StateSync) -> Result<(), SessionError> {
        let mut board = Board::new();
        for mv in &sync.history {
            if !mv.pos.in_bounds() || !board.is_empty(mv.pos) || mv.stone == Stone::Empty {
                warn!(pos = %mv.pos, "inconsistent history in state sync");
                return Err(SessionError::UnexpectedMessage(format!(
                    "state sync replays an invalid move at {}",
                    mv.pos
                )));
            }
            board.apply(*mv);
        }

        self.board = board;
        self.phase = sync.phase;
        self.my_stone = sync.your_stone;
        debug!(moves = self.board.move_count(), phase = %self.phase, "state synced");
        Ok(())
    }

    /// Would the host accept a move here from us?
    pub fn check_move(&self, pos: Pos) -> Result<(), SessionError> {
        if !self.phase.accepts_moves() {
            return Err(self.refuse(Action::Move));
        }
        if self.turn() != self.my_stone {
            return Err(SessionError::IllegalMove(IllegalReason::WrongTurn));
        }
        if !pos.in_bounds() {
            return Err(SessionError::IllegalMove(IllegalReason::OutOfBounds));
        }
        if !self.board.is_empty(pos) {
            return Err(SessionError::IllegalMove(IllegalReason::Occupied));
        }
        if let Some(kind) = is_forbidden(&self.board, pos, self.my_stone, self.config.renju) {
            return Err(SessionError::ForbiddenMove { kind });
        }
        Ok(())
    }

    pub fn check_swap(&self) -> Result<(), SessionError> {
        if self.phase != Phase::Setup || !self.board.is_board_empty() {
            return Err(self.refuse(Action::Swap));
        }
        Ok(())
    }

    pub fn check_request(&self, kind: ConfirmKind) -> Result<(), SessionError> {
        let allowed = match (kind, &self.phase) {
            (ConfirmKind::Undo, Phase::InProgress) => true,
            (ConfirmKind::Undo, _) => false,
            (ConfirmKind::Restart, Phase::Setup | Phase::InProgress) => true,
            (ConfirmKind::Restart, Phase::Ended(_)) => !self.phase.is_final(),
            (ConfirmKind::Restart, Phase::AwaitingConfirmation(_)) => false,
        };
        if !allowed {
            let action = match kind {
                ConfirmKind::Restart => Action::Restart,
                ConfirmKind::Undo => Action::Undo,
            };
            return Err(self.refuse(action));
        }
        Ok(())
    }

    /// The request we may answer, if the host is waiting on us
    pub fn check_answer(&self) -> Result<ConfirmKind, SessionError> {
        match self.phase.pending() {
            Some(request) if request.requester == Participant::Peer => Ok(request.kind),
            _ => Err(self.refuse(Action::Answer)),
        }
    }

    /// Local quit; the host is told separately
    pub fn quit(&mut self) {
        if !self.phase.is_final() {
            self.phase = Phase::Ended(EndReason::Quit(Participant::Local));
        }
    }

    /// The host quit
    pub fn peer_quit(&mut self) {
        if !self.phase.is_final() {
            self.phase = Phase::Ended(EndReason::Quit(Participant::Peer));
        }
    }

    pub fn disconnect(&mut self) {
        if !self.phase.is_final() {
            warn!("host disconnected");
            self.phase = Phase::Ended(EndReason::Disconnected);
        }
    }

    fn refuse(&self, action: Action) -> SessionError {
        if self.phase == Phase::Ended(EndReason::Disconnected) {
            return SessionError::TransportFailure("host disconnected".to_string());
        }
        SessionError::InvalidPhaseAction {
            action,
            phase: self.phase.clone(),
        }
    }
}

impl GameView for Replica {
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
        self.my_stone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;
    use crate::rules::ForbiddenKind;
    use crate::session::PendingRequest;

    fn sync(history: Vec<Move>, phase: Phase, your_stone: Stone) -> StateSync {
        let turn = if history.len() % 2 == 0 { Stone::Black } else { Stone::White };
        StateSync {
            history,
            phase,
            turn,
            your_stone,
        }
    }

    #[test]
    fn test_replica_follows_sync() {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::White);
        assert!(replica.check_move(Pos::new(7, 7)).is_err());

        let history = vec![Move::new(Pos::new(7, 7), Stone::Black)];
        replica
            .apply_sync(sync(history, Phase::InProgress, Stone::White))
            .unwrap();
        assert_eq!(replica.board().get(Pos::new(7, 7)), Stone::Black);
        assert!(replica.is_my_turn());
        assert_eq!(
            replica.check_move(Pos::new(7, 7)),
            Err(SessionError::IllegalMove(IllegalReason::Occupied))
        );
        assert!(replica.check_move(Pos::new(8, 8)).is_ok());
    }

    #[test]
    fn test_replica_refuses_bad_history() {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::White);
        let history = vec![
            Move::new(Pos::new(7, 7), Stone::Black),
            Move::new(Pos::new(7, 7), Stone::White),
        ];
        assert!(replica
            .apply_sync(sync(history, Phase::InProgress, Stone::White))
            .is_err());
        assert!(replica.board().is_board_empty());
        assert_eq!(replica.phase(), &Phase::Setup);
    }

    #[test]
    fn test_replica_refuses_off_board_history() {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::White);
        let history = vec![Move::new(Pos::new(200, 0), Stone::Black)];
        let err = replica
            .apply_sync(sync(history, Phase::InProgress, Stone::White))
            .unwrap_err();
        assert!(matches!(err, SessionError::UnexpectedMessage(ref text) if text.contains("(200,0)")));
        assert!(replica.board().is_board_empty());
        assert_eq!(replica.phase(), &Phase::Setup);
    }

    #[test]
    fn test_replica_prechecks_forbidden() {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::Black);
        let history = vec![
            Move::new(Pos::new(6, 7), Stone::Black),
            Move::new(Pos::new(0, 0), Stone::White),
            Move::new(Pos::new(8, 7), Stone::Black),
            Move::new(Pos::new(14, 0), Stone::White),
            Move::new(Pos::new(7, 6), Stone::Black),
            Move::new(Pos::new(0, 14), Stone::White),
            Move::new(Pos::new(7, 8), Stone::Black),
            Move::new(Pos::new(14, 14), Stone::White),
        ];
        replica
            .apply_sync(sync(history, Phase::InProgress, Stone::Black))
            .unwrap();
        assert_eq!(
            replica.check_move(Pos::new(7, 7)),
            Err(SessionError::ForbiddenMove {
                kind: ForbiddenKind::DoubleThree
            })
        );
    }

    #[test]
    fn test_replica_answers_only_host_requests() {
        let mut replica = Replica::new(GameConfig::two_player(true), Stone::White);
        let history = vec![Move::new(Pos::new(7, 7), Stone::Black)];
        let pending = |requester| {
            Phase::AwaitingConfirmation(PendingRequest {
                kind: ConfirmKind::Undo,
                requester,
                resume: Box::new(Phase::InProgress),
            })
        };

        replica
            .apply_sync(sync(history.clone(), pending(Participant::Peer), Stone::White))
            .unwrap();
        assert_eq!(replica.check_answer(), Ok(ConfirmKind::Undo));
        assert!(replica.check_request(ConfirmKind::Restart).is_err());

        replica
            .apply_sync(sync(history, pending(Participant::Local), Stone::White))
            .unwrap();
        assert!(replica.check_answer().is_err());
    }

    #[test]
    fn test_replica_disconnect_is_transport_failure() {
        let mut replica = Replica::new(GameConfig::two_player(false), Stone::White);
        replica.disconnect();
        assert!(matches!(
            replica.check_swap(),
            Err(SessionError::TransportFailure(_))
        ));
        replica.quit();
        assert_eq!(replica.phase(), &Phase::Ended(EndReason::Disconnected));
    }
}
