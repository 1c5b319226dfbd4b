use std::fmt;

use thiserror::Error;

use crate::engine::SearchError;
use crate::rules::ForbiddenKind;

use super::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalReason {
    Occupied,
    OutOfBounds,
    WrongTurn,
}

impl fmt::Display for IllegalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalReason::Occupied => write!(f, "cell is occupied"),
            IllegalReason::OutOfBounds => write!(f, "cell is off the board"),
            IllegalReason::WrongTurn => write!(f, "not your turn"),
        }
    }
}

/// Session operation being refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move,
    Swap,
    Restart,
    Undo,
    Answer,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Move => "move",
            Action::Swap => "swap",
            Action::Restart => "restart",
            Action::Undo => "undo",
            Action::Answer => "answer",
        };
        f.write_str(name)
    }
}

/// Why a session operation was refused. A refused operation leaves the
/// session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("illegal move: {0}")]
    IllegalMove(IllegalReason),

    #[error("forbidden move: {kind}")]
    ForbiddenMove { kind: ForbiddenKind },

    #[error("cannot {action} while {phase}")]
    InvalidPhaseAction { action: Action, phase: Phase },

    #[error("no legal moves left")]
    NoLegalMoves,

    #[error("connection lost: {0}")]
    TransportFailure(String),

    #[error("unexpected message: {0}")]
    UnexpectedMessage(String),
}

impl From<SearchError> for SessionError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NoLegalMoves(_) => SessionError::NoLegalMoves,
        }
    }
}
