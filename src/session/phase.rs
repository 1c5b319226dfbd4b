//! Session phases and the parties that move between them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Stone;

/// One side of a session, seen from the process that owns it.
///
/// In single-player the computer is the `Peer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Participant {
    Local,
    Peer,
}

impl Participant {
    #[inline]
    pub fn other(self) -> Participant {
        match self {
            Participant::Local => Participant::Peer,
            Participant::Peer => Participant::Local,
        }
    }
}

/// Meta actions that need the other side's consent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfirmKind {
    Restart,
    Undo,
}

impl fmt::Display for ConfirmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmKind::Restart => write!(f, "restart"),
            ConfirmKind::Undo => write!(f, "undo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Win(Stone),
    Draw,
    Quit(Participant),
    Disconnected,
}

/// A restart or undo waiting for an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub kind: ConfirmKind,
    pub requester: Participant,
    /// Phase restored on decline
    pub resume: Box<Phase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No move yet; swap is still allowed
    Setup,
    InProgress,
    /// Moves are refused until the other side answers
    AwaitingConfirmation(PendingRequest),
    Ended(EndReason),
}

impl Phase {
    #[inline]
    pub fn is_ended(&self) -> bool {
        matches!(self, Phase::Ended(_))
    }

    /// Ended in a way no restart can undo
    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Phase::Ended(EndReason::Quit(_) | EndReason::Disconnected)
        )
    }

    #[inline]
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Phase::Setup | Phase::InProgress)
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        match self {
            Phase::AwaitingConfirmation(request) => Some(request),
            _ => None,
        }
    }

    /// The same phase as the other side sees it
    pub fn for_peer(&self) -> Phase {
        match self {
            Phase::AwaitingConfirmation(request) => Phase::AwaitingConfirmation(PendingRequest {
                kind: request.kind,
                requester: request.requester.other(),
                resume: Box::new(request.resume.for_peer()),
            }),
            Phase::Ended(EndReason::Quit(who)) => Phase::Ended(EndReason::Quit(who.other())),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::InProgress => write!(f, "in progress"),
            Phase::AwaitingConfirmation(request) => {
                write!(f, "awaiting {} confirmation", request.kind)
            }
            Phase::Ended(EndReason::Win(stone)) => write!(f, "ended ({} won)", stone.symbol()),
            Phase::Ended(EndReason::Draw) => write!(f, "ended (draw)"),
            Phase::Ended(EndReason::Quit(_)) => write!(f, "ended (quit)"),
            Phase::Ended(EndReason::Disconnected) => write!(f, "ended (disconnected)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_peer_flips_participants() {
        let phase = Phase::AwaitingConfirmation(PendingRequest {
            kind: ConfirmKind::Undo,
            requester: Participant::Local,
            resume: Box::new(Phase::InProgress),
        });
        let flipped = phase.for_peer();
        assert_eq!(flipped.pending().map(|r| r.requester), Some(Participant::Peer));
        assert_eq!(flipped.for_peer(), phase);

        let quit = Phase::Ended(EndReason::Quit(Participant::Peer));
        assert_eq!(quit.for_peer(), Phase::Ended(EndReason::Quit(Participant::Local)));
    }

    #[test]
    fn test_phase_predicates() {
        assert!(Phase::Setup.accepts_moves());
        assert!(!Phase::Ended(EndReason::Draw).accepts_moves());
        assert!(Phase::Ended(EndReason::Draw).is_ended());
        assert!(!Phase::Ended(EndReason::Draw).is_final());
        assert!(Phase::Ended(EndReason::Disconnected).is_final());
    }

    #[test]
    fn test_phase_serde() {
        let phase = Phase::Ended(EndReason::Win(Stone::White));
        let json = serde_json::to_string(&phase).unwrap();
        assert_eq!(serde_json::from_str::<Phase>(&json).unwrap(), phase);
    }
}
