//! Wire messages exchanged between host and guest
//!
//! Each message travels as one line of JSON with a `type` tag:
//!
//! ```
//! use gomoku::net::{decode, encode, Message};
//!
//! let line = encode(&Message::Move { x: 7, y: 7 })?;
//! assert_eq!(line, "{\"type\":\"move\",\"x\":7,\"y\":7}\n");
//! assert_eq!(decode(&line)?, Message::Move { x: 7, y: 7 });
//! # Ok::<(), gomoku::net::NetError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Move, Stone};
use crate::config::GameConfig;
use crate::session::Phase;

use super::NetError;

/// Bumped whenever a message changes shape
pub const PROTOCOL_VERSION: u32 = 1;

/// Authoritative state as one side should see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSync {
    /// Every move so far, oldest first
    pub history: Vec<Move>,
    /// Phase from the receiver's point of view
    pub phase: Phase,
    pub turn: Stone,
    pub your_stone: Stone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Guest opens the connection
    Hello { version: u32, name: String },
    /// Host accepts the guest
    Welcome {
        version: u32,
        name: String,
        config: GameConfig,
        your_stone: Stone,
    },
    Move { x: u8, y: u8 },
    SwapRequest,
    SwapAck,
    RestartRequest,
    RestartResponse { accept: bool },
    UndoRequest,
    UndoResponse { accept: bool },
    Quit,
    StateSync(StateSync),
    /// Host refused a guest request
    Reject { reason: String },
}

impl Message {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Hello { .. } => "hello",
            Message::Welcome { .. } => "welcome",
            Message::Move { .. } => "move",
            Message::SwapRequest => "swap_request",
            Message::SwapAck => "swap_ack",
            Message::RestartRequest => "restart_request",
            Message::RestartResponse { .. } => "restart_response",
            Message::UndoRequest => "undo_request",
            Message::UndoResponse { .. } => "undo_response",
            Message::Quit => "quit",
            Message::StateSync(_) => "state_sync",
            Message::Reject { .. } => "reject",
        }
    }
}

/// Serialize a message into one newline-terminated line
pub fn encode(msg: &Message) -> Result<String, NetError> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}

/// Parse one line (the trailing newline is optional)
pub fn decode(line: &str) -> Result<Message, NetError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;
    use crate::config::Level;
    use crate::session::{ConfirmKind, Participant, PendingRequest};

    #[test]
    fn test_unit_variants_are_tagged() {
        assert_eq!(encode(&Message::Quit).unwrap(), "{\"type\":\"quit\"}\n");
        assert_eq!(
            decode("{\"type\":\"undo_response\",\"accept\":false}").unwrap(),
            Message::UndoResponse { accept: false }
        );
    }

    #[test]
    fn test_state_sync_survives_the_wire() {
        let sync = StateSync {
            history: vec![
                Move::new(Pos::new(7, 7), Stone::Black),
                Move::new(Pos::new(7, 8), Stone::White),
            ],
            phase: Phase::AwaitingConfirmation(PendingRequest {
                kind: ConfirmKind::Restart,
                requester: Participant::Peer,
                resume: Box::new(Phase::InProgress),
            }),
            turn: Stone::Black,
            your_stone: Stone::White,
        };
        let msg = Message::StateSync(sync);
        assert_eq!(decode(&encode(&msg).unwrap()).unwrap(), msg);
    }

    #[test]
    fn test_welcome_carries_config() {
        let msg = Message::Welcome {
            version: PROTOCOL_VERSION,
            name: "Host".into(),
            config: GameConfig::single_player(Level::default(), true),
            your_stone: Stone::White,
        };
        let line = encode(&msg).unwrap();
        assert!(line.contains("\"your_stone\":\"White\""));
        assert_eq!(decode(&line).unwrap(), msg);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(decode("MOVE x=1 y=1"), Err(NetError::Codec(_))));
        assert!(decode("{\"type\":\"teleport\"}").is_err());
    }
}
