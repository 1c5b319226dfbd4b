//! Networking between host and guest
//!
//! - [`protocol`]: JSON-lines messages
//! - [`transport`]: TCP and in-memory links with a background receiver

pub mod protocol;
pub mod transport;

use thiserror::Error;

pub use protocol::{decode, encode, Message, StateSync, PROTOCOL_VERSION};
pub use transport::{ChannelTransport, Incoming, TcpTransport, Transport};

#[derive(Debug, Error)]
pub enum NetError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("connection closed")]
    Closed,

    #[error("protocol version mismatch (ours {ours}, theirs {theirs})")]
    VersionMismatch { ours: u32, theirs: u32 },

    #[error("handshake failed: {0}")]
    Handshake(String),
}
