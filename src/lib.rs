//! Gomoku duel engine with optional renju restrictions
//!
//! Two players alternate on a 15x15 board; the first to line up five stones
//! wins. With renju on, the first-moving color (Black, shown as `O`):
//! - wins only with exactly five (six or more is an overline)
//! - may not create two open threes, two fours, or an overline at once
//!
//! White is never restricted and wins with five or more.
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards and reversible history
//! - [`rules`]: Win detection and forbidden-move classification
//! - [`eval`]: Pattern-based position evaluation
//! - [`search`]: Alpha-beta search with transposition table
//! - [`engine`]: Level-driven computer opponent
//! - [`session`]: Game session state machine (swap, undo, restart, quit)
//! - [`net`]: JSON-lines protocol and transports for two networked peers
//! - [`cli`], [`app`]: Terminal front end
//!
//! # Quick Start
//!
//! ```
//! use gomoku::config::Level;
//! use gomoku::session::{GameView, Participant, Session};
//! use gomoku::Pos;
//!
//! let mut session = Session::single_player(Level::new(1)?, true);
//! let outcome = session.play(Participant::Local, Pos::new(7, 7))?;
//!
//! // The computer answered right away
//! let reply = outcome.reply.expect("computer reply");
//! assert!(session.board().get(reply.mv.pos) == reply.mv.stone);
//! assert_eq!(session.board().move_count(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod app;
pub mod board;
pub mod cli;
pub mod config;
pub mod engine;
pub mod eval;
pub mod net;
pub mod rules;
pub mod search;
pub mod session;

// Re-export commonly used types for convenience
pub use board::{Board, Move, Pos, Stone, BOARD_SIZE};
pub use engine::{AIEngine, MoveResult, SearchError, SearchType};
pub use session::{GameView, Session, SessionError};
