//! Terminal input parsing and rendering

pub mod commands;
pub mod view;

pub use commands::{help_text, parse_input, Command, Input, ParseError};
pub use view::{render_board, render_frame, status_line, Notice, NoticeKind};
