//! Parsing of one line of user input
//!
//! A line is either a slash command, a yes/no answer, or a cell given as
//! `x y` (1-based) or `H8` (column letter and 1-based row).
//!
//! ```
//! use gomoku::board::Pos;
//! use gomoku::cli::{parse_input, Input};
//!
//! assert_eq!(parse_input("8 8", false)?, Input::Cell(Pos::new(7, 7)));
//! assert_eq!(parse_input("h8", false)?, Input::Cell(Pos::new(7, 7)));
//! assert_eq!(parse_input("/undo", false)?, Input::Command(gomoku::cli::Command::Undo));
//! # Ok::<(), gomoku::cli::ParseError>(())
//! ```

use thiserror::Error;

use crate::board::{Pos, BOARD_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Swap,
    Restart,
    Undo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Blank line
    Nothing,
    Command(Command),
    Answer(bool),
    Cell(Pos),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("out of bounds: {0}, {1} (must be 1..{size})", size = BOARD_SIZE)]
    OutOfBounds(u32, u32),

    #[error("enter Y or N")]
    ExpectedAnswer,

    #[error("invalid input, use 'x y', 'H8' or /help")]
    Invalid,
}

pub const COMMANDS: [&str; 5] = ["/help", "/quit", "/swap", "/restart", "/undo"];

pub fn help_text() -> String {
    let last_col = (b'A' + BOARD_SIZE as u8 - 1) as char;
    format!(
        "Input: 'x y' (e.g. 8 8) or 'H8' (A-{last_col} + 1-{BOARD_SIZE}).\nCommands: {}",
        COMMANDS.join(", ")
    )
}

/// Parse one line. With `expecting_answer`, only y/n and slash commands
/// are accepted.
pub fn parse_input(text: &str, expecting_answer: bool) -> Result<Input, ParseError> {
    let raw = text.trim();
    if raw.is_empty() {
        return Ok(Input::Nothing);
    }

    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" => return Ok(Input::Answer(true)),
        "n" | "no" => return Ok(Input::Answer(false)),
        _ => {}
    }

    if let Some(name) = raw.strip_prefix('/') {
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "help" => Command::Help,
            "quit" => Command::Quit,
            "swap" => Command::Swap,
            "restart" => Command::Restart,
            "undo" => Command::Undo,
            _ => return Err(ParseError::UnknownCommand(raw.to_string())),
        };
        return Ok(Input::Command(command));
    }

    if expecting_answer {
        return Err(ParseError::ExpectedAnswer);
    }
    parse_cell(raw).map(Input::Cell)
}

fn parse_cell(raw: &str) -> Result<Pos, ParseError> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    let numeric = match parts.as_slice() {
        [x, y] => x.parse::<u32>().ok().zip(y.parse::<u32>().ok()),
        _ => None,
    };
    let (x, y) = match numeric {
        Some(xy) => xy,
        None => {
            let mut chars = raw.chars();
            let col = chars
                .next()
                .filter(char::is_ascii_alphabetic)
                .ok_or(ParseError::Invalid)?;
            let row = chars
                .as_str()
                .trim()
                .parse::<u32>()
                .map_err(|_| ParseError::Invalid)?;
            (col.to_ascii_uppercase() as u32 - 'A' as u32 + 1, row)
        }
    };

    let size = BOARD_SIZE as u32;
    if !(1..=size).contains(&x) || !(1..=size).contains(&y) {
        return Err(ParseError::OutOfBounds(x, y));
    }
    Ok(Pos::new((x - 1) as u8, (y - 1) as u8))
}
