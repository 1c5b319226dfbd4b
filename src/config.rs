//! Game configuration shared by both modes
//!
//! A [`GameConfig`] is fixed for the lifetime of a session. The host sends
//! its copy to the guest inside the handshake, so it is serializable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port the host listens on when none is given
pub const DEFAULT_PORT: u16 = 33333;

/// Player name sent by a guest when none is given
pub const DEFAULT_NAME: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("level must be between {min} and {max}, got {0}", min = Level::MIN, max = Level::MAX)]
    LevelOutOfRange(u8),
    #[error("invalid level {0:?}")]
    InvalidLevel(String),
}

/// Computer strength, 1 (weakest) to 5 (strongest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::LevelOutOfRange(value))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Beginner",
            2 => "Easy",
            3 => "Normal",
            4 => "Hard",
            _ => "Master",
        }
    }

    /// All levels, weakest first
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN..=Self::MAX).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(3)
    }
}

impl TryFrom<u8> for Level {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidLevel(s.to_string()))?;
        Level::new(value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}

/// Settings fixed when a session is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Renju restrictions for the first-moving color
    pub renju: bool,
    /// Computer strength; only set for single-player sessions
    pub level: Option<Level>,
}

impl GameConfig {
    pub fn single_player(level: Level, renju: bool) -> Self {
        Self {
            renju,
            level: Some(level),
        }
    }

    pub fn two_player(renju: bool) -> Self {
        Self { renju, level: None }
    }

    #[inline]
    pub fn is_single_player(&self) -> bool {
        self.level.is_some()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::two_player(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_range() {
        assert!(Level::new(0).is_err());
        assert_eq!(Level::new(6), Err(ConfigError::LevelOutOfRange(6)));
        assert_eq!(Level::all().count(), 5);
        assert_eq!(Level::default().get(), 3);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("5".parse::<Level>().map(Level::get), Ok(5));
        assert!(matches!("x".parse::<Level>(), Err(ConfigError::InvalidLevel(_))));
        assert_eq!("9".parse::<Level>(), Err(ConfigError::LevelOutOfRange(9)));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::new(5).map(|l| l.to_string()), Ok("5 (Master)".to_string()));
    }

    #[test]
    fn test_config_serde_roundtrip_rejects_bad_level() {
        let config = GameConfig::single_player(Level::new(2).unwrap(), false);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"renju":false,"level":2}"#);
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), config);

        let bad = r#"{"renju":true,"level":9}"#;
        assert!(serde_json::from_str::<GameConfig>(bad).is_err());
    }

    #[test]
    fn test_default_is_two_player_renju() {
        let config = GameConfig::default();
        assert!(config.renju);
        assert!(!config.is_single_player());
    }
}
