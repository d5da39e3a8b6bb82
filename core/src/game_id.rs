use std::fmt;

pub const GAME_ID_MAX_LEN: usize = 64;

fn is_forbidden(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control() || matches!(ch, '/' | '?' | '#' | '%' | '\\')
}

/// A game identifier as typed in the lobby; it doubles as a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn parse(value: &str) -> Result<Self, GameIdError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(GameIdError::Empty);
        }
        let len = value.chars().count();
        if len > GAME_ID_MAX_LEN {
            return Err(GameIdError::TooLong {
                max: GAME_ID_MAX_LEN,
                found: len,
            });
        }
        for (idx, ch) in value.chars().enumerate() {
            if is_forbidden(ch) {
                return Err(GameIdError::InvalidCharacter { ch, index: idx });
            }
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for GameId {
    type Err = GameIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameIdError {
    Empty,
    TooLong { max: usize, found: usize },
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for GameIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameIdError::Empty => write!(f, "game id must not be empty"),
            GameIdError::TooLong { max, found } => {
                write!(f, "game id must be at most {max} chars, got {found}")
            }
            GameIdError::InvalidCharacter { ch, index } => {
                write!(f, "invalid character {ch:?} at position {index}")
            }
        }
    }
}

impl std::error::Error for GameIdError {}
