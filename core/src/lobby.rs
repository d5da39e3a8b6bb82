use std::fmt;

use crate::game_id::{GameId, GameIdError};
use crate::grid::{MAX_TEAMS, MIN_TEAMS};
use crate::protocol::NextGameRequest;

/// Fewest words a combined word set may hold; the smallest board uses all of them.
pub const MIN_WORD_SET_LEN: usize = 25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerSetting {
    pub minutes: u32,
    pub seconds: u32,
}

impl TimerSetting {
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.minutes) * 60 * 1000 + u64::from(self.seconds) * 1000
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGameOptions {
    pub game_id: String,
    pub word_sets: Vec<Vec<String>>,
    pub number_of_teams: u32,
    pub timer: Option<TimerSetting>,
    pub enforce_timer: bool,
}

impl NewGameOptions {
    pub fn word_count(&self) -> usize {
        self.word_sets.iter().map(Vec::len).sum()
    }

    /// Join-or-create request; an existing game under `game_id` is reused.
    pub fn into_request(self) -> Result<NextGameRequest, LobbyError> {
        let game_id = GameId::parse(&self.game_id).map_err(LobbyError::InvalidGameId)?;
        if !(MIN_TEAMS..=MAX_TEAMS).contains(&self.number_of_teams) {
            return Err(LobbyError::TeamCount(self.number_of_teams));
        }
        let found = self.word_count();
        if found < MIN_WORD_SET_LEN {
            return Err(LobbyError::NotEnoughWords {
                found,
                required: MIN_WORD_SET_LEN,
            });
        }
        let timer_duration_ms = self.timer.map(|timer| timer.duration_ms()).unwrap_or(0);
        Ok(NextGameRequest {
            game_id: game_id.to_string(),
            word_set: self.word_sets.into_iter().flatten().collect(),
            create_new: false,
            number_of_teams: self.number_of_teams,
            timer_duration_ms,
            enforce_timer: timer_duration_ms > 0 && self.enforce_timer,
        })
    }
}

pub fn parse_custom_words(raw: &str) -> Vec<String> {
    raw.trim()
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LobbyError {
    InvalidGameId(GameIdError),
    TeamCount(u32),
    NotEnoughWords { found: usize, required: usize },
}

impl fmt::Display for LobbyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobbyError::InvalidGameId(err) => write!(f, "invalid game id: {err}"),
            LobbyError::TeamCount(count) => {
                write!(f, "number of teams must be {MIN_TEAMS}..={MAX_TEAMS}, got {count}")
            }
            LobbyError::NotEnoughWords { found, required } => write!(
                f,
                "selected word sets hold {found} words, at least {required} are needed"
            ),
        }
    }
}

impl std::error::Error for LobbyError {}
