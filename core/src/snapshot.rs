use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::grid::{MAX_TEAMS, MIN_TEAMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Team {
    Neutral,
    Red,
    Blue,
    Green,
    Yellow,
    Black,
}

impl Team {
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Neutral => "neutral",
            Team::Red => "red",
            Team::Blue => "blue",
            Team::Green => "green",
            Team::Yellow => "yellow",
            Team::Black => "black",
        }
    }

    /// Unknown names decode as `Neutral`, matching the server's decoder.
    pub fn from_name(name: &str) -> Self {
        match name {
            "red" => Team::Red,
            "blue" => Team::Blue,
            "green" => Team::Green,
            "yellow" => Team::Yellow,
            "black" => Team::Black,
            _ => Team::Neutral,
        }
    }

    pub fn is_assassin(self) -> bool {
        self == Team::Black
    }

    pub fn is_playing_team(self) -> bool {
        !matches!(self, Team::Neutral | Team::Black)
    }

    /// Label used when a category is spoken or printed.
    pub fn category_label(self) -> &'static str {
        if self.is_assassin() {
            "assassin"
        } else {
            self.as_str()
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Team {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Team::from_name(&name))
    }
}

/// One point-in-time view of a game as returned by the server.
///
/// Snapshots are replaced whole; nothing in the client mutates a field of a
/// snapshot it has already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub state_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub order: Vec<Team>,
    #[serde(default)]
    pub turn_index: usize,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub layout: Vec<Team>,
    #[serde(default)]
    pub revealed: Vec<bool>,
    #[serde(default)]
    pub winners: Vec<Team>,
    #[serde(default)]
    pub losers: Vec<Team>,
    #[serde(default)]
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timer_duration_ms: u64,
    #[serde(default)]
    pub enforce_timer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_team: Option<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_team: Option<Team>,
    #[serde(default)]
    pub number_of_teams: u32,
    #[serde(default)]
    pub word_set: Vec<String>,
    #[serde(default)]
    pub seed: i64,
    #[serde(default)]
    pub perm_index: usize,
    #[serde(default)]
    pub words_per_game: usize,
}

impl Snapshot {
    /// Terminal condition: at most one team is still taking turns.
    pub fn is_finished(&self) -> bool {
        self.order.len() <= 1
    }

    /// `is_finished` widened by the legacy `winning_team` marker.
    pub fn concluded(&self) -> bool {
        self.is_finished() || self.winning_team.is_some()
    }

    pub fn current_team(&self) -> Option<Team> {
        self.order.get(self.turn_index).copied()
    }

    pub fn remaining(&self, team: Team) -> usize {
        self.layout
            .iter()
            .zip(self.revealed.iter())
            .filter(|(tag, revealed)| **tag == team && !**revealed)
            .count()
    }

    pub fn is_revealed(&self, idx: usize) -> bool {
        self.revealed.get(idx).copied().unwrap_or(false)
    }

    pub fn category(&self, idx: usize) -> Option<Team> {
        self.layout.get(idx).copied()
    }

    pub fn same_instance(&self, other: &Snapshot) -> bool {
        self.id == other.id && self.created_at == other.created_at
    }

    pub fn has_timer(&self) -> bool {
        self.timer_duration_ms > 0
    }

    /// Team count for the next-game flow; older servers omit the field.
    pub fn effective_number_of_teams(&self) -> u32 {
        if self.number_of_teams > 0 {
            self.number_of_teams
        } else {
            self.teams.len() as u32
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.layout.len() != self.words.len() {
            return Err(SnapshotError::LayoutLength {
                words: self.words.len(),
                layout: self.layout.len(),
            });
        }
        if self.revealed.len() != self.words.len() {
            return Err(SnapshotError::RevealedLength {
                words: self.words.len(),
                revealed: self.revealed.len(),
            });
        }
        if !self.order.is_empty() && self.turn_index >= self.order.len() {
            return Err(SnapshotError::TurnIndexOutOfRange {
                turn_index: self.turn_index,
                order: self.order.len(),
            });
        }
        let count = self.teams.len() as u32;
        if !(MIN_TEAMS..=MAX_TEAMS).contains(&count) {
            return Err(SnapshotError::TeamCount(count));
        }
        let mut seen = HashSet::new();
        for team in &self.teams {
            if !team.is_playing_team() || !seen.insert(*team) {
                return Err(SnapshotError::InvalidTeam(*team));
            }
        }
        Ok(())
    }
}

/// Reconciles an incoming snapshot with the one currently held.
///
/// The server is the single writer, so the incoming snapshot always wins.
pub fn merge_snapshot(_previous: Option<&Snapshot>, next: Snapshot) -> Snapshot {
    next
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    LayoutLength { words: usize, layout: usize },
    RevealedLength { words: usize, revealed: usize },
    TurnIndexOutOfRange { turn_index: usize, order: usize },
    TeamCount(u32),
    InvalidTeam(Team),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::LayoutLength { words, layout } => {
                write!(f, "layout has {layout} entries for {words} words")
            }
            SnapshotError::RevealedLength { words, revealed } => {
                write!(f, "reveal mask has {revealed} entries for {words} words")
            }
            SnapshotError::TurnIndexOutOfRange { turn_index, order } => {
                write!(f, "turn index {turn_index} outside order of {order} teams")
            }
            SnapshotError::TeamCount(count) => {
                write!(f, "expected {MIN_TEAMS}..={MAX_TEAMS} teams, got {count}")
            }
            SnapshotError::InvalidTeam(team) => write!(f, "invalid or duplicate team '{team}'"),
        }
    }
}

impl std::error::Error for SnapshotError {}
