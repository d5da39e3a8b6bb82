use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

pub const REFRESH_PATH: &str = "game-state";
pub const GUESS_PATH: &str = "guess";
pub const END_TURN_PATH: &str = "end-turn";
pub const NEXT_GAME_PATH: &str = "next-game";

/// `state_id` is empty until a snapshot is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub game_id: String,
    pub state_id: String,
}

impl RefreshRequest {
    pub fn new(game_id: &str, current: Option<&Snapshot>) -> Self {
        Self {
            game_id: game_id.to_string(),
            state_id: current.map(|s| s.state_id.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRequest {
    pub game_id: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTurnRequest {
    pub game_id: String,
    pub current_round: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextGameRequest {
    pub game_id: String,
    pub word_set: Vec<String>,
    pub create_new: bool,
    pub number_of_teams: u32,
    pub timer_duration_ms: u64,
    pub enforce_timer: bool,
}

impl NextGameRequest {
    /// Follow-up game with the configuration the server echoed back.
    pub fn from_snapshot(snapshot: &Snapshot, create_new: bool) -> Self {
        Self {
            game_id: snapshot.id.clone(),
            word_set: snapshot.word_set.clone(),
            create_new,
            number_of_teams: snapshot.effective_number_of_teams(),
            timer_duration_ms: snapshot.timer_duration_ms,
            enforce_timer: snapshot.enforce_timer,
        }
    }
}
