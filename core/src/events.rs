use chrono::{DateTime, Utc};

use crate::action::ActionKind;
use crate::score::Scores;
use crate::snapshot::{Snapshot, Team};

/// State transitions observed by presentation-effect collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    NewGame { id: String, created_at: DateTime<Utc> },
    RoleReset,
    TurnChanged { team: Team, round: u32 },
    GameEnded { winners: Vec<Team>, losers: Vec<Team> },
    ScoresUpdated(Scores),
    TimerExpired { enforced: bool },
    RefreshFailed { message: String },
    ActionFailed { action: ActionKind, message: String },
}

/// Events implied by replacing `previous` with `next`.
pub fn diff_events(previous: Option<&Snapshot>, next: &Snapshot) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let same_instance = previous.is_some_and(|prev| prev.same_instance(next));
    if !same_instance {
        events.push(GameEvent::NewGame {
            id: next.id.clone(),
            created_at: next.created_at,
        });
    }

    let prev_turn = previous
        .filter(|_| same_instance)
        .filter(|prev| !prev.concluded())
        .and_then(|prev| prev.current_team().map(|team| (team, prev.round)));
    let next_turn = if next.concluded() {
        None
    } else {
        next.current_team().map(|team| (team, next.round))
    };
    if let Some((team, round)) = next_turn {
        if prev_turn != Some((team, round)) {
            events.push(GameEvent::TurnChanged { team, round });
        }
    }

    let was_finished = same_instance && previous.is_some_and(|prev| prev.is_finished());
    if next.is_finished() && !was_finished {
        events.push(GameEvent::GameEnded {
            winners: next.winners.clone(),
            losers: next.losers.clone(),
        });
    }
    events
}
