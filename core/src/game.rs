//! Presentation facts derived from a snapshot and the viewer's local role.
//!
//! Everything here is a pure function of its inputs; callers recompute on
//! every applied snapshot instead of caching results.

use serde::Serialize;

use crate::grid::board_class;
use crate::snapshot::{Snapshot, Team};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViewContext {
    pub codemaster: bool,
    pub spymaster_may_guess: bool,
}

impl ViewContext {
    pub fn guessing_blocked(&self) -> bool {
        self.codemaster && !self.spymaster_may_guess
    }
}

pub fn cell_interactive(snapshot: &Snapshot, ctx: &ViewContext, idx: usize) -> bool {
    if idx >= snapshot.words.len() {
        return false;
    }
    if ctx.guessing_blocked() {
        return false;
    }
    if snapshot.is_revealed(idx) {
        return false;
    }
    !snapshot.is_finished()
}

pub fn cell_category_visible(snapshot: &Snapshot, ctx: &ViewContext, idx: usize) -> bool {
    ctx.codemaster || snapshot.concluded() || snapshot.is_revealed(idx)
}

pub fn cell_aria_label(snapshot: &Snapshot, ctx: &ViewContext, idx: usize) -> String {
    let Some(word) = snapshot.words.get(idx) else {
        return String::new();
    };
    let mut label = word.to_lowercase();
    if cell_category_visible(snapshot, ctx, idx) {
        if let Some(category) = snapshot.category(idx) {
            label.push_str(", ");
            label.push_str(category.category_label());
        }
    }
    if snapshot.is_revealed(idx) {
        label.push_str(", revealed word");
    } else {
        label.push_str(", hidden word");
    }
    label.push('.');
    label
}

fn join_teams(teams: &[Team]) -> String {
    teams
        .iter()
        .map(|team| team.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn score_aria_label(snapshot: &Snapshot) -> String {
    let scores: Vec<String> = snapshot
        .order
        .iter()
        .map(|team| format!("{} {} words remaining", snapshot.remaining(*team), team))
        .collect();
    let mut label = format!("Scores: {}", scores.join(", "));
    if !snapshot.losers.is_empty() {
        label.push_str(". Losers: ");
        label.push_str(&join_teams(&snapshot.losers));
    }
    if !snapshot.winners.is_empty() {
        label.push_str(". Winners: ");
        label.push_str(&join_teams(&snapshot.winners));
    }
    label.push_str(". ");
    label
}

pub fn status_line(snapshot: &Snapshot) -> String {
    if snapshot.is_finished() {
        let mut status = format!("Winners: {}.", join_teams(&snapshot.winners));
        if let Some(loser) = snapshot.losers.first() {
            status.push_str(&format!(" Loser by Strike: {loser}"));
        }
        return status;
    }
    match snapshot.current_team() {
        Some(team) => format!("{team}'s turn"),
        None => String::from("waiting for turn order"),
    }
}

pub fn end_turn_available(snapshot: &Snapshot, ctx: &ViewContext) -> bool {
    !snapshot.concluded() && !ctx.codemaster && snapshot.current_team().is_some()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamBadge {
    pub team: Team,
    pub remaining: usize,
    pub active: bool,
    pub winner: bool,
    pub loser: bool,
}

pub fn team_badges(snapshot: &Snapshot) -> Vec<TeamBadge> {
    let current = if snapshot.is_finished() {
        None
    } else {
        snapshot.current_team()
    };
    snapshot
        .teams
        .iter()
        .map(|team| TeamBadge {
            team: *team,
            remaining: snapshot.remaining(*team),
            active: current == Some(*team),
            winner: snapshot.winners.contains(team),
            loser: snapshot.losers.contains(team),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub index: usize,
    pub word: String,
    /// `None` while the category is hidden from this viewer.
    pub category: Option<Team>,
    pub revealed: bool,
    pub interactive: bool,
    pub aria_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub columns: usize,
    pub board_class: Option<&'static str>,
    pub cells: Vec<CellView>,
    pub badges: Vec<TeamBadge>,
    pub status: String,
    pub finished: bool,
    pub current_team: Option<Team>,
    pub score_label: String,
    pub end_turn_available: bool,
}

pub fn board_view(snapshot: &Snapshot, ctx: &ViewContext) -> BoardView {
    let cells = snapshot
        .words
        .iter()
        .enumerate()
        .map(|(index, word)| CellView {
            index,
            word: word.clone(),
            category: if cell_category_visible(snapshot, ctx, index) {
                snapshot.category(index)
            } else {
                None
            },
            revealed: snapshot.is_revealed(index),
            interactive: cell_interactive(snapshot, ctx, index),
            aria_label: cell_aria_label(snapshot, ctx, index),
        })
        .collect::<Vec<_>>();
    let teams = snapshot.effective_number_of_teams();
    let columns = crate::grid::board_columns(teams)
        .unwrap_or_else(|| (cells.len() as f64).sqrt().ceil().max(1.0) as usize);
    let finished = snapshot.is_finished();
    BoardView {
        columns,
        board_class: board_class(teams),
        cells,
        badges: team_badges(snapshot),
        status: status_line(snapshot),
        finished,
        current_team: if finished { None } else { snapshot.current_team() },
        score_label: score_aria_label(snapshot),
        end_turn_available: end_turn_available(snapshot, ctx),
    }
}
