use std::cell::RefCell;
use std::fmt::Write as _;
use std::io::Write as _;

use codenames::codenames_core::{team_palette, GameEvent, Role, SettingKey, Team};
use codenames::{AppSnapshot, ViewMode};

/// Marker for a cell whose category the viewer may see. Colour-blind mode
/// spells the category out instead of relying on a single letter.
pub fn category_marker(team: Team, color_blind: bool) -> String {
    if color_blind {
        return team.category_label().to_string();
    }
    match team {
        Team::Red => "R",
        Team::Blue => "B",
        Team::Green => "G",
        Team::Yellow => "Y",
        Team::Neutral => "-",
        Team::Black => "X",
    }
    .to_string()
}

pub fn legend(number_of_teams: u32, color_blind: bool) -> String {
    let mut entries: Vec<String> = team_palette(number_of_teams)
        .iter()
        .map(|team| format!("{}={}", category_marker(*team, color_blind), team))
        .collect();
    entries.push(format!("{}=neutral", category_marker(Team::Neutral, color_blind)));
    entries.push(format!("{}=assassin", category_marker(Team::Black, color_blind)));
    entries.join("  ")
}

pub fn render(app: &AppSnapshot) -> String {
    let mut out = String::new();
    if app.mode == ViewMode::Settings {
        render_settings(app, &mut out);
        return out;
    }
    let Some(view) = app.board_view() else {
        out.push_str("waiting for the server...\n");
        return out;
    };
    let color_blind = app.settings.color_blind;
    let cells: Vec<String> = view
        .cells
        .iter()
        .map(|cell| {
            let marker = cell
                .category
                .map(|team| category_marker(team, color_blind))
                .unwrap_or_else(|| String::from("?"));
            let word = if cell.revealed {
                cell.word.to_lowercase()
            } else {
                cell.word.to_uppercase()
            };
            format!("{:>2} {word} [{marker}]", cell.index)
        })
        .collect();
    let width = cells.iter().map(|cell| cell.chars().count()).max().unwrap_or(0);
    for row in cells.chunks(view.columns.max(1)) {
        let line: Vec<String> = row.iter().map(|cell| format!("{cell:<width$}")).collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out.push('\n');

    let badges: Vec<String> = view
        .badges
        .iter()
        .map(|badge| {
            let mut text = format!("{} {}", badge.team, badge.remaining);
            if badge.active {
                text.insert_str(0, "> ");
            }
            if badge.winner {
                text.push_str(" (winner)");
            }
            if badge.loser {
                text.push_str(" (struck out)");
            }
            text
        })
        .collect();
    let _ = writeln!(out, "{}", badges.join(" | "));
    let _ = writeln!(out, "{}", view.status);
    if !app.scores.is_empty() {
        let totals: Vec<String> = app
            .scores
            .iter()
            .map(|(team, points)| format!("{team} {points}"))
            .collect();
        let _ = writeln!(out, "session: {}", totals.join(", "));
    }
    let role = match app.role() {
        Role::Codemaster => "spymaster",
        Role::Player => "player",
    };
    let mut footer = format!("you are {role}");
    if view.end_turn_available {
        footer.push_str("; `end` passes the turn");
    }
    if view.finished {
        footer.push_str("; `next` starts another game");
    }
    let _ = writeln!(out, "{footer}");
    out
}

const SETTING_ROWS: [(SettingKey, &str); 4] = [
    (SettingKey::ColorBlind, "color-blind"),
    (SettingKey::DarkMode, "dark-mode"),
    (SettingKey::Fullscreen, "fullscreen"),
    (SettingKey::SpymasterMayGuess, "spymaster-may-guess"),
];

fn render_settings(app: &AppSnapshot, out: &mut String) {
    let _ = writeln!(out, "settings (esc to return)");
    for (key, name) in SETTING_ROWS {
        let flag = if app.settings.get(key) { "on" } else { "off" };
        let _ = writeln!(out, "  {name:<21}{flag}");
    }
}

/// Terminal title showing whose turn it is; cleared when the session goes.
#[derive(Default)]
pub struct TurnIndicator {
    title: RefCell<Option<String>>,
}

impl TurnIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<String> {
        self.title.borrow().clone()
    }

    pub fn on_event(&self, event: &GameEvent) {
        match event {
            GameEvent::TurnChanged { team, round } => {
                self.set(Some(format!("{team}'s turn, round {}", round + 1)));
            }
            GameEvent::GameEnded { winners, .. } => {
                let names: Vec<&str> = winners.iter().map(|team| team.as_str()).collect();
                self.set(Some(format!("game over: {}", names.join(", "))));
            }
            GameEvent::TimerExpired { enforced } => {
                eprintln!("time is up{}", if *enforced { ", ending the turn" } else { "" });
            }
            GameEvent::RoleReset => eprintln!("new game; you are a player again"),
            GameEvent::ActionFailed { action, message } => {
                eprintln!("{action} failed: {message}");
            }
            GameEvent::NewGame { .. }
            | GameEvent::ScoresUpdated(_)
            | GameEvent::RefreshFailed { .. } => {}
        }
    }

    pub fn on_snapshot(&self, app: &AppSnapshot) {
        if !app.mounted {
            self.set(None);
        }
    }

    fn set(&self, title: Option<String>) {
        if *self.title.borrow() == title {
            return;
        }
        let text = title.clone().unwrap_or_default();
        *self.title.borrow_mut() = title;
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\x1b]0;{text}\x07");
        let _ = stdout.flush();
    }
}
