use crate::snapshot::Team;

pub const TEAM_PALETTE: [Team; 4] = [Team::Red, Team::Blue, Team::Green, Team::Yellow];

/// Teams a game with `number_of_teams` draws from, before the server shuffles turn order.
pub fn team_palette(number_of_teams: u32) -> &'static [Team] {
    let count = (number_of_teams as usize).min(TEAM_PALETTE.len());
    &TEAM_PALETTE[..count]
}
