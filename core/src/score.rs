use std::collections::BTreeMap;

use serde::Serialize;

use crate::snapshot::Team;

/// Points each team earns for one finished game, in `teams` order.
///
/// Every team gets one point when somebody hit the assassin. Winners add
/// `teams.len() - (rank + 1)` on top, so with four teams the podium earns
/// 3, 2 and 1.
pub fn final_scores(teams: &[Team], winners: &[Team], losers: &[Team]) -> Vec<(Team, u32)> {
    let loser_base = u32::from(!losers.is_empty());
    let team_count = teams.len() as u32;
    teams
        .iter()
        .map(|team| {
            let podium = winners
                .iter()
                .position(|winner| winner == team)
                .map(|rank| team_count.saturating_sub(rank as u32 + 1))
                .unwrap_or(0);
            (*team, loser_base + podium)
        })
        .collect()
}

/// Session-long totals across successive games; only ever added to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Scores {
    totals: BTreeMap<Team, u32>,
}

impl Scores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: &[(Team, u32)]) {
        for (team, value) in points {
            let slot = self.totals.entry(*team).or_insert(0);
            *slot = slot.saturating_add(*value);
        }
    }

    pub fn get(&self, team: Team) -> u32 {
        self.totals.get(&team).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, u32)> + '_ {
        self.totals.iter().map(|(team, value)| (*team, *value))
    }
}
