pub const MIN_TEAMS: u32 = 2;
pub const MAX_TEAMS: u32 = 4;

pub const BOARD_COLUMNS: [usize; 3] = [5, 6, 7];
pub const BOARD_CLASSES: [&str; 3] = ["two_players", "three_players", "four_players"];

fn team_slot(number_of_teams: u32) -> Option<usize> {
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&number_of_teams) {
        return None;
    }
    Some((number_of_teams - MIN_TEAMS) as usize)
}

pub fn board_columns(number_of_teams: u32) -> Option<usize> {
    team_slot(number_of_teams).map(|slot| BOARD_COLUMNS[slot])
}

/// Square board: 25, 36 or 49 words for two, three or four teams.
pub fn board_size(number_of_teams: u32) -> Option<usize> {
    board_columns(number_of_teams).map(|cols| cols * cols)
}

pub fn board_class(number_of_teams: u32) -> Option<&'static str> {
    team_slot(number_of_teams).map(|slot| BOARD_CLASSES[slot])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_sizes_follow_team_count() {
        assert_eq!(board_size(2), Some(25));
        assert_eq!(board_size(3), Some(36));
        assert_eq!(board_size(4), Some(49));
        assert_eq!(board_size(1), None);
        assert_eq!(board_size(5), None);
        assert_eq!(board_class(3), Some("three_players"));
    }
}
