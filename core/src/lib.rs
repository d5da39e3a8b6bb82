pub mod action;
pub mod catalog;
pub mod codec;
pub mod events;
pub mod game;
pub mod game_id;
pub mod grid;
pub mod lobby;
pub mod protocol;
pub mod score;
pub mod snapshot;

pub use action::{ActionKind, CoreAction, Key, Role, SettingKey, SkipReason};
pub use catalog::{team_palette, TEAM_PALETTE};
pub use codec::{decode, decode_json, encode, encode_json};
pub use events::{diff_events, GameEvent};
pub use game::{
    board_view, cell_aria_label, cell_category_visible, cell_interactive, end_turn_available,
    score_aria_label, status_line, team_badges, BoardView, CellView, TeamBadge, ViewContext,
};
pub use game_id::{GameId, GameIdError, GAME_ID_MAX_LEN};
pub use grid::{board_class, board_columns, board_size, MAX_TEAMS, MIN_TEAMS};
pub use lobby::{parse_custom_words, LobbyError, NewGameOptions, TimerSetting, MIN_WORD_SET_LEN};
pub use protocol::{
    EndTurnRequest, GuessRequest, NextGameRequest, RefreshRequest, END_TURN_PATH, GUESS_PATH,
    NEXT_GAME_PATH, REFRESH_PATH,
};
pub use score::{final_scores, Scores};
pub use snapshot::{merge_snapshot, Snapshot, SnapshotError, Team};
