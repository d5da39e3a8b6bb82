use codenames_core::{
    decode_json, encode_json, parse_custom_words, GameId, GameIdError, LobbyError,
    NewGameOptions, NextGameRequest, RefreshRequest, Snapshot, Team, TimerSetting,
};

const SERVER_PAYLOAD: &str = r#"{
    "seed": 42,
    "perm_index": 0,
    "round": 3,
    "turn_index": 1,
    "revealed": [true, false, false, false],
    "word_set": ["alpha", "beta", "gamma", "delta", "epsilon"],
    "words_per_game": 4,
    "id": "friday-night",
    "created_at": "2024-05-01T14:00:00.123456789+02:00",
    "updated_at": "2024-05-01T14:05:00+02:00",
    "starting_team": "neutral",
    "words": ["ALPHA", "BETA", "GAMMA", "DELTA"],
    "layout": ["red", "blue", "black", "purple"],
    "round_started_at": "2024-05-01T14:04:00+02:00",
    "teams": ["blue", "red"],
    "order": ["blue", "red"],
    "winners": [],
    "losers": [],
    "timer_duration_ms": 60000,
    "enforce_timer": true,
    "number_of_teams": 2,
    "state_id": "1714565100000000000"
}"#;

#[test]
fn decodes_server_snapshot() {
    let snapshot: Snapshot = decode_json(SERVER_PAYLOAD.as_bytes()).expect("decode snapshot");
    assert_eq!(snapshot.id, "friday-night");
    assert_eq!(snapshot.current_team(), Some(Team::Red));
    assert_eq!(snapshot.layout[3], Team::Neutral);
    assert_eq!(snapshot.layout[2], Team::Black);
    assert_eq!(snapshot.round, 3);
    assert!(snapshot.enforce_timer);
    assert_eq!(snapshot.timer_duration_ms, 60_000);
    assert_eq!(snapshot.winning_team, None);
    assert_eq!(snapshot.created_at.to_rfc3339(), "2024-05-01T12:00:00.123456789+00:00");
}

#[test]
fn omitted_optional_fields_default() {
    let payload = r#"{
        "id": "g",
        "created_at": "2024-05-01T12:00:00Z",
        "teams": ["red", "blue"],
        "order": ["red", "blue"],
        "words": ["a"],
        "layout": ["red"],
        "revealed": [false]
    }"#;
    let snapshot: Snapshot = decode_json(payload.as_bytes()).expect("decode snapshot");
    assert_eq!(snapshot.state_id, "");
    assert_eq!(snapshot.timer_duration_ms, 0);
    assert!(!snapshot.has_timer());
    assert_eq!(snapshot.effective_number_of_teams(), 2);
}

#[test]
fn winning_team_survives_reencoding() {
    let mut snapshot: Snapshot = decode_json(SERVER_PAYLOAD.as_bytes()).expect("decode snapshot");
    snapshot.winning_team = Some(Team::Blue);
    let bytes = encode_json(&snapshot).expect("encode snapshot");
    let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json value");
    assert_eq!(value["winning_team"], "blue");
    assert_eq!(value["layout"][2], "black");
}

#[test]
fn refresh_request_carries_state_token() {
    let snapshot: Snapshot = decode_json(SERVER_PAYLOAD.as_bytes()).expect("decode snapshot");
    let empty = RefreshRequest::new("friday-night", None);
    assert_eq!(empty.state_id, "");
    let held = RefreshRequest::new("friday-night", Some(&snapshot));
    assert_eq!(held.state_id, "1714565100000000000");
    let body = serde_json::to_value(&held).expect("json");
    assert_eq!(
        body,
        serde_json::json!({"game_id": "friday-night", "state_id": "1714565100000000000"})
    );
}

#[test]
fn next_game_echoes_configuration() {
    let snapshot: Snapshot = decode_json(SERVER_PAYLOAD.as_bytes()).expect("decode snapshot");
    let request = NextGameRequest::from_snapshot(&snapshot, true);
    assert_eq!(request.game_id, "friday-night");
    assert!(request.create_new);
    assert_eq!(request.number_of_teams, 2);
    assert_eq!(request.word_set.len(), 5);
    assert!(request.enforce_timer);
}

#[test]
fn game_id_rules() {
    assert_eq!(GameId::parse("  pizza-party ").unwrap().as_str(), "pizza-party");
    assert_eq!(GameId::parse("   "), Err(GameIdError::Empty));
    assert_eq!(
        GameId::parse("a/b"),
        Err(GameIdError::InvalidCharacter { ch: '/', index: 1 })
    );
    assert!(matches!(
        GameId::parse(&"x".repeat(65)),
        Err(GameIdError::TooLong { .. })
    ));
}

fn words(count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("word{idx}")).collect()
}

#[test]
fn lobby_builds_join_request() {
    let options = NewGameOptions {
        game_id: "pizza".to_string(),
        word_sets: vec![words(20), words(10)],
        number_of_teams: 3,
        timer: Some(TimerSetting {
            minutes: 1,
            seconds: 30,
        }),
        enforce_timer: true,
    };
    let request = options.into_request().expect("valid options");
    assert!(!request.create_new);
    assert_eq!(request.word_set.len(), 30);
    assert_eq!(request.timer_duration_ms, 90_000);
    assert!(request.enforce_timer);
}

#[test]
fn lobby_rejects_small_word_sets_and_bad_team_counts() {
    let mut options = NewGameOptions {
        game_id: "pizza".to_string(),
        word_sets: vec![words(24)],
        number_of_teams: 2,
        timer: None,
        enforce_timer: true,
    };
    assert_eq!(
        options.clone().into_request(),
        Err(LobbyError::NotEnoughWords {
            found: 24,
            required: 25
        })
    );
    options.word_sets.push(words(1));
    let request = options.clone().into_request().expect("valid options");
    assert!(!request.enforce_timer);
    options.number_of_teams = 5;
    assert_eq!(options.into_request(), Err(LobbyError::TeamCount(5)));
}

#[test]
fn custom_words_split_on_commas() {
    assert_eq!(
        parse_custom_words(" apple, banana ,,cherry , "),
        vec!["apple", "banana", "cherry"]
    );
    assert!(parse_custom_words("").is_empty());
}
