//! Talks to a real game server; skipped unless `CODENAMES_BASE_URL` is set.

use codenames::codenames_core::{GuessRequest, NewGameOptions, RefreshRequest};
use codenames::{GameTransport, HttpTransport};

fn base_url() -> Option<String> {
    std::env::var("CODENAMES_BASE_URL").ok().filter(|url| !url.trim().is_empty())
}

fn words() -> Vec<String> {
    (0..40).map(|idx| format!("livetest{idx}")).collect()
}

#[tokio::test]
async fn join_refresh_and_guess() {
    let Some(base_url) = base_url() else {
        eprintln!("CODENAMES_BASE_URL not set; skipping");
        return;
    };
    let transport = HttpTransport::new(&base_url).expect("base url");
    let game_id = format!("cli-live-{}", std::process::id());
    let request = NewGameOptions {
        game_id: game_id.clone(),
        word_sets: vec![words()],
        number_of_teams: 2,
        timer: None,
        enforce_timer: false,
    }
    .into_request()
    .expect("valid options");

    let joined = transport.next_game(request).await.expect("join");
    assert_eq!(joined.id, game_id);
    assert_eq!(joined.words.len(), joined.layout.len());
    assert!(joined.validate().is_ok());

    let refreshed = transport
        .refresh(RefreshRequest::new(&game_id, Some(&joined)))
        .await
        .expect("refresh");
    assert_eq!(refreshed.created_at, joined.created_at);

    let guessed = transport
        .guess(GuessRequest {
            game_id: game_id.clone(),
            index: 0,
        })
        .await
        .expect("guess");
    assert!(guessed.is_revealed(0));
}
