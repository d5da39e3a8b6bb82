mod common;

use std::rc::Rc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use common::*;
use tokio::task::LocalSet;

use codenames::codenames_core::{GameEvent, GameId, Snapshot};
use codenames::{GameSession, ManualClock, SessionOptions};

fn timed(created: i64, started: i64, enforce: bool) -> Snapshot {
    let mut game = board(created, &format!("r{started}"));
    game.round_started_at = Some(at(started));
    game.timer_duration_ms = 5_000;
    game.enforce_timer = enforce;
    game
}

fn mounted(
    transport: &Rc<ScriptedTransport>,
    recorder: &Rc<Recorder>,
    clock: &Rc<ManualClock>,
) -> GameSession {
    let session = GameSession::new(
        GameId::parse(GAME).unwrap(),
        transport.as_transport(),
        SessionOptions {
            clock: clock.clone(),
            hooks: recorder.hooks(),
            ..SessionOptions::default()
        },
    );
    session.mount();
    session
}

fn expirations(recorder: &Recorder) -> usize {
    recorder.count(|e| matches!(e, GameEvent::TimerExpired { .. }))
}

#[tokio::test(start_paused = true)]
async fn enforced_timer_ends_the_turn_exactly_once() {
    LocalSet::new()
        .run_until(async {
            let transport = ScriptedTransport::new();
            transport.serve(timed(0, 0, true));
            let recorder = Recorder::new();
            let clock = Rc::new(ManualClock::new(at(0)));
            let session = mounted(&transport, &recorder, &clock);
            settle().await;

            clock.advance(ChronoDuration::milliseconds(3_000));
            advance(300).await;
            assert_eq!(session.timer().remaining(), Some(Duration::from_millis(2_000)));
            assert_eq!(transport.count(Kind::EndTurn), 0);

            clock.advance(ChronoDuration::milliseconds(2_001));
            advance(300).await;
            assert_eq!(transport.count(Kind::EndTurn), 1);
            assert_eq!(
                recorder.count(|e| *e == GameEvent::TimerExpired { enforced: true }),
                1
            );

            // polling keeps re-applying the same round; no second dispatch
            clock.advance(ChronoDuration::milliseconds(10_000));
            advance(4_100).await;
            assert_eq!(transport.count(Kind::EndTurn), 1);
            assert_eq!(expirations(&recorder), 1);

            // the next round re-arms
            transport.serve(timed(0, 15, true));
            advance(2_000).await;
            clock.set(at(15) + ChronoDuration::milliseconds(1_000));
            advance(300).await;
            assert_eq!(transport.count(Kind::EndTurn), 1);
            clock.set(at(20));
            advance(300).await;
            assert_eq!(transport.count(Kind::EndTurn), 2);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn unenforced_timer_only_reports_expiry() {
    LocalSet::new()
        .run_until(async {
            let transport = ScriptedTransport::new();
            transport.serve(timed(0, 0, false));
            let recorder = Recorder::new();
            let clock = Rc::new(ManualClock::new(at(0)));
            let _session = mounted(&transport, &recorder, &clock);
            settle().await;

            clock.set(at(6));
            advance(300).await;
            assert_eq!(
                recorder.count(|e| *e == GameEvent::TimerExpired { enforced: false }),
                1
            );
            assert_eq!(transport.count(Kind::EndTurn), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn concluded_game_freezes_the_clock() {
    LocalSet::new()
        .run_until(async {
            let transport = ScriptedTransport::new();
            transport.serve(timed(0, 0, true));
            let recorder = Recorder::new();
            let clock = Rc::new(ManualClock::new(at(0)));
            let session = mounted(&transport, &recorder, &clock);
            settle().await;

            clock.set(at(1));
            transport.serve(assassinated(timed(0, 0, true), "done"));
            advance(2_100).await;
            assert!(session.timer().countdown().is_frozen());

            clock.set(at(60));
            advance(300).await;
            assert_eq!(expirations(&recorder), 0);
            assert_eq!(session.timer().remaining(), Some(Duration::from_millis(4_000)));
            assert_eq!(transport.count(Kind::EndTurn), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_the_pending_tick() {
    LocalSet::new()
        .run_until(async {
            let transport = ScriptedTransport::new();
            transport.serve(timed(0, 0, true));
            let recorder = Recorder::new();
            let clock = Rc::new(ManualClock::new(at(0)));
            let session = mounted(&transport, &recorder, &clock);
            settle().await;
            assert!(session.timer().is_running());

            session.teardown();
            assert!(!session.timer().is_running());
            clock.set(at(30));
            advance(1_000).await;
            assert_eq!(expirations(&recorder), 0);
            assert_eq!(transport.count(Kind::EndTurn), 0);
        })
        .await;
}
