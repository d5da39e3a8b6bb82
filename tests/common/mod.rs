#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::oneshot;

use codenames::codenames_core::{
    EndTurnRequest, GameEvent, GuessRequest, NextGameRequest, RefreshRequest, Snapshot, Team,
};
use codenames::{EngineHooks, GameTransport, TransportError, TransportFuture};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Refresh(RefreshRequest),
    Guess(GuessRequest),
    EndTurn(EndTurnRequest),
    NextGame(NextGameRequest),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Refresh,
    Guess,
    EndTurn,
    NextGame,
}

impl Call {
    pub fn kind(&self) -> Kind {
        match self {
            Call::Refresh(_) => Kind::Refresh,
            Call::Guess(_) => Kind::Guess,
            Call::EndTurn(_) => Kind::EndTurn,
            Call::NextGame(_) => Kind::NextGame,
        }
    }
}

type Reply = oneshot::Sender<Result<Snapshot, TransportError>>;

/// In-memory server. Refreshes can be answered automatically; everything
/// else waits until the test replies.
#[derive(Default)]
pub struct ScriptedTransport {
    calls: RefCell<Vec<Call>>,
    waiting: RefCell<VecDeque<(Kind, Reply)>>,
    auto_refresh: RefCell<Option<Result<Snapshot, String>>>,
}

impl ScriptedTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn as_transport(self: &Rc<Self>) -> Rc<dyn GameTransport> {
        self.clone()
    }

    pub fn serve(&self, snapshot: Snapshot) {
        *self.auto_refresh.borrow_mut() = Some(Ok(snapshot));
    }

    pub fn fail_refresh(&self, message: &str) {
        *self.auto_refresh.borrow_mut() = Some(Err(message.to_string()));
    }

    pub fn hold_refresh(&self) {
        *self.auto_refresh.borrow_mut() = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.calls.borrow().iter().filter(|call| call.kind() == kind).count()
    }

    pub fn last(&self, kind: Kind) -> Option<Call> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|call| call.kind() == kind)
            .cloned()
    }

    pub fn waiting(&self, kind: Kind) -> usize {
        self.waiting
            .borrow()
            .iter()
            .filter(|(waiting, _)| *waiting == kind)
            .count()
    }

    /// Answers the oldest waiting call of `kind`; `false` when nobody was
    /// listening any more.
    pub fn reply(&self, kind: Kind, result: Result<Snapshot, TransportError>) -> bool {
        let reply = {
            let mut waiting = self.waiting.borrow_mut();
            let Some(pos) = waiting.iter().position(|(waiting, _)| *waiting == kind) else {
                panic!("no {kind:?} call waiting");
            };
            waiting.remove(pos).map(|(_, reply)| reply)
        };
        match reply {
            Some(reply) => reply.send(result).is_ok(),
            None => false,
        }
    }

    fn call(&self, call: Call) -> TransportFuture<'_> {
        let kind = call.kind();
        self.calls.borrow_mut().push(call);
        if kind == Kind::Refresh {
            if let Some(auto) = self.auto_refresh.borrow().clone() {
                return Box::pin(async move { auto.map_err(TransportError::Unavailable) });
            }
        }
        let (tx, rx) = oneshot::channel();
        self.waiting.borrow_mut().push_back((kind, tx));
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(TransportError::Unavailable("reply dropped".into())))
        })
    }
}

impl GameTransport for ScriptedTransport {
    fn refresh(&self, request: RefreshRequest) -> TransportFuture<'_> {
        self.call(Call::Refresh(request))
    }

    fn guess(&self, request: GuessRequest) -> TransportFuture<'_> {
        self.call(Call::Guess(request))
    }

    fn end_turn(&self, request: EndTurnRequest) -> TransportFuture<'_> {
        self.call(Call::EndTurn(request))
    }

    fn next_game(&self, request: NextGameRequest) -> TransportFuture<'_> {
        self.call(Call::NextGame(request))
    }
}

pub const GAME: &str = "lobby-7";

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// Fresh two-team 5x5 board; red starts and owns the even cells.
pub fn board(created: i64, state_id: &str) -> Snapshot {
    let words: Vec<String> = (0..25).map(|idx| format!("WORD{idx}")).collect();
    let layout = (0..25)
        .map(|idx| match idx {
            24 => Team::Black,
            idx if idx >= 18 => Team::Neutral,
            idx if idx % 2 == 0 => Team::Red,
            _ => Team::Blue,
        })
        .collect();
    Snapshot {
        id: GAME.into(),
        state_id: state_id.into(),
        created_at: at(created),
        updated_at: None,
        teams: vec![Team::Red, Team::Blue],
        order: vec![Team::Red, Team::Blue],
        turn_index: 0,
        words: words.clone(),
        layout,
        revealed: vec![false; 25],
        winners: Vec::new(),
        losers: Vec::new(),
        round: 0,
        round_started_at: Some(at(created)),
        timer_duration_ms: 0,
        enforce_timer: false,
        winning_team: None,
        starting_team: Some(Team::Red),
        number_of_teams: 2,
        word_set: words,
        seed: 11,
        perm_index: 0,
        words_per_game: 25,
    }
}

pub fn revealed(mut snapshot: Snapshot, idx: usize, state_id: &str) -> Snapshot {
    snapshot.revealed[idx] = true;
    snapshot.state_id = state_id.into();
    snapshot
}

/// Red hit the assassin; blue is the only team left.
pub fn assassinated(snapshot: Snapshot, state_id: &str) -> Snapshot {
    let mut snapshot = revealed(snapshot, 24, state_id);
    snapshot.order = vec![Team::Blue];
    snapshot.turn_index = 0;
    snapshot.winners = vec![Team::Blue];
    snapshot.losers = vec![Team::Red];
    snapshot
}

/// Events and snapshots seen by a presentation observer.
#[derive(Default)]
pub struct Recorder {
    pub events: RefCell<Vec<GameEvent>>,
    pub snapshots: RefCell<usize>,
}

impl Recorder {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn hooks(self: &Rc<Self>) -> EngineHooks {
        let events = self.clone();
        let snapshots = self.clone();
        EngineHooks::empty()
            .with_event(move |event| events.events.borrow_mut().push(event.clone()))
            .with_snapshot(move |_| *snapshots.snapshots.borrow_mut() += 1)
    }

    pub fn count(&self, matches: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| matches(event)).count()
    }
}

/// Lets spawned local tasks run without moving the clock.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Moves paused tokio time forward and lets everything woken run.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    settle().await;
}
