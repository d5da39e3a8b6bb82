use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use codenames_core::{
    board_view, diff_events, final_scores, merge_snapshot, BoardView, GameEvent, Role,
    Scores, SettingKey, Snapshot, ViewContext,
};

use crate::persisted::Settings;

pub type AppSubscriber = Rc<dyn Fn(&AppSnapshot)>;
pub type EventSubscriber = Rc<dyn Fn(&GameEvent)>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ViewMode {
    #[default]
    Game,
    Settings,
}

/// Which writer produced a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotOrigin {
    Poll,
    Action,
    NextGame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Changed,
    Unchanged,
    Discarded,
}

/// Everything a view needs, cloned out of the controller in one piece.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AppSnapshot {
    pub game: Option<Rc<Snapshot>>,
    pub codemaster: bool,
    pub mode: ViewMode,
    pub settings: Settings,
    pub scores: Scores,
    pub mounted: bool,
}

impl AppSnapshot {
    pub fn role(&self) -> Role {
        if self.codemaster {
            Role::Codemaster
        } else {
            Role::Player
        }
    }

    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            codemaster: self.codemaster,
            spymaster_may_guess: self.settings.spymaster_may_guess,
        }
    }

    pub fn board_view(&self) -> Option<BoardView> {
        let game = self.game.as_deref()?;
        Some(board_view(game, &self.view_context()))
    }
}

#[derive(Default)]
struct AppState {
    game: Option<Rc<Snapshot>>,
    codemaster: bool,
    mode: ViewMode,
    settings: Settings,
    scores: Scores,
    mounted: bool,
    scored_game: Option<(String, DateTime<Utc>)>,
}

impl AppState {
    fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            game: self.game.clone(),
            codemaster: self.codemaster,
            mode: self.mode,
            settings: self.settings,
            scores: self.scores.clone(),
            mounted: self.mounted,
        }
    }
}

/// Single owner of the applied snapshot and the viewer's local state.
///
/// Every write replaces the game snapshot whole, so readers never see a
/// half-applied state. Subscribers run after the borrow is released and may
/// read back through [`AppCore::snapshot`].
pub struct AppCore {
    state: RefCell<AppState>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
    event_subscribers: Rc<RefCell<Vec<EventSubscriber>>>,
}

impl AppCore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(AppState::default()),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            event_subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        Subscription {
            item: subscriber,
            list: Rc::clone(&self.subscribers),
        }
    }

    pub fn subscribe_events(&self, subscriber: EventSubscriber) -> EventSubscription {
        self.event_subscribers.borrow_mut().push(subscriber.clone());
        Subscription {
            item: subscriber,
            list: Rc::clone(&self.event_subscribers),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.state.borrow().snapshot()
    }

    pub fn current_game(&self) -> Option<Rc<Snapshot>> {
        self.state.borrow().game.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    pub(crate) fn mount(&self, settings: Settings) {
        {
            let mut state = self.state.borrow_mut();
            state.mounted = true;
            state.settings = settings;
            state.mode = ViewMode::Game;
        }
        self.notify();
    }

    pub(crate) fn unmount(&self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.mounted {
                return;
            }
            state.mounted = false;
        }
        self.notify();
    }

    /// Replaces the held snapshot with `next`.
    ///
    /// A new game instance, or any snapshot produced by a next-game request,
    /// drops the viewer back to the player role. Scores for a game are added
    /// the first time that game is seen finished.
    pub fn apply_snapshot(&self, next: Snapshot, origin: SnapshotOrigin) -> ApplyResult {
        let (changed, events) = {
            let mut state = self.state.borrow_mut();
            if !state.mounted {
                warn!(?origin, id = %next.id, "discarding snapshot after teardown");
                return ApplyResult::Discarded;
            }
            if let Err(err) = next.validate() {
                warn!(%err, id = %next.id, "server sent an inconsistent snapshot");
            }
            let previous = state.game.take();
            let merged = merge_snapshot(previous.as_deref(), next);
            let mut events = diff_events(previous.as_deref(), &merged);

            let new_instance = previous
                .as_deref()
                .is_some_and(|prev| prev.created_at != merged.created_at);
            if (new_instance || origin == SnapshotOrigin::NextGame) && state.codemaster {
                state.codemaster = false;
                events.push(GameEvent::RoleReset);
            }
            if new_instance || previous.is_none() {
                info!(id = %merged.id, created_at = %merged.created_at, "game instance");
            }

            if merged.is_finished() {
                let key = (merged.id.clone(), merged.created_at);
                if state.scored_game.as_ref() != Some(&key) {
                    let points = final_scores(&merged.teams, &merged.winners, &merged.losers);
                    state.scores.add(&points);
                    state.scored_game = Some(key);
                    info!(winners = ?merged.winners, losers = ?merged.losers, "game ended");
                    events.push(GameEvent::ScoresUpdated(state.scores.clone()));
                }
            }

            let changed = match previous.as_deref() {
                None => true,
                Some(prev)
                    if !prev.state_id.is_empty()
                        && prev.state_id == merged.state_id
                        && prev.same_instance(&merged) =>
                {
                    false
                }
                Some(prev) => prev != &merged,
            } || events.contains(&GameEvent::RoleReset);
            debug!(?origin, state_id = %merged.state_id, changed, "snapshot applied");
            state.game = Some(Rc::new(merged));
            (changed, events)
        };
        for event in &events {
            self.emit(event);
        }
        if changed {
            self.notify();
            ApplyResult::Changed
        } else {
            ApplyResult::Unchanged
        }
    }

    pub fn set_role(&self, role: Role) {
        let codemaster = role.is_codemaster();
        {
            let mut state = self.state.borrow_mut();
            if state.codemaster == codemaster {
                return;
            }
            state.codemaster = codemaster;
        }
        self.notify();
    }

    pub fn set_mode(&self, mode: ViewMode) {
        {
            let mut state = self.state.borrow_mut();
            if state.mode == mode {
                return;
            }
            state.mode = mode;
        }
        self.notify();
    }

    pub fn toggle_settings_view(&self) {
        let next = match self.state.borrow().mode {
            ViewMode::Game => ViewMode::Settings,
            ViewMode::Settings => ViewMode::Game,
        };
        self.set_mode(next);
    }

    /// Flips one setting and returns the full set to persist.
    pub fn toggle_setting(&self, key: SettingKey) -> Settings {
        let settings = {
            let mut state = self.state.borrow_mut();
            state.settings.toggle(key);
            state.settings
        };
        self.notify();
        settings
    }

    pub fn emit(&self, event: &GameEvent) {
        let subscribers = self.event_subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)(event);
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)(&snapshot);
        }
    }
}

/// Keeps a callback registered until dropped.
pub struct Subscription<T: ?Sized> {
    item: Rc<T>,
    list: Rc<RefCell<Vec<Rc<T>>>>,
}

pub type AppSubscription = Subscription<dyn Fn(&AppSnapshot)>;
pub type EventSubscription = Subscription<dyn Fn(&GameEvent)>;

impl<T: ?Sized> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut list = self.list.borrow_mut();
        list.retain(|item| !Rc::ptr_eq(item, &self.item));
    }
}
