use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use codenames_core::{CoreAction, GameId, Key, NextGameRequest, SkipReason};

use crate::app_core::{AppCore, AppSubscription, EventSubscription, ViewMode};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::dispatcher::Dispatcher;
use crate::input::{InputHub, KeyListener};
use crate::persisted_store::{MemorySettingsStore, SettingsStore};
use crate::runtime::{merge_hooks, ActionOutcome, EngineHooks};
use crate::sync_loop::{LoopState, SyncLoop};
use crate::timer::CountdownTimer;
use crate::transport::GameTransport;

pub struct SessionOptions {
    pub config: EngineConfig,
    pub clock: Rc<dyn Clock>,
    pub settings_store: Rc<dyn SettingsStore>,
    pub input: InputHub,
    pub hooks: EngineHooks,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            clock: Rc::new(SystemClock),
            settings_store: Rc::new(MemorySettingsStore::new()),
            input: InputHub::new(),
            hooks: EngineHooks::empty(),
        }
    }
}

/// Registrations that only live between mount and teardown.
struct Attached {
    _key_listener: KeyListener,
    _snapshots: AppSubscription,
    _events: EventSubscription,
}

/// One mounted game view: the controller plus the loop, timer and dispatcher
/// that feed it.
///
/// Everything runs on the current thread; `mount` and `handle_action` must be
/// called from inside a `tokio::task::LocalSet`.
pub struct GameSession {
    game_id: GameId,
    core: Rc<AppCore>,
    dispatcher: Rc<Dispatcher>,
    sync_loop: SyncLoop,
    timer: Rc<CountdownTimer>,
    input: InputHub,
    settings_store: Rc<dyn SettingsStore>,
    hooks: EngineHooks,
    attached: RefCell<Option<Attached>>,
}

impl GameSession {
    pub fn new(game_id: GameId, transport: Rc<dyn GameTransport>, options: SessionOptions) -> Self {
        let core = AppCore::new();
        let dispatcher = Rc::new(Dispatcher::new(core.clone(), transport.clone()));
        let sync_loop = SyncLoop::new(
            core.clone(),
            transport,
            game_id.clone(),
            options.config.poll_interval,
        );
        let timer = Rc::new(CountdownTimer::new(
            core.clone(),
            options.clock,
            options.config.timer_tick,
        ));
        Self {
            game_id,
            core,
            dispatcher,
            sync_loop,
            timer,
            input: options.input,
            settings_store: options.settings_store,
            hooks: options.hooks,
            attached: RefCell::new(None),
        }
    }

    pub fn core(&self) -> Rc<AppCore> {
        self.core.clone()
    }

    pub fn dispatcher(&self) -> Rc<Dispatcher> {
        self.dispatcher.clone()
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn loop_state(&self) -> LoopState {
        self.sync_loop.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.attached.borrow().is_some()
    }

    pub fn mount(&self) {
        if self.is_mounted() {
            return;
        }
        let timer = Rc::downgrade(&self.timer);
        let internal = EngineHooks::empty().with_snapshot(move |_| {
            if let Some(timer) = timer.upgrade() {
                timer.sync();
            }
        });
        let hooks = merge_hooks(internal, self.hooks.clone());
        let snapshots = self.core.subscribe(hooks.on_snapshot.clone());
        let events = self.core.subscribe_events(hooks.on_event.clone());

        let core = Rc::downgrade(&self.core);
        let key_listener = self.input.add_listener(Rc::new(move |key| {
            if key == Key::Escape {
                if let Some(core) = core.upgrade() {
                    core.set_mode(ViewMode::Game);
                }
            }
        }));

        *self.attached.borrow_mut() = Some(Attached {
            _key_listener: key_listener,
            _snapshots: snapshots,
            _events: events,
        });
        self.core.mount(self.settings_store.load());
        self.sync_loop.start();
        self.timer.start(expiration_handler(Rc::downgrade(&self.dispatcher)));
        info!(game_id = %self.game_id, "session mounted");
    }

    /// Stops polling, discards late answers, cancels the timer and releases
    /// the key listener and observers.
    pub fn teardown(&self) {
        let Some(attached) = self.attached.borrow_mut().take() else {
            return;
        };
        self.sync_loop.stop();
        self.core.unmount();
        self.timer.stop();
        drop(attached);
        info!(game_id = %self.game_id, "session torn down");
    }

    /// Fire-and-forget entry point for the presentation layer.
    pub fn handle_action(&self, action: CoreAction) {
        match action {
            CoreAction::Guess { .. } | CoreAction::EndTurn | CoreAction::NextGame { .. } => {
                let dispatcher = self.dispatcher.clone();
                tokio::task::spawn_local(async move {
                    let outcome = dispatch(&dispatcher, action).await;
                    debug!(?outcome, "action settled");
                });
            }
            local => {
                self.apply_local(local);
            }
        }
    }

    /// Like [`GameSession::handle_action`] but waits for the outcome.
    pub async fn perform(&self, action: CoreAction) -> ActionOutcome {
        match action {
            CoreAction::Guess { .. } | CoreAction::EndTurn | CoreAction::NextGame { .. } => {
                dispatch(&self.dispatcher, action).await
            }
            local => self.apply_local(local),
        }
    }

    /// Join-or-create from the lobby.
    pub async fn join(&self, request: NextGameRequest) -> ActionOutcome {
        self.dispatcher.send_next_game(request).await
    }

    fn apply_local(&self, action: CoreAction) -> ActionOutcome {
        if !self.core.is_mounted() {
            return ActionOutcome::Skipped(SkipReason::TornDown);
        }
        match action {
            CoreAction::SetRole(role) => self.core.set_role(role),
            CoreAction::ToggleSetting(key) => {
                let settings = self.core.toggle_setting(key);
                if let Err(err) = self.settings_store.save(&settings) {
                    warn!(%err, "settings not saved");
                }
            }
            CoreAction::ToggleSettingsView => self.core.toggle_settings_view(),
            CoreAction::KeyDown(key) => self.input.dispatch(key),
            CoreAction::Guess { .. } | CoreAction::EndTurn | CoreAction::NextGame { .. } => {}
        }
        ActionOutcome::Applied
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn dispatch(dispatcher: &Dispatcher, action: CoreAction) -> ActionOutcome {
    match action {
        CoreAction::Guess { index } => dispatcher.guess(index).await,
        CoreAction::EndTurn => dispatcher.end_turn().await,
        CoreAction::NextGame { confirmed } => dispatcher.next_game(true, confirmed).await,
        _ => ActionOutcome::Applied,
    }
}

fn expiration_handler(dispatcher: Weak<Dispatcher>) -> Rc<dyn Fn(bool)> {
    Rc::new(move |enforced| {
        if !enforced {
            return;
        }
        let Some(dispatcher) = dispatcher.upgrade() else {
            return;
        };
        tokio::task::spawn_local(async move {
            let outcome = dispatcher.end_turn().await;
            debug!(?outcome, "timed end of turn");
        });
    })
}
