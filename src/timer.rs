use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use codenames_core::Snapshot;

use crate::app_core::AppCore;
use crate::clock::Clock;

/// Round deadline bookkeeping, independent of any scheduler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    armed_for: Option<(DateTime<Utc>, DateTime<Utc>, u64)>,
    deadline: Option<DateTime<Utc>>,
    enforce: bool,
    frozen_remaining: Option<i64>,
    expired: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the held snapshot. A different round start (or game, or
    /// duration) re-arms; a concluded game freezes what is left.
    pub fn sync(&mut self, snapshot: Option<&Snapshot>, now: DateTime<Utc>) {
        let Some(snapshot) = snapshot else {
            *self = Self::default();
            return;
        };
        let armed_for = match snapshot.round_started_at {
            Some(started) if snapshot.has_timer() => {
                Some((snapshot.created_at, started, snapshot.timer_duration_ms))
            }
            _ => None,
        };
        if armed_for != self.armed_for {
            self.armed_for = armed_for;
            self.deadline = armed_for
                .and_then(|(_, started, duration_ms)| deadline_after(started, duration_ms));
            self.frozen_remaining = None;
            self.expired = false;
            if let Some(deadline) = self.deadline {
                debug!(%deadline, "countdown armed");
            }
        }
        self.enforce = snapshot.enforce_timer;
        if snapshot.concluded() {
            if self.frozen_remaining.is_none() {
                self.frozen_remaining = Some(self.remaining_ms(now).unwrap_or(0));
            }
        } else {
            self.frozen_remaining = None;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_remaining.is_some()
    }

    pub fn enforced(&self) -> bool {
        self.enforce
    }

    /// Milliseconds left, clamped at zero; `None` when no timer runs.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        if let Some(frozen) = self.frozen_remaining {
            return Some(frozen);
        }
        let deadline = self.deadline?;
        Some((deadline - now).num_milliseconds().max(0))
    }

    /// `true` exactly once per armed round, on the first tick at or past the
    /// deadline.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.expired || self.is_frozen() {
            return false;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.expired = true;
                true
            }
            _ => false,
        }
    }
}

/// `None` when the duration does not fit on the calendar; such a round
/// simply has no deadline.
fn deadline_after(started: DateTime<Utc>, duration_ms: u64) -> Option<DateTime<Utc>> {
    let duration_ms = i64::try_from(duration_ms).ok()?;
    let delta = TimeDelta::try_milliseconds(duration_ms)?;
    started.checked_add_signed(delta)
}

pub type ExpirationHandler = Rc<dyn Fn(bool)>;

/// Drives a [`Countdown`] on a fixed local tick.
pub struct CountdownTimer {
    core: Rc<AppCore>,
    clock: Rc<dyn Clock>,
    tick: Duration,
    countdown: Rc<RefCell<Countdown>>,
    running: Cell<bool>,
    task: RefCell<Option<JoinHandle<()>>>,
}

impl CountdownTimer {
    pub fn new(core: Rc<AppCore>, clock: Rc<dyn Clock>, tick: Duration) -> Self {
        Self {
            core,
            clock,
            tick,
            countdown: Rc::new(RefCell::new(Countdown::new())),
            running: Cell::new(false),
            task: RefCell::new(None),
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        let ms = self.countdown.borrow().remaining_ms(self.clock.now())?;
        Some(Duration::from_millis(ms as u64))
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Re-reads the held snapshot right away instead of waiting for a tick.
    pub fn sync(&self) {
        let game = self.core.current_game();
        self.countdown
            .borrow_mut()
            .sync(game.as_deref(), self.clock.now());
    }

    /// `on_expire` receives whether the round end is enforced. Must be called
    /// from inside a `LocalSet`.
    pub fn start(&self, on_expire: ExpirationHandler) {
        if self.running.replace(true) {
            return;
        }
        let core = self.core.clone();
        let clock = self.clock.clone();
        let countdown = self.countdown.clone();
        let period = self.tick;
        let handle = tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let now = clock.now();
                let game = core.current_game();
                let (expired, enforced) = {
                    let mut countdown = countdown.borrow_mut();
                    countdown.sync(game.as_deref(), now);
                    (countdown.tick(now), countdown.enforced())
                };
                if expired {
                    info!(enforced, "round timer expired");
                    core.emit(&codenames_core::GameEvent::TimerExpired { enforced });
                    (on_expire)(enforced);
                }
            }
        });
        *self.task.borrow_mut() = Some(handle);
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let Some(task) = self.task.borrow_mut().take() {
            task.abort();
        }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
