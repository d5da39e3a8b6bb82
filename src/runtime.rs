use std::rc::Rc;

use codenames_core::{GameEvent, SkipReason};

use crate::app_core::AppSnapshot;

/// Observer callbacks a presentation layer hands to a session.
#[derive(Clone)]
pub struct EngineHooks {
    pub on_snapshot: Rc<dyn Fn(&AppSnapshot)>,
    pub on_event: Rc<dyn Fn(&GameEvent)>,
}

impl EngineHooks {
    pub fn empty() -> Self {
        Self {
            on_snapshot: Rc::new(|_| {}),
            on_event: Rc::new(|_| {}),
        }
    }

    pub fn with_snapshot(mut self, hook: impl Fn(&AppSnapshot) + 'static) -> Self {
        self.on_snapshot = Rc::new(hook);
        self
    }

    pub fn with_event(mut self, hook: impl Fn(&GameEvent) + 'static) -> Self {
        self.on_event = Rc::new(hook);
        self
    }
}

impl Default for EngineHooks {
    fn default() -> Self {
        Self::empty()
    }
}

/// Runs `primary` before `secondary` for every callback.
pub fn merge_hooks(primary: EngineHooks, secondary: EngineHooks) -> EngineHooks {
    let snapshot_primary = primary.on_snapshot.clone();
    let snapshot_secondary = secondary.on_snapshot.clone();
    let event_primary = primary.on_event.clone();
    let event_secondary = secondary.on_event.clone();
    EngineHooks {
        on_snapshot: Rc::new(move |snapshot| {
            (snapshot_primary)(snapshot);
            (snapshot_secondary)(snapshot);
        }),
        on_event: Rc::new(move |event| {
            (event_primary)(event);
            (event_secondary)(event);
        }),
    }
}

/// What became of one mutating action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server answered and its snapshot replaced the local one.
    Applied,
    /// A local precondition failed; nothing was sent.
    Skipped(SkipReason),
    /// The request failed; local state is untouched.
    Failed(String),
    /// The answer arrived after teardown and was dropped.
    Discarded,
}
