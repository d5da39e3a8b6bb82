use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use codenames_core::{
    ActionKind, EndTurnRequest, GameEvent, GuessRequest, NextGameRequest, SkipReason,
    Snapshot,
};

use crate::app_core::{AppCore, ApplyResult, SnapshotOrigin};
use crate::runtime::ActionOutcome;
use crate::transport::{GameTransport, TransportError};

type GuessKey = (DateTime<Utc>, usize);

/// Checks local preconditions for the three mutating actions, sends them and
/// applies whatever snapshot comes back.
///
/// Requests address the game by the held snapshot's `id`, which may differ
/// from the id the session was opened with.
///
/// A guess stays in flight from send until its answer lands; asking for the
/// same cell of the same game meanwhile is skipped without a request.
pub struct Dispatcher {
    core: Rc<AppCore>,
    transport: Rc<dyn GameTransport>,
    in_flight: RefCell<HashSet<GuessKey>>,
}

impl Dispatcher {
    pub fn new(core: Rc<AppCore>, transport: Rc<dyn GameTransport>) -> Self {
        Self {
            core,
            transport,
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    fn mounted_game(&self) -> Result<Rc<Snapshot>, SkipReason> {
        if !self.core.is_mounted() {
            return Err(SkipReason::TornDown);
        }
        self.core.current_game().ok_or(SkipReason::NoSnapshot)
    }

    pub fn guess_in_flight(&self, index: usize) -> bool {
        self.core.current_game().is_some_and(|game| {
            self.in_flight.borrow().contains(&(game.created_at, index))
        })
    }

    pub async fn guess(&self, index: usize) -> ActionOutcome {
        let game = match self.mounted_game() {
            Ok(game) => game,
            Err(reason) => return ActionOutcome::Skipped(reason),
        };
        let app = self.core.snapshot();
        if app.view_context().guessing_blocked() {
            return ActionOutcome::Skipped(SkipReason::CodemasterMayNotGuess);
        }
        if index >= game.words.len() {
            return ActionOutcome::Skipped(SkipReason::OutOfRange);
        }
        if game.is_revealed(index) {
            return ActionOutcome::Skipped(SkipReason::AlreadyRevealed);
        }
        if game.is_finished() {
            return ActionOutcome::Skipped(SkipReason::GameFinished);
        }
        let key = (game.created_at, index);
        if !self.in_flight.borrow_mut().insert(key) {
            debug!(index, "guess already in flight");
            return ActionOutcome::Skipped(SkipReason::GuessInFlight);
        }
        drop(app);
        let request = GuessRequest {
            game_id: game.id.clone(),
            index,
        };
        drop(game);
        let result = self.transport.guess(request).await;
        self.in_flight.borrow_mut().remove(&key);
        self.finish(ActionKind::Guess, result, SnapshotOrigin::Action)
    }

    pub async fn end_turn(&self) -> ActionOutcome {
        let game = match self.mounted_game() {
            Ok(game) => game,
            Err(reason) => return ActionOutcome::Skipped(reason),
        };
        let request = EndTurnRequest {
            game_id: game.id.clone(),
            current_round: game.round,
        };
        drop(game);
        let result = self.transport.end_turn(request).await;
        self.finish(ActionKind::EndTurn, result, SnapshotOrigin::Action)
    }

    /// Replaying the current configuration; an unfinished game is only
    /// replaced once the caller has confirmed.
    pub async fn next_game(&self, create_new: bool, confirmed: bool) -> ActionOutcome {
        let game = match self.mounted_game() {
            Ok(game) => game,
            Err(reason) => return ActionOutcome::Skipped(reason),
        };
        if !game.is_finished() && !confirmed {
            return ActionOutcome::Skipped(SkipReason::NeedsConfirmation);
        }
        let request = NextGameRequest::from_snapshot(&game, create_new);
        drop(game);
        self.send_next_game(request).await
    }

    /// Lobby entry point; works before any snapshot is held.
    pub async fn send_next_game(&self, request: NextGameRequest) -> ActionOutcome {
        if !self.core.is_mounted() {
            return ActionOutcome::Skipped(SkipReason::TornDown);
        }
        let result = self.transport.next_game(request).await;
        self.finish(ActionKind::NextGame, result, SnapshotOrigin::NextGame)
    }

    fn finish(
        &self,
        action: ActionKind,
        result: Result<Snapshot, TransportError>,
        origin: SnapshotOrigin,
    ) -> ActionOutcome {
        match result {
            Ok(snapshot) => match self.core.apply_snapshot(snapshot, origin) {
                ApplyResult::Discarded => ActionOutcome::Discarded,
                ApplyResult::Changed | ApplyResult::Unchanged => ActionOutcome::Applied,
            },
            Err(err) => {
                warn!(%action, %err, "action failed");
                let message = err.to_string();
                if self.core.is_mounted() {
                    self.core.emit(&GameEvent::ActionFailed {
                        action,
                        message: message.clone(),
                    });
                }
                ActionOutcome::Failed(message)
            }
        }
    }
}
