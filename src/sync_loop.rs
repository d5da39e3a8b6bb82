use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use codenames_core::{GameEvent, GameId, RefreshRequest};

use crate::app_core::{AppCore, SnapshotOrigin};
use crate::transport::GameTransport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Polling,
    Stopped,
}

/// Fixed-cadence refresh loop.
///
/// Each cycle refreshes once, applies the answer (or logs the failure) and
/// then sleeps the poll interval, so a failing server is retried at the same
/// cadence. Stopping bumps the generation; a cycle that wakes up under an
/// older generation drops its response.
pub struct SyncLoop {
    core: Rc<AppCore>,
    transport: Rc<dyn GameTransport>,
    game_id: GameId,
    interval: Duration,
    state: Cell<LoopState>,
    generation: Rc<Cell<u64>>,
    task: RefCell<Option<JoinHandle<()>>>,
}

impl SyncLoop {
    pub fn new(
        core: Rc<AppCore>,
        transport: Rc<dyn GameTransport>,
        game_id: GameId,
        interval: Duration,
    ) -> Self {
        Self {
            core,
            transport,
            game_id,
            interval,
            state: Cell::new(LoopState::Stopped),
            generation: Rc::new(Cell::new(0)),
            task: RefCell::new(None),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state.get()
    }

    /// Must be called from inside a `LocalSet`.
    pub fn start(&self) {
        if self.state.get() == LoopState::Polling {
            return;
        }
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.state.set(LoopState::Polling);
        let cycle = PollCycle {
            core: self.core.clone(),
            transport: self.transport.clone(),
            game_id: self.game_id.clone(),
            interval: self.interval,
            generation: self.generation.clone(),
            started: generation,
        };
        let handle = tokio::task::spawn_local(cycle.run());
        *self.task.borrow_mut() = Some(handle);
    }

    pub fn stop(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.state.set(LoopState::Stopped);
        if let Some(task) = self.task.borrow_mut().take() {
            task.abort();
        }
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

struct PollCycle {
    core: Rc<AppCore>,
    transport: Rc<dyn GameTransport>,
    game_id: GameId,
    interval: Duration,
    generation: Rc<Cell<u64>>,
    started: u64,
}

impl PollCycle {
    fn current(&self) -> bool {
        self.generation.get() == self.started
    }

    async fn run(self) {
        while self.current() {
            let held = self.core.current_game();
            let request = RefreshRequest::new(self.game_id.as_str(), held.as_deref());
            drop(held);
            debug!(game_id = %self.game_id, state_id = %request.state_id, "refresh");
            let result = self.transport.refresh(request).await;
            if !self.current() {
                debug!(game_id = %self.game_id, "dropping refresh answer after stop");
                return;
            }
            match result {
                Ok(snapshot) => {
                    self.core.apply_snapshot(snapshot, SnapshotOrigin::Poll);
                }
                Err(err) => {
                    warn!(game_id = %self.game_id, %err, "refresh failed");
                    self.core.emit(&GameEvent::RefreshFailed {
                        message: err.to_string(),
                    });
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
