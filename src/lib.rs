//! Client engine for a team word-guessing game played against an HTTP game
//! server: polling, turn actions, round timer and local view state.

pub mod app_core;
pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod http_transport;
pub mod input;
pub mod persisted;
pub mod persisted_store;
pub mod runtime;
pub mod session;
pub mod sync_loop;
pub mod timer;
pub mod transport;

pub use app_core::{
    AppCore, AppSnapshot, AppSubscription, ApplyResult, EventSubscription, SnapshotOrigin,
    ViewMode,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use dispatcher::Dispatcher;
pub use http_transport::HttpTransport;
pub use input::{parse_key, InputHub, KeyListener};
pub use persisted::Settings;
pub use persisted_store::{FileSettingsStore, MemorySettingsStore, SettingsError, SettingsStore};
pub use runtime::{merge_hooks, ActionOutcome, EngineHooks};
pub use session::{GameSession, SessionOptions};
pub use sync_loop::{LoopState, SyncLoop};
pub use timer::{Countdown, CountdownTimer};
pub use transport::{GameTransport, TransportError, TransportFuture};

pub use codenames_core;
