use std::time::Duration;

pub const POLL_INTERVAL_MS: u64 = 2000;
pub const TIMER_TICK_MS: u64 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay between the end of one refresh and the start of the next.
    pub poll_interval: Duration,
    pub timer_tick: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            timer_tick: Duration::from_millis(TIMER_TICK_MS),
        }
    }
}
