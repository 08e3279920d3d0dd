//! Controller context: everything the two tasks share.
//!
//! Built once during boot and handed to both tasks behind an `Arc`.  It
//! owns the command queue, the device state, the link counters and the
//! transport; nothing is reached through globals.

use core::time::Duration;

use crate::config::ControllerConfig;
use crate::diagnostics::{LinkStats, StatsSnapshot};
use crate::error::StartupError;
use crate::link::queue::CommandQueue;
use crate::link::transport::Transport;

use super::state::{DeviceState, SharedState};

pub struct ControllerContext<T> {
    queue: CommandQueue,
    state: SharedState,
    stats: LinkStats,
    transport: T,
    yield_interval: Duration,
}

impl<T: Transport> ControllerContext<T> {
    /// Create the queue and initial state around an initialised transport.
    pub fn new(config: &ControllerConfig, transport: T) -> Result<Self, StartupError> {
        Ok(Self {
            queue: CommandQueue::new(config.queue_capacity)?,
            state: SharedState::new(),
            stats: LinkStats::new(),
            transport,
            yield_interval: Duration::from_millis(u64::from(config.yield_interval_ms)),
        })
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Current device state.
    pub fn state(&self) -> DeviceState {
        self.state.load()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub(super) fn shared_state(&self) -> &SharedState {
        &self.state
    }

    /// Give the scheduler a turn at the end of a task iteration.
    pub(super) fn pause(&self) {
        if self.yield_interval.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.yield_interval);
        }
    }
}
