//! Controller configuration
//!
//! Sizing and scheduling parameters supplied to [`boot`](crate::runtime::boot).
//! Baud rate and pin assignment are fixed in [`pins`](crate::pins) and are
//! not part of the runtime configuration.

use serde::{Deserialize, Serialize};

use crate::error::StartupError;

/// Hard ceiling on pending commands; the queue storage is sized for this.
pub const MAX_QUEUE_CAPACITY: usize = 64;

/// Smallest per-task stack reservation accepted.  This is ESP-IDF's default
/// pthread stack; formatted logging alone needs most of it.
pub const MIN_TASK_STACK_BYTES: usize = 3 * 1024;

/// Largest per-task stack reservation accepted.
pub const MAX_TASK_STACK_BYTES: usize = 64 * 1024;

/// Longest per-iteration yield accepted.
pub const MAX_YIELD_INTERVAL_MS: u32 = 100;

/// Core controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Queue ---
    /// Maximum number of pending commands between receiver and controller
    pub queue_capacity: usize,

    // --- Tasks ---
    /// Stack reserved for each of the two tasks (bytes)
    pub task_stack_bytes: usize,
    /// Priority shared by both tasks
    pub task_priority: u8,
    /// Delay after every task loop iteration (milliseconds, 0 = plain yield)
    pub yield_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            task_stack_bytes: 4 * 1024,
            task_priority: 5,
            yield_interval_ms: 1,
        }
    }
}

impl ControllerConfig {
    /// Reject configurations the runtime cannot honour.
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.queue_capacity == 0 {
            return Err(StartupError::Config("queue_capacity must be at least 1"));
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(StartupError::Config("queue_capacity exceeds MAX_QUEUE_CAPACITY"));
        }
        if !(MIN_TASK_STACK_BYTES..=MAX_TASK_STACK_BYTES).contains(&self.task_stack_bytes) {
            return Err(StartupError::Config("task_stack_bytes out of range"));
        }
        if self.yield_interval_ms > MAX_YIELD_INTERVAL_MS {
            return Err(StartupError::Config("yield_interval_ms out of range"));
        }
        Ok(())
    }
}
