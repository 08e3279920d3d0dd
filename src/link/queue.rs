//! Command queue between the receiver and controller tasks.
//!
//! Wraps an `embassy-sync` bounded channel of one-byte command codes.  The
//! storage is sized for [`MAX_QUEUE_CAPACITY`]; the configured capacity is
//! enforced on insertion so the queue depth stays a runtime setting.
//!
//! ```text
//! ┌──────────┐ try_push (zero wait) ┌────────────┐ pop (waits forever)
//! │ Receiver │─────────────────────▶│  u8 codes  │───────────────────▶ Controller
//! └──────────┘                      └────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::MAX_QUEUE_CAPACITY;
use crate::error::StartupError;

/// Insertion refused because the queue is at capacity; carries the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull(pub u8);

/// Bounded FIFO of command codes.
pub struct CommandQueue {
    channel: Channel<CriticalSectionRawMutex, u8, MAX_QUEUE_CAPACITY>,
    capacity: usize,
}

impl CommandQueue {
    /// Create a queue holding at most `capacity` pending codes.
    pub fn new(capacity: usize) -> Result<Self, StartupError> {
        if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
            return Err(StartupError::QueueCreate);
        }
        Ok(Self {
            channel: Channel::new(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Insert without waiting.
    ///
    /// The capacity check and the send are not one atomic step; that is
    /// sound only because the receiver task is the sole producer.
    pub fn try_push(&self, code: u8) -> Result<(), QueueFull> {
        if self.is_full() {
            return Err(QueueFull(code));
        }
        self.channel.try_send(code).map_err(|_| QueueFull(code))
    }

    /// Wait for the next code.
    pub async fn pop(&self) -> u8 {
        self.channel.receive().await
    }

    /// Block the calling task until a code is available.
    pub fn pop_blocking(&self) -> u8 {
        futures_lite::future::block_on(self.pop())
    }

    /// Take the next code if one is pending.
    pub fn try_pop(&self) -> Option<u8> {
        self.channel.try_receive().ok()
    }
}
