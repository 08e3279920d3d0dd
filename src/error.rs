//! Unified error types for the relay controller.
//!
//! Only startup can fail in a way that escapes the core: [`boot`] ends in
//! the halted state carrying a [`StartupError`], and the caller halts.
//! Runtime faults (transport errors, queue saturation, noise) are absorbed
//! locally by the tasks and never surface as values.  All variants are
//! `Copy`.
//!
//! [`boot`]: crate::runtime::boot

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A step of the boot sequence failed; the system must halt.
    Startup(StartupError),
    /// The byte transport reported a line or driver fault.
    Transport(TransportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup(e) => write!(f, "startup: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

/// The boot step that failed.  Each one is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupError {
    /// The supplied configuration was rejected.
    Config(&'static str),
    /// Board peripheral (UART, GPIO) initialisation failed.
    Peripheral(&'static str),
    /// The command queue could not be created.
    QueueCreate,
    /// A task could not be created; carries the task name.
    TaskSpawn(&'static str),
    /// The scheduler did not release the tasks.
    SchedulerStart,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
            Self::Peripheral(what) => write!(f, "peripheral init failed: {what}"),
            Self::QueueCreate => write!(f, "command queue creation failed"),
            Self::TaskSpawn(name) => write!(f, "task '{name}' creation failed"),
            Self::SchedulerStart => write!(f, "scheduler start failed"),
        }
    }
}

impl From<StartupError> for Error {
    fn from(e: StartupError) -> Self {
        Self::Startup(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The receive path reported a line fault (framing, overrun, noise).
    ReadFailed,
    /// The transmit path rejected the buffer.
    WriteFailed,
    /// The driver returned fewer bytes than requested.
    ShortRead,
    /// Raw driver error code.
    Driver(i32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::ShortRead => write!(f, "short read"),
            Self::Driver(rc) => write!(f, "driver error (rc={rc})"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
