//! Serial-link relay controller library.
//!
//! Exposes the link protocol, the two-task core and the boot sequence for
//! integration testing and for peers that talk to the controller.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod link;
pub mod pins;
pub mod runtime;

mod error;

pub use error::{Error, Result, StartupError, TransportError};
