//! Port traits: the boundary between the control logic and the output
//! hardware.
//!
//! ```text
//!   Controller ──▶ ActuatorPort ──▶ adapter (GPIO pin, mock, ...)
//! ```
//!
//! The byte link has its own port, [`Transport`](crate::link::transport::Transport).

/// Write-side port: the controller drives the single binary output.
///
/// Treated as infallible and synchronous.  Adapters that can fail log the
/// failure themselves.
pub trait ActuatorPort {
    /// Drive the output high (`true`) or low (`false`).
    fn set_output(&mut self, on: bool);
}
