//! Wire protocol: single-byte requests in, `STATE:<n>\n` lines out.
//!
//! | Input byte   | Meaning              |
//! |--------------|----------------------|
//! | `'0'`        | [`Command::SetOff`]  |
//! | `'1'`        | [`Command::SetOn`]   |
//! | `'S'`, `'s'` | [`Inbound::Query`]   |
//! | other        | [`Inbound::Noise`]   |
//!
//! There is no framing, escaping or checksum.

use core::fmt::Write;

use crate::app::state::DeviceState;

/// Fixed size of the buffer a report is rendered into.
pub const REPORT_CAPACITY: usize = 16;

/// Leading text of every report line.
pub const REPORT_PREFIX: &str = "STATE:";

/// A rendered report, ready for the transport.
pub type Report = heapless::String<REPORT_CAPACITY>;

/// Instruction to drive the actuator to a given level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    SetOff = 0,
    SetOn = 1,
}

impl Command {
    /// One-byte code carried through the command queue.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a queue code.  Anything but 0 or 1 is not a command.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::SetOff),
            1 => Some(Self::SetOn),
            _ => None,
        }
    }

    /// ASCII byte that requests this command on the wire.
    pub const fn wire_byte(self) -> u8 {
        b'0' + self.code()
    }

    /// Output level the actuator is driven to.
    pub const fn level(self) -> bool {
        matches!(self, Self::SetOn)
    }

    /// Device state after the command is applied.
    pub const fn target_state(self) -> DeviceState {
        match self {
            Self::SetOff => DeviceState::Off,
            Self::SetOn => DeviceState::On,
        }
    }
}

/// Classification of one received byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// Queue this command for the controller.
    Command(Command),
    /// Report the current state right away.
    Query,
    /// Not part of the protocol; dropped silently.
    Noise(u8),
}

/// Classify a received byte.
pub const fn classify(byte: u8) -> Inbound {
    match byte {
        b'0' => Inbound::Command(Command::SetOff),
        b'1' => Inbound::Command(Command::SetOn),
        b'S' | b's' => Inbound::Query,
        other => Inbound::Noise(other),
    }
}

/// Render a report into the standard fixed-size buffer.
pub fn render_report(state: DeviceState) -> Option<Report> {
    render_report_into(state)
}

/// Render a report into an `N`-byte buffer.
///
/// Returns `None` when the line does not fit, so callers never transmit a
/// truncated report.
pub fn render_report_into<const N: usize>(state: DeviceState) -> Option<heapless::String<N>> {
    let mut out = heapless::String::new();
    writeln!(out, "{REPORT_PREFIX}{}", state.digit()).ok()?;
    Some(out)
}
