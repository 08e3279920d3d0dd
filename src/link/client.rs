//! Peer-side helpers for host tools that drive the device.
//!
//! A dashboard or test harness writes request bytes and reads back report
//! lines.  [`ReportDecoder`] turns the raw byte stream into states; the
//! request helpers pick the byte to send.

use heapless::Vec;

use super::protocol::{Command, REPORT_PREFIX};
use crate::app::state::DeviceState;

/// Byte that asks the device for its current state.
pub const QUERY_BYTE: u8 = b'S';

/// Longest line kept while waiting for its newline.
const MAX_LINE: usize = 32;

/// The request byte that flips the device from its last known state.
///
/// An unknown state is treated as off, so the first toggle switches on.
pub fn toggle_request(last_known: Option<DeviceState>) -> u8 {
    match last_known {
        Some(DeviceState::On) => Command::SetOff.wire_byte(),
        Some(DeviceState::Off) | None => Command::SetOn.wire_byte(),
    }
}

/// Streaming decoder for `STATE:<n>` report lines.
///
/// Bytes may arrive split at any point.  Lines are trimmed before parsing;
/// lines that are not reports are skipped, and a line longer than the
/// internal buffer is discarded up to its newline.
pub struct ReportDecoder {
    line: Vec<u8, MAX_LINE>,
    overflowed: bool,
    last: Option<DeviceState>,
}

impl Default for ReportDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportDecoder {
    pub fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
            last: None,
        }
    }

    /// Most recent state decoded so far.
    pub fn last_state(&self) -> Option<DeviceState> {
        self.last
    }

    /// Feed one byte; returns a state when it completes a report line.
    pub fn push(&mut self, byte: u8) -> Option<DeviceState> {
        if byte != b'\n' {
            if self.line.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let state = if self.overflowed {
            None
        } else {
            parse_line(&self.line)
        };
        self.line.clear();
        self.overflowed = false;

        if state.is_some() {
            self.last = state;
        }
        state
    }

    /// Feed a chunk, calling `on_state` for every report it completes.
    pub fn feed(&mut self, data: &[u8], mut on_state: impl FnMut(DeviceState)) {
        for &byte in data {
            if let Some(state) = self.push(byte) {
                on_state(state);
            }
        }
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.line.clear();
        self.overflowed = false;
    }
}

fn parse_line(raw: &[u8]) -> Option<DeviceState> {
    let line = core::str::from_utf8(raw).ok()?.trim();
    let value = line.strip_prefix(REPORT_PREFIX)?.trim();
    match value {
        "0" => Some(DeviceState::Off),
        "1" => Some(DeviceState::On),
        _ => None,
    }
}
