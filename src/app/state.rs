//! Device state and its shared, single-writer store.

use core::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Binary state of the controlled device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceState {
    #[default]
    Off = 0,
    On = 1,
}

impl DeviceState {
    /// The value as reported on the wire (0 or 1).
    pub const fn digit(self) -> u8 {
        self as u8
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    const fn from_bit(bit: u8) -> Self {
        if bit == 0 { Self::Off } else { Self::On }
    }
}

/// Atomic home of the [`DeviceState`].
///
/// Any task may [`load`](Self::load); only the controller task stores,
/// which the `pub(super)` setter confines to the `app` module.
#[derive(Debug, Default)]
pub struct SharedState(AtomicU8);

impl SharedState {
    pub const fn new() -> Self {
        Self(AtomicU8::new(DeviceState::Off as u8))
    }

    pub fn load(&self) -> DeviceState {
        DeviceState::from_bit(self.0.load(Ordering::Acquire))
    }

    pub(super) fn store(&self, state: DeviceState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
