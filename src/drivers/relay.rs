//! Relay actuator over any `embedded-hal` output pin.
//!
//! The controller treats the actuator as infallible; a pin error is logged
//! and otherwise ignored.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::ActuatorPort;

pub struct PinActuator<P> {
    pin: P,
}

impl<P: OutputPin> PinActuator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: OutputPin> ActuatorPort for PinActuator<P> {
    fn set_output(&mut self, on: bool) {
        if let Err(e) = self.pin.set_state(PinState::from(on)) {
            warn!("relay: output pin write failed: {:?}", e);
        }
    }
}
