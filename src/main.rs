//! Relay controller firmware: main entry point.
//!
//! ```text
//!   UART RX ──▶ receiver task ──▶ command queue ──▶ controller task ──▶ relay GPIO
//!                    │                                     │
//!                    └──────── STATE:<0|1>\n ◀─────────────┘
//! ```
//!
//! Boot brings up the board, creates the queue and both tasks, then parks
//! here for the life of the system.  Any failed step halts.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use relayctl::config::ControllerConfig;
use relayctl::diagnostics;
use relayctl::drivers::hw_init::{self, GpioOutput};
use relayctl::drivers::relay::PinActuator;
use relayctl::drivers::uart::UartDriver;
use relayctl::pins;
use relayctl::runtime;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    diagnostics::install_panic_handler();

    info!("relayctl v{}", env!("CARGO_PKG_VERSION"));

    let config = ControllerConfig::default();
    let booted = runtime::boot(config, || {
        hw_init::init_peripherals()?;
        let transport = UartDriver::open_transport(pins::LINK_UART_PORT)?;
        let actuator = PinActuator::new(GpioOutput::new(pins::DEVICE_GPIO));
        Ok((transport, actuator))
    });

    match booted {
        Ok(system) => system.wait(),
        Err(halted) => halted.halt(),
    }
}
