//! Board drivers: peripheral bring-up, the relay output and the UART link.

pub mod hw_init;
pub mod relay;
#[cfg(target_os = "espidf")]
pub mod uart;
pub mod uart_rx;
