//! GPIO / peripheral pin assignments for the relay controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers or line settings.

// ---------------------------------------------------------------------------
// Command link (UART1)
// ---------------------------------------------------------------------------

/// UART port carrying the command link.
pub const LINK_UART_PORT: i32 = 1;
/// UART TX pin.
pub const LINK_UART_TX_GPIO: i32 = 17;
/// UART RX pin.
pub const LINK_UART_RX_GPIO: i32 = 18;
/// Fixed line rate, 8N1, no flow control.
pub const LINK_BAUD_RATE: u32 = 115_200;
/// Driver-side RX ring buffer size (bytes).  Must exceed the hardware FIFO.
pub const LINK_RX_BUFFER_BYTES: i32 = 256;

// ---------------------------------------------------------------------------
// Actuator
// ---------------------------------------------------------------------------

/// Digital output driving the relay coil (active HIGH).
pub const DEVICE_GPIO: i32 = 5;
