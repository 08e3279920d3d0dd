//! UART receive loop, independent of the driver bindings.
//!
//! The ESP-IDF driver reports framing, parity and overflow conditions only
//! through its event queue.  [`read_exact`] interleaves that queue with the
//! RX ring buffer so those conditions surface as read errors, which is what
//! triggers the receiver's reinitialise path.

use log::warn;

use crate::error::TransportError;

/// A driver event, reduced to what the receive loop acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxEvent {
    /// Bytes landed in the ring buffer.
    Data,
    /// Framing error, parity error, FIFO overflow or ring buffer full.
    LineFault,
    /// Anything else (break, pattern detection, ...).
    Other,
}

/// Receive side of a UART driver with an event queue.
pub trait RxPort {
    /// Next queued event.  With `block` the call waits indefinitely;
    /// without it an empty queue yields `None`.
    fn next_event(&self, block: bool) -> Result<Option<RxEvent>, TransportError>;

    /// Copy already-buffered bytes into `buf` without waiting.
    fn read_buffered(&self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Drop buffered input and pending events after a line fault.
    fn discard_input(&self);
}

/// Fill `buf` from `port`, failing on any line fault.
///
/// Queued faults are checked before buffered bytes are taken, since bytes
/// received alongside a fault cannot be trusted.
pub fn read_exact<P: RxPort>(port: &P, buf: &mut [u8]) -> Result<(), TransportError> {
    let mut filled = 0;
    loop {
        while let Some(event) = port.next_event(false)? {
            check_event(port, event)?;
        }

        filled += port.read_buffered(&mut buf[filled..])?;
        if filled >= buf.len() {
            return Ok(());
        }

        // Nothing buffered: sleep until the driver posts something.
        if let Some(event) = port.next_event(true)? {
            check_event(port, event)?;
        }
    }
}

fn check_event<P: RxPort>(port: &P, event: RxEvent) -> Result<(), TransportError> {
    if event == RxEvent::LineFault {
        warn!("uart: line fault, discarding input");
        port.discard_input();
        return Err(TransportError::ReadFailed);
    }
    Ok(())
}
