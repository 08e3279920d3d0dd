//! Transport abstraction: the blocking byte channel under the link.
//!
//! Concrete implementations:
//! - UART (ESP-IDF driver behind a [`LockedTransport`], see
//!   [`crate::drivers`])
//! - scripted mocks in the integration tests
//!
//! The tasks are generic over `Transport`, so swapping the physical link
//! requires no change to the receive or report logic.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Blocking byte-oriented transport shared by the receiver and controller.
///
/// Both tasks hold the same instance through `&self`, the way a UART's RX
/// and TX paths are independent: the receiver sits in [`read`] while either
/// task may [`write`] a report.
///
/// Implementations must uphold two guarantees:
/// - one `write` call's bytes stay contiguous on the wire, never
///   interleaved with another call's;
/// - [`reinitialize`] is safe to call while another task is inside
///   `write`.  A write that overlaps a reinitialisation either completes
///   before the link goes down or starts after it is back up.
///
/// `read` and `reinitialize` are only ever called from the receiving task,
/// so they need no ordering between themselves.
///
/// [`read`]: Transport::read
/// [`write`]: Transport::write
/// [`reinitialize`]: Transport::reinitialize
pub trait Transport: Send + Sync {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Fill `buf` completely, blocking indefinitely until enough bytes
    /// arrive or the line faults.
    fn read(&self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send all of `data`, blocking until transmission completes.
    fn write(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Tear the link down and bring it back up.  Best effort; bytes in
    /// flight are lost.
    fn reinitialize(&self);

    /// Block for exactly one byte.
    fn receive_byte(&self) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.read(&mut byte)?;
        Ok(byte[0])
    }
}

/// Raw link driver with no cross-task guarantees.
///
/// `write` and `reset` must never run concurrently: a reset may free the
/// resources an in-progress write is using.  Wrap the driver in a
/// [`LockedTransport`] to get a [`Transport`].
pub trait LinkDriver: Send + Sync {
    type Error: core::fmt::Debug;

    /// Fill `buf` completely, blocking indefinitely.
    fn read(&self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send all of `data` and wait until it has left the hardware.
    fn write(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Uninstall and reinstall the driver.
    fn reset(&self);
}

/// [`Transport`] over a [`LinkDriver`], with transmit and reset serialized.
///
/// The lock is held for a whole write, so it also keeps concurrent reports
/// from interleaving.  Reads take no lock: the receiving task is the only
/// reader and the only caller of `reinitialize`.
pub struct LockedTransport<D> {
    driver: D,
    tx: Mutex<()>,
}

impl<D: LinkDriver> LockedTransport<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            tx: Mutex::new(()),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn tx_lock(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: LinkDriver> Transport for LockedTransport<D> {
    type Error = D::Error;

    fn read(&self, buf: &mut [u8]) -> Result<(), D::Error> {
        self.driver.read(buf)
    }

    fn write(&self, data: &[u8]) -> Result<(), D::Error> {
        let _tx = self.tx_lock();
        self.driver.write(data)
    }

    fn reinitialize(&self) {
        let _tx = self.tx_lock();
        self.driver.reset();
    }
}
