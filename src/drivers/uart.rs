//! UART link driver over the ESP-IDF UART driver.
//!
//! The driver is installed with an event queue.  Framing, parity and
//! overflow conditions only show up there, never as a `uart_read_bytes`
//! return value, so reads go through
//! [`read_exact`](super::uart_rx::read_exact), which watches the queue and
//! turns them into [`TransportError::ReadFailed`].  Writes hand the whole
//! buffer to the driver in one call and wait for the FIFO to drain.
//!
//! `UartDriver` itself gives no cross-task guarantees: `reset` frees the
//! semaphores a blocked writer waits on.  It is only handed to the tasks
//! inside a [`LockedTransport`](crate::link::transport::LockedTransport).

use core::ffi::c_void;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::error::TransportError;
use crate::link::transport::{LinkDriver, LockedTransport};
use crate::pins;

use super::uart_rx::{RxEvent, RxPort, read_exact};

const UART_PIN_NO_CHANGE: i32 = -1;

/// Depth of the driver's event queue.
const EVENT_QUEUE_DEPTH: i32 = 16;

/// The UART link as handed to the tasks.
pub type UartTransport = LockedTransport<UartDriver>;

pub struct UartDriver {
    port: uart_port_t,
    events: AtomicPtr<QueueDefinition>,
}

impl UartDriver {
    /// Configure and install the driver on `port`.
    pub fn open(port: i32) -> Result<Self, TransportError> {
        let uart = Self {
            port: port as uart_port_t,
            events: AtomicPtr::new(ptr::null_mut()),
        };
        // SAFETY: called once during boot, before any task uses the port.
        unsafe { uart.install()? };
        info!(
            "uart{}: {} baud 8N1 (tx=GPIO{}, rx=GPIO{})",
            port,
            pins::LINK_BAUD_RATE,
            pins::LINK_UART_TX_GPIO,
            pins::LINK_UART_RX_GPIO
        );
        Ok(uart)
    }

    /// Open the port and wrap it for use by both tasks.
    pub fn open_transport(port: i32) -> Result<UartTransport, TransportError> {
        Self::open(port).map(LockedTransport::new)
    }

    unsafe fn install(&self) -> Result<(), TransportError> {
        let cfg = uart_config_t {
            baud_rate: pins::LINK_BAUD_RATE as _,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        check(unsafe { uart_param_config(self.port, &cfg) })?;
        check(unsafe {
            uart_set_pin(
                self.port,
                pins::LINK_UART_TX_GPIO,
                pins::LINK_UART_RX_GPIO,
                UART_PIN_NO_CHANGE,
                UART_PIN_NO_CHANGE,
            )
        })?;

        let mut queue: QueueHandle_t = ptr::null_mut();
        check(unsafe {
            uart_driver_install(
                self.port,
                pins::LINK_RX_BUFFER_BYTES as _,
                0,
                EVENT_QUEUE_DEPTH,
                &mut queue,
                0,
            )
        })?;
        self.events.store(queue, Ordering::Release);
        Ok(())
    }
}

fn check(ret: esp_err_t) -> Result<(), TransportError> {
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(TransportError::Driver(ret))
    }
}

impl RxPort for UartDriver {
    fn next_event(&self, block: bool) -> Result<Option<RxEvent>, TransportError> {
        let queue = self.events.load(Ordering::Acquire);
        if queue.is_null() {
            // Reinstall failed earlier; report a fault so the receiver retries.
            return Err(TransportError::ReadFailed);
        }
        let ticks = if block { TickType_t::MAX } else { 0 };
        let mut event = uart_event_t::default();
        // SAFETY: queue is the live event queue (only the reading task
        // resets the driver); event is a valid uart_event_t slot.
        let got = unsafe { xQueueReceive(queue, ptr::from_mut(&mut event).cast::<c_void>(), ticks) };
        if got == 0 {
            return Ok(None);
        }
        #[allow(non_upper_case_globals)]
        let kind = match event.type_ {
            uart_event_type_t_UART_DATA => RxEvent::Data,
            uart_event_type_t_UART_FRAME_ERR
            | uart_event_type_t_UART_PARITY_ERR
            | uart_event_type_t_UART_FIFO_OVF
            | uart_event_type_t_UART_BUFFER_FULL => RxEvent::LineFault,
            _ => RxEvent::Other,
        };
        Ok(Some(kind))
    }

    fn read_buffered(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        // SAFETY: buf is valid for buf.len() bytes for the duration of the call.
        let n = unsafe { uart_read_bytes(self.port, buf.as_mut_ptr().cast::<c_void>(), buf.len() as _, 0) };
        usize::try_from(n).map_err(|_| TransportError::ReadFailed)
    }

    fn discard_input(&self) {
        // SAFETY: only the reading task touches the RX side.
        unsafe {
            uart_flush_input(self.port);
            let queue = self.events.load(Ordering::Acquire);
            if !queue.is_null() {
                xQueueGenericReset(queue, 0);
            }
        }
    }
}

impl LinkDriver for UartDriver {
    type Error = TransportError;

    fn read(&self, buf: &mut [u8]) -> Result<(), TransportError> {
        read_exact(self, buf)
    }

    fn write(&self, data: &[u8]) -> Result<(), TransportError> {
        // SAFETY: data is valid for data.len() bytes for the duration of the
        // call, and the caller guarantees no reset runs concurrently.
        let n = unsafe { uart_write_bytes(self.port, data.as_ptr().cast::<c_void>(), data.len()) };
        if n < 0 || (n as usize) != data.len() {
            return Err(TransportError::WriteFailed);
        }
        check(unsafe { uart_wait_tx_done(self.port, TickType_t::MAX) })
            .map_err(|_| TransportError::WriteFailed)
    }

    fn reset(&self) {
        // The event queue is freed with the driver.
        self.events.store(ptr::null_mut(), Ordering::Release);
        // SAFETY: LockedTransport holds the TX lock, so no write is using
        // the driver objects; the reading task is the caller, so no read is
        // either.
        let ret = unsafe { uart_driver_delete(self.port) };
        if ret != ESP_OK as esp_err_t {
            warn!("uart: driver delete failed (rc={})", ret);
        }
        if let Err(e) = unsafe { self.install() } {
            warn!("uart: reinstall failed: {}", e);
        }
    }
}
