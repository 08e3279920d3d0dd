//! Receiver task: reads the link one byte at a time and routes it.
//!
//! Commands go into the queue with a zero-wait insert; if the queue is
//! full the command is lost and a report of the current state goes out in
//! its place, so the requester still hears back.  Queries are answered
//! directly.  Everything else is dropped.  A receive error resets the
//! transport and the loop carries on, indefinitely.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::link::protocol::{Command, Inbound, classify};
use crate::link::transport::Transport;

use super::context::ControllerContext;

/// What one receive iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxOutcome {
    /// Command handed to the controller.
    Queued(Command),
    /// Queue full: command lost, fallback report sent instead.
    Dropped(Command),
    /// State reported on request.
    Queried,
    /// Byte outside the protocol.
    Ignored(u8),
    /// Line fault; transport was reinitialised.
    Recovered,
}

pub struct Receiver<T> {
    ctx: Arc<ControllerContext<T>>,
}

impl<T: Transport> Receiver<T> {
    pub fn new(ctx: Arc<ControllerContext<T>>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ControllerContext<T> {
        &self.ctx
    }

    /// Block for one byte and handle it.
    pub fn poll_once(&self) -> RxOutcome {
        match self.ctx.transport().receive_byte() {
            Ok(byte) => self.route(byte),
            Err(e) => {
                warn!("RX: line fault ({:?}), reinitialising transport", e);
                self.ctx.stats().transport_faults.bump();
                self.ctx.transport().reinitialize();
                RxOutcome::Recovered
            }
        }
    }

    /// Handle a byte that has already been received.
    pub fn route(&self, byte: u8) -> RxOutcome {
        let stats = self.ctx.stats();
        stats.bytes_received.bump();

        match classify(byte) {
            Inbound::Command(cmd) => match self.ctx.queue().try_push(cmd.code()) {
                Ok(()) => {
                    stats.commands_queued.bump();
                    RxOutcome::Queued(cmd)
                }
                Err(_) => {
                    warn!("RX: command queue full, dropping {:?}", cmd);
                    stats.commands_dropped.bump();
                    self.ctx.report_state();
                    RxOutcome::Dropped(cmd)
                }
            },
            Inbound::Query => {
                stats.queries.bump();
                self.ctx.report_state();
                RxOutcome::Queried
            }
            Inbound::Noise(other) => {
                debug!("RX: ignoring byte 0x{:02x}", other);
                stats.noise_bytes.bump();
                RxOutcome::Ignored(other)
            }
        }
    }

    /// Task body.  Never returns.
    pub fn run(self) -> ! {
        info!("receiver task running");
        loop {
            self.poll_once();
            self.ctx.pause();
        }
    }
}
