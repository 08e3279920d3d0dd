//! Controller task: the only writer of device state.
//!
//! Waits on the command queue, drives the actuator to the command's level,
//! publishes the new state and reports it.  Owning the actuator and being
//! the sole caller of the state setter keeps application and reporting
//! free of races.

use std::sync::Arc;

use log::{debug, info};

use crate::link::protocol::Command;
use crate::link::transport::Transport;

use super::context::ControllerContext;
use super::ports::ActuatorPort;

pub struct Controller<T, A> {
    ctx: Arc<ControllerContext<T>>,
    actuator: A,
}

impl<T: Transport, A: ActuatorPort> Controller<T, A> {
    pub fn new(ctx: Arc<ControllerContext<T>>, actuator: A) -> Self {
        Self { ctx, actuator }
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Apply one queue code.
    ///
    /// Unknown codes are dropped: no output change and no report.
    pub fn apply(&mut self, code: u8) -> Option<Command> {
        let Some(cmd) = Command::from_code(code) else {
            debug!("controller: dropping unknown command code {}", code);
            self.ctx.stats().unknown_commands.bump();
            return None;
        };

        self.actuator.set_output(cmd.level());
        self.ctx.shared_state().store(cmd.target_state());
        self.ctx.stats().commands_applied.bump();
        self.ctx.report_state();
        Some(cmd)
    }

    /// Wait for the next queued code and apply it.
    pub fn run_once(&mut self) -> Option<Command> {
        let code = self.ctx.queue().pop_blocking();
        self.apply(code)
    }

    /// Task body.  Never returns.
    pub fn run(mut self) -> ! {
        info!("controller task running");
        loop {
            self.run_once();
            self.ctx.pause();
        }
    }
}
