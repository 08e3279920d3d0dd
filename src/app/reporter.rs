//! State reporter: renders the device state and writes it to the link.
//!
//! Called from both tasks: the controller after every applied command, the
//! receiver for queries and as the fallback for a dropped command.  The
//! state is read once, at render time.

use log::{debug, warn};

use crate::link::protocol::render_report;
use crate::link::transport::Transport;

use super::context::ControllerContext;
use super::state::DeviceState;

/// What happened to one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The line for this state was written.
    Sent(DeviceState),
    /// Rendering did not fit the report buffer; nothing was written.
    Skipped,
    /// The transport rejected the write.  Not retried.
    SendFailed,
}

impl<T: Transport> ControllerContext<T> {
    /// Send `STATE:<n>\n` for the current state, blocking until written.
    pub fn report_state(&self) -> ReportOutcome {
        let state = self.state();
        let Some(report) = render_report(state) else {
            debug!("report: render did not fit, skipped");
            self.stats().reports_skipped.bump();
            return ReportOutcome::Skipped;
        };

        match self.transport().write(report.as_bytes()) {
            Ok(()) => {
                self.stats().reports_sent.bump();
                ReportOutcome::Sent(state)
            }
            Err(e) => {
                warn!("report: transport write failed: {:?}", e);
                self.stats().report_failures.bump();
                ReportOutcome::SendFailed
            }
        }
    }
}
