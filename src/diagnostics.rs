//! Link diagnostics.
//!
//! Lock-free counters bumped by both tasks as bytes flow through the core.
//! They never influence control decisions; they exist so faults that are
//! handled silently on the wire (drops, noise, line resets) stay visible in
//! logs and tests.

use core::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Counters shared by the receiver and controller tasks.
#[derive(Debug, Default)]
pub struct LinkStats {
    pub(crate) bytes_received: Counter,
    pub(crate) commands_queued: Counter,
    pub(crate) commands_dropped: Counter,
    pub(crate) commands_applied: Counter,
    pub(crate) unknown_commands: Counter,
    pub(crate) queries: Counter,
    pub(crate) noise_bytes: Counter,
    pub(crate) transport_faults: Counter,
    pub(crate) reports_sent: Counter,
    pub(crate) reports_skipped: Counter,
    pub(crate) report_failures: Counter,
}

/// Point-in-time copy of [`LinkStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub bytes_received: u32,
    pub commands_queued: u32,
    pub commands_dropped: u32,
    pub commands_applied: u32,
    pub unknown_commands: u32,
    pub queries: u32,
    pub noise_bytes: u32,
    pub transport_faults: u32,
    pub reports_sent: u32,
    pub reports_skipped: u32,
    pub report_failures: u32,
}

impl LinkStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_received: self.bytes_received.get(),
            commands_queued: self.commands_queued.get(),
            commands_dropped: self.commands_dropped.get(),
            commands_applied: self.commands_applied.get(),
            unknown_commands: self.unknown_commands.get(),
            queries: self.queries.get(),
            noise_bytes: self.noise_bytes.get(),
            transport_faults: self.transport_faults.get(),
            reports_sent: self.reports_sent.get(),
            reports_skipped: self.reports_skipped.get(),
            report_failures: self.report_failures.get(),
        }
    }
}

/// Wrapping event counter.
#[derive(Debug, Default)]
pub(crate) struct Counter(AtomicU32);

impl Counter {
    pub(crate) fn bump(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

// ───────────────────────────────────────────────────────────────
// Panic hook
// ───────────────────────────────────────────────────────────────

/// Route panic messages through the logger before the default hook runs.
///
/// A panicking task takes the whole controller down (see
/// [`Running::wait`](crate::runtime::Running::wait)); this makes sure the
/// reason reaches the console first.
pub fn install_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        log::error!(
            "panic in task '{}': {}",
            thread.name().unwrap_or("?"),
            info
        );
        default_hook(info);
    }));
}
