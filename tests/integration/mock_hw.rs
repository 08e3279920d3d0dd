//! Mock hardware adapters for integration tests.
//!
//! `MockLink` behaves like a UART with an RX line the test feeds: reads
//! block until bytes (or an injected fault) arrive, so it works both for
//! hand-stepped tasks and under the real threaded runtime.
//! `SharedActuator` records every level the relay is driven to and can be
//! inspected after the controller task has taken ownership of it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use relayctl::TransportError;
use relayctl::app::ports::ActuatorPort;
use relayctl::link::transport::{LinkDriver, Transport};

// ── MockLink ──────────────────────────────────────────────────

#[derive(Default)]
struct Line {
    rx: VecDeque<Result<u8, TransportError>>,
    tx: Vec<u8>,
}

#[derive(Default)]
pub struct MockLink {
    line: Mutex<Line>,
    arrived: Condvar,
    reinits: AtomicU32,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(data: &[u8]) -> Self {
        let link = Self::new();
        link.push_input(data);
        link
    }

    pub fn push_input(&self, data: &[u8]) {
        let mut line = self.line.lock().unwrap();
        line.rx.extend(data.iter().copied().map(Ok));
        self.arrived.notify_all();
    }

    pub fn push_fault(&self, err: TransportError) {
        let mut line = self.line.lock().unwrap();
        line.rx.push_back(Err(err));
        self.arrived.notify_all();
    }

    pub fn pending_input(&self) -> usize {
        self.line.lock().unwrap().rx.len()
    }

    pub fn sent(&self) -> Vec<u8> {
        self.line.lock().unwrap().tx.clone()
    }

    /// Everything sent so far, split into report lines.
    pub fn reports(&self) -> Vec<String> {
        String::from_utf8(self.sent())
            .unwrap()
            .split_inclusive('\n')
            .map(str::to_owned)
            .collect()
    }

    pub fn reinits(&self) -> u32 {
        self.reinits.load(Ordering::SeqCst)
    }
}

impl Transport for MockLink {
    type Error = TransportError;

    fn read(&self, buf: &mut [u8]) -> Result<(), TransportError> {
        let mut line = self.line.lock().unwrap();
        for slot in buf.iter_mut() {
            loop {
                if let Some(next) = line.rx.pop_front() {
                    *slot = next?;
                    break;
                }
                line = self.arrived.wait(line).unwrap();
            }
        }
        Ok(())
    }

    fn write(&self, data: &[u8]) -> Result<(), TransportError> {
        self.line.lock().unwrap().tx.extend_from_slice(data);
        Ok(())
    }

    fn reinitialize(&self) {
        self.reinits.fetch_add(1, Ordering::SeqCst);
    }
}

// ── SlowTxDriver ──────────────────────────────────────────────

/// Raw driver whose writes take a while, recording any reset that lands
/// during a write.  Meant to sit under a `LockedTransport`.
#[derive(Default)]
pub struct SlowTxDriver {
    line: MockLink,
    writing: AtomicBool,
    overlaps: AtomicU32,
    resets: AtomicU32,
}

#[allow(dead_code)]
impl SlowTxDriver {
    pub fn line(&self) -> &MockLink {
        &self.line
    }

    pub fn overlaps(&self) -> u32 {
        self.overlaps.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> u32 {
        self.resets.load(Ordering::SeqCst)
    }
}

impl LinkDriver for SlowTxDriver {
    type Error = TransportError;

    fn read(&self, buf: &mut [u8]) -> Result<(), TransportError> {
        Transport::read(&self.line, buf)
    }

    fn write(&self, data: &[u8]) -> Result<(), TransportError> {
        self.writing.store(true, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(2));
        let sent = Transport::write(&self.line, data);
        self.writing.store(false, Ordering::SeqCst);
        sent
    }

    fn reset(&self) {
        if self.writing.load(Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

// ── SharedActuator ────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SharedActuator {
    levels: Arc<Mutex<Vec<bool>>>,
}

#[allow(dead_code)]
impl SharedActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.lock().unwrap().clone()
    }

    pub fn last_level(&self) -> Option<bool> {
        self.levels.lock().unwrap().last().copied()
    }
}

impl ActuatorPort for SharedActuator {
    fn set_output(&mut self, on: bool) {
        self.levels.lock().unwrap().push(on);
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Poll `cond` until it holds or `timeout` passes.
#[allow(dead_code)]
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}
