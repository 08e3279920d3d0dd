//! End-to-end link behaviour with both tasks stepped by hand.
//!
//! Stepping the receiver and controller explicitly pins down the
//! interleaving, so every test asserts the exact bytes on the wire.

use std::sync::Arc;

use relayctl::app::context::ControllerContext;
use relayctl::app::controller::Controller;
use relayctl::app::receiver::{Receiver, RxOutcome};
use relayctl::app::state::DeviceState;
use relayctl::config::ControllerConfig;
use relayctl::link::client::ReportDecoder;
use relayctl::link::protocol::Command;
use relayctl::TransportError;

use crate::mock_hw::{MockLink, SharedActuator};

struct Rig {
    ctx: Arc<ControllerContext<MockLink>>,
    rx: Receiver<MockLink>,
    ctrl: Controller<MockLink, SharedActuator>,
    relay: SharedActuator,
}

fn rig(input: &[u8], queue_capacity: usize) -> Rig {
    let config = ControllerConfig {
        queue_capacity,
        yield_interval_ms: 0,
        ..ControllerConfig::default()
    };
    let ctx = Arc::new(ControllerContext::new(&config, MockLink::with_input(input)).unwrap());
    let relay = SharedActuator::new();
    Rig {
        rx: Receiver::new(Arc::clone(&ctx)),
        ctrl: Controller::new(Arc::clone(&ctx), relay.clone()),
        ctx,
        relay,
    }
}

impl Rig {
    /// Receive every scripted byte, applying queued commands as they land.
    fn run_lockstep(&mut self) {
        while self.ctx.transport().pending_input() > 0 {
            if let RxOutcome::Queued(_) = self.rx.poll_once() {
                self.ctrl.run_once();
            }
        }
    }

    /// Receive every scripted byte first, then drain the queue.
    fn run_burst(&mut self) {
        while self.ctx.transport().pending_input() > 0 {
            self.rx.poll_once();
        }
        while !self.ctx.queue().is_empty() {
            self.ctrl.run_once();
        }
    }
}

#[test]
fn on_query_off_query_sequence() {
    let mut r = rig(b"1S0S", 16);
    r.run_lockstep();

    assert_eq!(
        r.ctx.transport().reports(),
        ["STATE:1\n", "STATE:1\n", "STATE:0\n", "STATE:0\n"]
    );
    assert_eq!(r.relay.levels(), [true, false]);
    assert_eq!(r.ctx.state(), DeviceState::Off);
}

#[test]
fn first_query_reports_off() {
    let mut r = rig(b"S", 16);
    r.run_lockstep();
    assert_eq!(r.ctx.transport().sent(), b"STATE:0\n");
    assert!(r.relay.levels().is_empty());
}

#[test]
fn lowercase_query_is_accepted() {
    let mut r = rig(b"1s", 16);
    r.run_lockstep();
    assert_eq!(r.ctx.transport().reports().last().unwrap(), "STATE:1\n");
}

#[test]
fn noise_produces_nothing() {
    let mut r = rig(b"x2\r\n\0\xffON", 16);
    r.run_lockstep();
    assert!(r.ctx.transport().sent().is_empty());
    assert!(r.relay.levels().is_empty());
    assert_eq!(r.ctx.state(), DeviceState::Off);
    assert_eq!(r.ctx.stats_snapshot().noise_bytes, 8);
}

#[test]
fn burst_without_overflow_ends_on_last_command() {
    let mut r = rig(b"1010011", 16);
    r.run_burst();
    assert_eq!(r.ctx.state(), DeviceState::On);
    assert_eq!(r.relay.levels().len(), 7);
    assert_eq!(r.ctx.transport().reports().len(), 7);
}

#[test]
fn saturated_queue_drops_and_reports_pre_drop_state() {
    let mut r = rig(b"", 2);
    r.ctx.transport().push_input(b"1");
    r.run_lockstep();
    assert_eq!(r.ctx.state(), DeviceState::On);

    // Two fill the queue; the third is dropped while the device is still On.
    r.ctx.transport().push_input(b"000");
    assert_eq!(r.rx.poll_once(), RxOutcome::Queued(Command::SetOff));
    assert_eq!(r.rx.poll_once(), RxOutcome::Queued(Command::SetOff));
    assert_eq!(r.rx.poll_once(), RxOutcome::Dropped(Command::SetOff));
    assert_eq!(r.ctx.state(), DeviceState::On);
    assert_eq!(r.ctx.transport().reports(), ["STATE:1\n", "STATE:1\n"]);

    r.run_burst();
    assert_eq!(r.ctx.state(), DeviceState::Off);
    assert_eq!(r.relay.levels(), [true, false, false]);
    assert_eq!(r.ctx.stats_snapshot().commands_dropped, 1);
}

#[test]
fn fault_is_skipped_and_processing_resumes() {
    let mut r = rig(b"1", 16);
    r.ctx.transport().push_fault(TransportError::ReadFailed);
    r.ctx.transport().push_input(b"0S");

    assert_eq!(r.rx.poll_once(), RxOutcome::Queued(Command::SetOn));
    r.ctrl.run_once();
    assert_eq!(r.rx.poll_once(), RxOutcome::Recovered);
    assert_eq!(r.ctx.transport().reinits(), 1);
    r.run_lockstep();

    assert_eq!(
        r.ctx.transport().reports(),
        ["STATE:1\n", "STATE:0\n", "STATE:0\n"]
    );
    assert_eq!(r.ctx.stats_snapshot().transport_faults, 1);
    assert_eq!(r.ctx.stats_snapshot().bytes_received, 3);
}

#[test]
fn peer_decoder_tracks_device_reports() {
    let mut r = rig(b"1S0", 16);
    r.run_lockstep();

    let mut decoder = ReportDecoder::new();
    let mut seen = Vec::new();
    decoder.feed(&r.ctx.transport().sent(), |s| seen.push(s));

    assert_eq!(seen, [DeviceState::On, DeviceState::On, DeviceState::Off]);
    assert_eq!(decoder.last_state(), Some(r.ctx.state()));
}
