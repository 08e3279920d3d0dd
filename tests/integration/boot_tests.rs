//! Full runtime tests: `boot()` spawns the real receiver and controller
//! threads over a mock link, and the test talks to them through the line.

use std::sync::Arc;
use std::time::Duration;

use relayctl::app::context::ControllerContext;
use relayctl::app::state::DeviceState;
use relayctl::config::ControllerConfig;
use relayctl::link::transport::LockedTransport;
use relayctl::runtime::{self, Running};
use relayctl::{StartupError, TransportError};

use crate::mock_hw::{MockLink, SharedActuator, SlowTxDriver, wait_for};

const DEADLINE: Duration = Duration::from_secs(5);

fn config() -> ControllerConfig {
    ControllerConfig {
        task_stack_bytes: 64 * 1024,
        ..ControllerConfig::default()
    }
}

fn booted(relay: &SharedActuator) -> Running<MockLink> {
    let relay = relay.clone();
    match runtime::boot(config(), move || Ok((MockLink::new(), relay))) {
        Ok(running) => running,
        Err(halted) => panic!("boot failed: {:?}", halted.cause()),
    }
}

fn reports_reach(ctx: &Arc<ControllerContext<MockLink>>, n: usize) -> bool {
    wait_for(DEADLINE, || ctx.transport().reports().len() >= n)
}

#[test]
fn booted_system_answers_first_query_with_off() {
    let system = booted(&SharedActuator::new());
    let ctx = system.context();

    ctx.transport().push_input(b"S");
    assert!(reports_reach(ctx, 1));
    assert_eq!(ctx.transport().reports(), ["STATE:0\n"]);
}

#[test]
fn booted_system_follows_commands() {
    let relay = SharedActuator::new();
    let system = booted(&relay);
    let ctx = system.context();

    ctx.transport().push_input(b"1");
    assert!(reports_reach(ctx, 1));
    assert_eq!(ctx.state(), DeviceState::On);
    assert_eq!(relay.last_level(), Some(true));

    ctx.transport().push_input(b"S");
    assert!(reports_reach(ctx, 2));

    ctx.transport().push_input(b"0");
    assert!(reports_reach(ctx, 3));

    ctx.transport().push_input(b"S");
    assert!(reports_reach(ctx, 4));

    assert_eq!(
        ctx.transport().reports(),
        ["STATE:1\n", "STATE:1\n", "STATE:0\n", "STATE:0\n"]
    );
    assert_eq!(relay.levels(), [true, false]);
}

#[test]
fn booted_system_recovers_from_line_fault() {
    let relay = SharedActuator::new();
    let system = booted(&relay);
    let ctx = system.context();

    ctx.transport().push_fault(TransportError::ReadFailed);
    ctx.transport().push_input(b"1");
    assert!(reports_reach(ctx, 1));

    assert_eq!(ctx.transport().reinits(), 1);
    assert_eq!(ctx.transport().reports(), ["STATE:1\n"]);
    assert_eq!(relay.levels(), [true]);
}

#[test]
fn booted_system_settles_on_last_command_of_a_burst() {
    let relay = SharedActuator::new();
    let system = booted(&relay);
    let ctx = system.context();

    // Fewer than the queue capacity, so nothing is dropped.
    ctx.transport().push_input(b"10101");
    assert!(reports_reach(ctx, 5));
    assert!(wait_for(DEADLINE, || ctx.queue().is_empty()));
    assert_eq!(ctx.state(), DeviceState::On);
    assert_eq!(relay.last_level(), Some(true));
    assert_eq!(ctx.stats_snapshot().commands_applied, 5);
}

#[test]
fn line_faults_during_reports_never_reset_mid_write() {
    let relay = SharedActuator::new();
    let booted = runtime::boot(config(), {
        let relay = relay.clone();
        move || Ok((LockedTransport::new(SlowTxDriver::default()), relay))
    });
    let Ok(system) = booted else {
        panic!("boot failed");
    };
    let ctx = system.context();
    let driver = ctx.transport().driver();

    // Every command's report is still being written when the fault after
    // it reaches the receiver.
    for cmd in b"1010101010" {
        driver.line().push_input(&[*cmd]);
        driver.line().push_fault(TransportError::ReadFailed);
    }

    assert!(wait_for(DEADLINE, || driver.line().reports().len() >= 10));
    assert!(wait_for(DEADLINE, || driver.resets() >= 10));
    assert_eq!(driver.overlaps(), 0);
    assert_eq!(ctx.state(), DeviceState::Off);
    assert_eq!(relay.levels().len(), 10);
}

#[test]
fn oversized_queue_halts_before_init() {
    let mut init_ran = false;
    let result = runtime::boot(
        ControllerConfig {
            queue_capacity: relayctl::config::MAX_QUEUE_CAPACITY + 1,
            ..config()
        },
        || {
            init_ran = true;
            Ok((MockLink::new(), SharedActuator::new()))
        },
    );
    let halted = result.err().unwrap();
    assert!(matches!(halted.cause(), StartupError::Config(_)));
    assert!(!init_ran);
}
