//! Startup sequencing and the fail-stop halt.
//!
//! The lifecycle is a three-state machine expressed in types:
//!
//! ```text
//!  Uninitialized ──boot──▶ Running<T>      (tasks run forever)
//!        │
//!        └── first failing step ──▶ Halted ──halt()──▶ !
//! ```
//!
//! Boot steps, in order: validate config → peripheral init → queue
//! creation → controller task → receiver task → scheduler start.  Tasks
//! are created parked behind a start gate and only run once every earlier
//! step has succeeded, the way an RTOS holds created tasks until the
//! kernel starts.  There is no way back from `Running` or `Halted`.

pub mod task;

use std::sync::{Arc, Barrier};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{error, info, warn};

use crate::app::context::ControllerContext;
use crate::app::controller::Controller;
use crate::app::ports::ActuatorPort;
use crate::app::receiver::Receiver;
use crate::config::ControllerConfig;
use crate::error::{Error, StartupError};
use crate::link::transport::Transport;

use task::{TaskSpec, spawn_task};

/// Controller task name (NUL-terminated for the RTOS).
pub const CONTROLLER_TASK: &str = "controller\0";

/// Receiver task name (NUL-terminated for the RTOS).
pub const RECEIVER_TASK: &str = "receiver\0";

/// How often [`Running::wait`] checks on the tasks.
const TASK_WATCH_INTERVAL: Duration = Duration::from_secs(1);

// ───────────────────────────────────────────────────────────────
// States
// ───────────────────────────────────────────────────────────────

/// Nothing created yet.
pub struct Uninitialized {
    config: ControllerConfig,
}

/// Both tasks scheduled.
pub struct Running<T> {
    ctx: Arc<ControllerContext<T>>,
    tasks: Vec<JoinHandle<()>>,
}

/// Terminal state after a failed boot.
#[derive(Debug)]
pub struct Halted {
    cause: StartupError,
}

/// Shorthand for `Uninitialized::new(config).boot(init)`.
pub fn boot<T, A, F>(config: ControllerConfig, init: F) -> Result<Running<T>, Halted>
where
    T: Transport + 'static,
    A: ActuatorPort + Send + 'static,
    F: FnOnce() -> crate::Result<(T, A)>,
{
    Uninitialized::new(config).boot(init)
}

impl Uninitialized {
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    /// Run the boot sequence.
    ///
    /// `init` brings up the board and returns the ready transport and
    /// actuator.  The first failing step ends in [`Halted`].
    pub fn boot<T, A, F>(self, init: F) -> Result<Running<T>, Halted>
    where
        T: Transport + 'static,
        A: ActuatorPort + Send + 'static,
        F: FnOnce() -> crate::Result<(T, A)>,
    {
        self.start(init).map_err(|cause| {
            error!("boot failed: {}", cause);
            Halted { cause }
        })
    }

    fn start<T, A, F>(self, init: F) -> Result<Running<T>, StartupError>
    where
        T: Transport + 'static,
        A: ActuatorPort + Send + 'static,
        F: FnOnce() -> crate::Result<(T, A)>,
    {
        let config = self.config;
        config.validate()?;

        let (transport, actuator) = init().map_err(|e| match e {
            Error::Startup(cause) => cause,
            Error::Transport(fault) => {
                warn!("boot: transport init failed: {}", fault);
                StartupError::Peripheral("transport")
            }
        })?;
        info!("boot: peripherals ready");

        let ctx = Arc::new(ControllerContext::new(&config, transport)?);
        info!("boot: command queue ready (capacity {})", ctx.queue().capacity());

        // Two tasks plus this thread.
        let gate = Arc::new(Barrier::new(3));

        let controller = Controller::new(Arc::clone(&ctx), actuator);
        let receiver = Receiver::new(Arc::clone(&ctx));

        let mut tasks = Vec::with_capacity(2);
        tasks.push(spawn_gated(
            &task_spec(CONTROLLER_TASK, &config),
            &gate,
            move || controller.run(),
        )?);
        tasks.push(spawn_gated(
            &task_spec(RECEIVER_TASK, &config),
            &gate,
            move || receiver.run(),
        )?);

        gate.wait();
        if tasks.iter().any(JoinHandle::is_finished) {
            return Err(StartupError::SchedulerStart);
        }
        info!("boot: scheduler started, {} tasks running", tasks.len());

        Ok(Running { ctx, tasks })
    }
}

impl<T: Transport> Running<T> {
    /// Shared context, for diagnostics and host-side inspection.
    pub fn context(&self) -> &Arc<ControllerContext<T>> {
        &self.ctx
    }

    /// Park the caller for the life of the system.
    ///
    /// The tasks never return; if one does (a panic), the system halts.
    pub fn wait(self) -> ! {
        loop {
            if let Some(dead) = self.tasks.iter().find(|t| t.is_finished()) {
                error!(
                    "task '{}' exited, halting",
                    dead.thread().name().unwrap_or("?")
                );
                enter_halt();
            }
            std::thread::sleep(TASK_WATCH_INTERVAL);
        }
    }
}

impl Halted {
    /// The step that failed.
    pub fn cause(&self) -> StartupError {
        self.cause
    }

    /// Stop all further progress.  Never returns.
    pub fn halt(self) -> ! {
        error!("HALT: {}", self.cause);
        enter_halt()
    }
}

// ───────────────────────────────────────────────────────────────
// Internals
// ───────────────────────────────────────────────────────────────

fn task_spec(name: &'static str, config: &ControllerConfig) -> TaskSpec {
    TaskSpec {
        name,
        stack_bytes: config.task_stack_bytes,
        priority: config.task_priority,
    }
}

/// Spawn `body` so that it starts only once the gate is passed.
fn spawn_gated(
    spec: &TaskSpec,
    gate: &Arc<Barrier>,
    body: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, StartupError> {
    let gate = Arc::clone(gate);
    spawn_task(spec, move || {
        gate.wait();
        body();
    })
}

#[cfg(target_os = "espidf")]
fn enter_halt() -> ! {
    task::suspend_other_tasks();
    // SAFETY: terminal action; this task never yields or returns again.
    unsafe {
        esp_idf_svc::sys::vTaskSuspendAll();
        esp_idf_svc::sys::esp_intr_noniram_disable();
    }
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(not(target_os = "espidf"))]
fn enter_halt() -> ! {
    loop {
        std::thread::park();
    }
}
