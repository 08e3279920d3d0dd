//! Task creation with an explicit stack and priority.
//!
//! On ESP-IDF, `std::thread` is backed by pthreads over FreeRTOS tasks.
//! `esp_pthread_set_cfg()` sets thread-local configuration that applies to
//! the *next* `pthread_create()` from the calling thread, so the
//! config→spawn pair must not be interleaved with other thread creation on
//! the same thread.  On the host, priority is ignored and the stack size
//! goes to `std::thread::Builder` (which rounds it up to the platform
//! minimum).

use core::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use crate::error::StartupError;

/// Most tasks tracked for halting.
const MAX_TRACKED_TASKS: usize = 4;

/// Identities of the running application tasks, so a halt can stop the
/// ones it is not running on.  `0` marks an empty slot.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
pub(crate) struct TaskRegistry {
    slots: [AtomicUsize; MAX_TRACKED_TASKS],
}

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
impl TaskRegistry {
    pub(crate) const fn new() -> Self {
        Self {
            slots: [const { AtomicUsize::new(0) }; MAX_TRACKED_TASKS],
        }
    }

    /// Record a task.  Returns `false` when every slot is taken.
    pub(crate) fn register(&self, id: usize) -> bool {
        if id == 0 {
            return false;
        }
        self.slots.iter().any(|slot| {
            slot.compare_exchange(0, id, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        })
    }

    /// Every registered task except `current`.
    pub(crate) fn others(&self, current: usize) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .map(|slot| slot.load(Ordering::Acquire))
            .filter(move |&id| id != 0 && id != current)
    }
}

#[cfg(target_os = "espidf")]
static TASKS: TaskRegistry = TaskRegistry::new();

/// Suspend every application task other than the caller.
///
/// `vTaskSuspendAll` only stops scheduling on the calling core; on the
/// dual-core part a task on the other core would keep running without this.
#[cfg(target_os = "espidf")]
pub(crate) fn suspend_other_tasks() {
    use esp_idf_svc::sys::{TaskHandle_t, vTaskSuspend, xTaskGetCurrentTaskHandle};

    // SAFETY: handles were taken from live tasks, which never exit normally;
    // suspending an already-suspended task is a no-op.
    unsafe {
        let current = xTaskGetCurrentTaskHandle() as usize;
        for id in TASKS.others(current) {
            vTaskSuspend(id as TaskHandle_t);
        }
    }
}

/// Attributes of one application task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    /// Null-terminated name, e.g. `"receiver\0"`.
    pub name: &'static str,
    pub stack_bytes: usize,
    pub priority: u8,
}

impl TaskSpec {
    /// Name without the trailing NUL.
    pub fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Create a task running `f`.
#[cfg(target_os = "espidf")]
pub fn spawn_task(
    spec: &TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, StartupError> {
    use esp_idf_svc::sys::{ESP_OK, esp_create_default_pthread_config, esp_pthread_set_cfg};

    debug_assert!(spec.name.ends_with('\0'), "task name must be NUL-terminated");
    let display_name = spec.display_name();

    // SAFETY: the config is consumed by the spawn below on this same
    // thread; `spec.name` is 'static and NUL-terminated.
    let ret = unsafe {
        let mut cfg = esp_create_default_pthread_config();
        cfg.prio = i32::from(spec.priority);
        cfg.stack_size = spec.stack_bytes as _;
        cfg.thread_name = spec.name.as_ptr().cast();
        esp_pthread_set_cfg(&cfg)
    };
    if ret != ESP_OK as i32 {
        log::error!("esp_pthread_set_cfg for '{}' failed: {}", display_name, ret);
        return Err(StartupError::TaskSpawn(display_name));
    }

    log::info!(
        "Spawning '{}' (pri={}, stack={}B)",
        display_name,
        spec.priority,
        spec.stack_bytes
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(move || {
            // SAFETY: returns the handle of the calling task.
            let handle = unsafe { esp_idf_svc::sys::xTaskGetCurrentTaskHandle() };
            if !TASKS.register(handle as usize) {
                log::warn!("task '{}' not tracked for halt", display_name);
            }
            f();
        })
        .map_err(|e| {
            log::error!("task '{}' creation failed: {}", display_name, e);
            StartupError::TaskSpawn(display_name)
        })
}

/// Host fallback: ignores priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_task(
    spec: &TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>, StartupError> {
    let display_name = spec.display_name();
    log::info!(
        "Spawning '{}' (sim, stack={}B)",
        display_name,
        spec.stack_bytes
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(spec.stack_bytes)
        .spawn(f)
        .map_err(|e| {
            log::error!("task '{}' creation failed: {}", display_name, e);
            StartupError::TaskSpawn(display_name)
        })
}
