//! Task handle and scheduler helpers.

use core::cell::Cell;
use core::ffi::c_void;
use core::ptr;

#[cfg(feature = "static-alloc")]
use core::cell::UnsafeCell;

use crate::config::tskIDLE_PRIORITY;
use crate::error::RtosError;
use crate::isr;
use crate::kernel;
#[cfg(feature = "static-alloc")]
use crate::kernel::StaticTask_t;
use crate::types::*;

/// Core placement for a task on multi-core targets.
///
/// On single-core builds only [`CoreAffinity::Unpinned`] exists and the
/// field compiles down to nothing meaningful.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoreAffinity {
    /// Protocol/main core on ESP32 and RP2040.
    #[cfg(feature = "multicore")]
    Core0,
    /// Application core.
    #[cfg(feature = "multicore")]
    Core1,
    /// Let the scheduler choose.
    Unpinned,
}

/// A schedulable task with a `STACK_WORDS`-word stack.
///
/// Construction stores the entry function and name only; [`init`] spawns
/// the kernel task. On ports that launch tasks eagerly the entry function
/// may begin running inside `init()` itself, before `init()` returns.
///
/// # Example
///
/// ```ignore
/// use freertos_helper::sync::Task;
///
/// extern "C" fn blink(_arg: *mut core::ffi::c_void) {
///     loop {
///         toggle_led();
///         freertos_helper::sync::delay(500);
///     }
/// }
///
/// static mut BLINKER: Task<256> = Task::new(blink, b"Blink\0");
///
/// fn startup() {
///     unsafe { BLINKER.init() }.expect("task creation failed");
/// }
/// ```
///
/// [`init`]: Self::init
pub struct Task<const STACK_WORDS: usize> {
    entry: TaskFunction_t,
    // NUL-terminated, to cross the C boundary without copying.
    name: &'static [u8],
    arg: *mut c_void,
    priority: UBaseType_t,
    affinity: CoreAffinity,
    handle: TaskHandle_t,
    last_wake: Cell<TickType_t>,
    #[cfg(feature = "static-alloc")]
    stack: UnsafeCell<[StackType_t; STACK_WORDS]>,
    #[cfg(feature = "static-alloc")]
    tcb: UnsafeCell<StaticTask_t>,
}

// Safety: post-init the handle is immutable and every operation goes
// through the kernel; `last_wake` is only touched by the owning task
// (asserted in the periodic-wait methods).
unsafe impl<const STACK_WORDS: usize> Send for Task<STACK_WORDS> {}
unsafe impl<const STACK_WORDS: usize> Sync for Task<STACK_WORDS> {}

impl<const STACK_WORDS: usize> Task<STACK_WORDS> {
    /// Constructs an unspawned task at idle priority with no argument.
    /// `name` must be NUL-terminated (`b"Name\0"`). No kernel call.
    pub const fn new(entry: TaskFunction_t, name: &'static [u8]) -> Self {
        Self {
            entry,
            name,
            arg: ptr::null_mut(),
            priority: tskIDLE_PRIORITY,
            affinity: CoreAffinity::Unpinned,
            handle: ptr::null_mut(),
            last_wake: Cell::new(0),
            #[cfg(feature = "static-alloc")]
            stack: UnsafeCell::new([0; STACK_WORDS]),
            #[cfg(feature = "static-alloc")]
            tcb: UnsafeCell::new(StaticTask_t::new()),
        }
    }

    fn is_initialized(&self) -> bool {
        !self.handle.is_null()
    }

    // ---- pre-init configuration -------------------------------------

    /// Replaces the debug name. Only before `init()`.
    pub fn set_name(&mut self, name: &'static [u8]) -> bool {
        debug_assert!(!self.is_initialized(), "set_name() after init()");
        debug_assert!(name_valid(name));
        if self.is_initialized() || !name_valid(name) {
            return false;
        }
        self.name = name;
        true
    }

    /// Replaces the entry function. Only before `init()`.
    pub fn set_entry(&mut self, entry: TaskFunction_t) -> bool {
        debug_assert!(!self.is_initialized(), "set_entry() after init()");
        if self.is_initialized() {
            return false;
        }
        self.entry = entry;
        true
    }

    /// Sets the opaque pointer handed to the entry function. Only before
    /// `init()`.
    pub fn set_arg(&mut self, arg: *mut c_void) -> bool {
        debug_assert!(!self.is_initialized(), "set_arg() after init()");
        if self.is_initialized() {
            return false;
        }
        self.arg = arg;
        true
    }

    /// Sets the scheduling priority. Only before `init()`.
    pub fn set_priority(&mut self, priority: UBaseType_t) -> bool {
        debug_assert!(!self.is_initialized(), "set_priority() after init()");
        if self.is_initialized() {
            return false;
        }
        self.priority = priority;
        true
    }

    /// Pins the task to a core. Only before `init()`; only meaningful on
    /// multi-core builds.
    pub fn set_affinity(&mut self, affinity: CoreAffinity) -> bool {
        debug_assert!(!self.is_initialized(), "set_affinity() after init()");
        if self.is_initialized() {
            return false;
        }
        self.affinity = affinity;
        true
    }

    // ---- lifecycle ---------------------------------------------------

    /// Spawns the kernel task. Call exactly once.
    pub fn init(&mut self) -> Result<(), RtosError> {
        debug_assert!(self.handle.is_null(), "init() called twice");
        if !self.handle.is_null() {
            return Err(RtosError::AlreadyInitialized);
        }
        debug_assert!(name_valid(self.name), "task name must be NUL-terminated and non-empty");
        debug_assert!(STACK_WORDS != 0, "zero-size stack");
        if !name_valid(self.name) || STACK_WORDS == 0 {
            return Err(RtosError::InvalidParameter);
        }

        let handle = self.create_kernel_task();
        debug_assert!(!handle.is_null());
        if handle.is_null() {
            return Err(RtosError::OutOfMemory);
        }
        self.handle = handle;
        log::trace!("task up: {}", self.name_str());
        Ok(())
    }

    #[cfg(feature = "static-alloc")]
    fn create_kernel_task(&mut self) -> TaskHandle_t {
        #[cfg(feature = "multicore")]
        if let Some(core) = core_id(self.affinity) {
            return unsafe {
                kernel::xTaskCreateStaticPinnedToCore(
                    self.entry,
                    self.name.as_ptr(),
                    STACK_WORDS as u32,
                    self.arg,
                    self.priority,
                    self.stack.get() as *mut StackType_t,
                    self.tcb.get(),
                    core,
                )
            };
        }
        unsafe {
            kernel::xTaskCreateStatic(
                self.entry,
                self.name.as_ptr(),
                STACK_WORDS as u32,
                self.arg,
                self.priority,
                self.stack.get() as *mut StackType_t,
                self.tcb.get(),
            )
        }
    }

    #[cfg(not(feature = "static-alloc"))]
    fn create_kernel_task(&mut self) -> TaskHandle_t {
        let mut handle: TaskHandle_t = ptr::null_mut();
        #[cfg(feature = "multicore")]
        if let Some(core) = core_id(self.affinity) {
            let res = unsafe {
                kernel::xTaskCreatePinnedToCore(
                    self.entry,
                    self.name.as_ptr(),
                    STACK_WORDS as u32,
                    self.arg,
                    self.priority,
                    &mut handle,
                    core,
                )
            };
            return if res == pdPASS { handle } else { ptr::null_mut() };
        }
        let res = unsafe {
            kernel::xTaskCreate(
                self.entry,
                self.name.as_ptr(),
                STACK_WORDS as u32,
                self.arg,
                self.priority,
                &mut handle,
            )
        };
        if res == pdPASS {
            handle
        } else {
            ptr::null_mut()
        }
    }

    // ---- introspection -----------------------------------------------

    /// Raw kernel handle, for direct API calls. Null before `init()`.
    pub fn handle(&self) -> TaskHandle_t {
        self.handle
    }

    /// Debug name without the trailing NUL.
    pub fn name_str(&self) -> &'static str {
        let bytes = match self.name.split_last() {
            Some((0, rest)) => rest,
            _ => self.name,
        };
        core::str::from_utf8(bytes).unwrap_or("<task>")
    }

    /// Argument pointer handed to the entry function.
    pub fn arg(&self) -> *mut c_void {
        self.arg
    }

    // ---- run control -------------------------------------------------

    /// Resumes a stopped task. Callable from interrupt context.
    #[cfg(feature = "task-suspend")]
    pub fn start(&self) -> bool {
        debug_assert!(self.is_initialized(), "start() before init()");
        if !self.is_initialized() {
            return false;
        }

        isr::dispatch(
            || {
                unsafe { kernel::vTaskResume(self.handle) };
                true
            },
            |woken| {
                *woken = unsafe { kernel::xTaskResumeFromISR(self.handle) };
                true
            },
        )
    }

    /// Suspends the task until [`start`](Self::start). Task context only.
    #[cfg(feature = "task-suspend")]
    pub fn stop(&self) -> bool {
        debug_assert!(self.is_initialized(), "stop() before init()");
        debug_assert!(!isr::in_isr_context(), "stop() from interrupt context");
        if !self.is_initialized() || isr::in_isr_context() {
            return false;
        }
        unsafe { kernel::vTaskSuspend(self.handle) };
        true
    }

    // ---- signalling --------------------------------------------------

    /// Raises this task's direct notification, unblocking a pending
    /// [`wait_signal`](Self::wait_signal). Cheaper than a binary
    /// semaphore; callable from any context, any task.
    #[cfg(feature = "task-notifications")]
    pub fn emit_signal(&self) -> bool {
        debug_assert!(self.is_initialized(), "emit_signal() before init()");
        if !self.is_initialized() {
            return false;
        }

        isr::dispatch(
            || unsafe { kernel::xTaskNotifyGive(self.handle) == pdPASS },
            |woken| {
                unsafe { kernel::vTaskNotifyGiveFromISR(self.handle, woken) };
                true
            },
        )
    }

    /// Blocks the owning task until a signal is pending or `timeout_ms`
    /// expires, then consumes every pending signal. Returns `false` on
    /// timeout.
    ///
    /// Must be called from the task this handle spawned; any other caller
    /// is a contract violation (asserted in debug builds).
    #[cfg(feature = "task-notifications")]
    pub fn wait_signal(&self, timeout_ms: u32) -> bool {
        debug_assert!(self.is_initialized(), "wait_signal() before init()");
        debug_assert!(!isr::in_isr_context(), "wait_signal() from interrupt context");
        debug_assert!(
            self.handle == kernel::xTaskGetCurrentTaskHandle(),
            "wait_signal() called from a task that does not own this handle"
        );
        if !self.is_initialized() || isr::in_isr_context() {
            return false;
        }
        kernel::ulTaskNotifyTake(pdTRUE, ms_to_ticks(timeout_ms)) != 0
    }

    // ---- periodic scheduling ----------------------------------------

    /// Records the reference point for [`periodic_wait`]. Must be called
    /// from the owning task, before its first `periodic_wait`.
    ///
    /// [`periodic_wait`]: Self::periodic_wait
    pub fn periodic_wait_init(&self) {
        debug_assert!(self.is_initialized(), "periodic_wait_init() before init()");
        debug_assert!(
            self.handle == kernel::xTaskGetCurrentTaskHandle(),
            "periodic_wait_init() called from a task that does not own this handle"
        );
        self.last_wake.set(kernel::xTaskGetTickCount());
    }

    /// Blocks until exactly `period_ms` after the previous wake-up,
    /// giving a drift-free cycle regardless of how long the loop body
    /// took. Must be called from the owning task.
    pub fn periodic_wait(&self, period_ms: u32) {
        debug_assert!(self.is_initialized(), "periodic_wait() before init()");
        debug_assert!(
            self.handle == kernel::xTaskGetCurrentTaskHandle(),
            "periodic_wait() called from a task that does not own this handle"
        );
        let mut last_wake = self.last_wake.get();
        unsafe { kernel::xTaskDelayUntil(&mut last_wake, ms_to_ticks(period_ms)) };
        self.last_wake.set(last_wake);
    }
}

impl<const STACK_WORDS: usize> Drop for Task<STACK_WORDS> {
    fn drop(&mut self) {
        debug_assert!(self.is_initialized(), "dropping a task that never completed init()");
        #[cfg(feature = "task-delete")]
        if self.is_initialized() {
            unsafe { kernel::vTaskDelete(self.handle) };
            self.handle = ptr::null_mut();
        }
        // Without vTaskDelete the kernel task cannot be torn down; the
        // handle must live forever.
        #[cfg(not(feature = "task-delete"))]
        debug_assert!(false, "task dropped but task deletion is compiled out");
    }
}

pub(super) fn name_valid(name: &[u8]) -> bool {
    name.len() > 1 && *name.last().unwrap() == 0
}

#[cfg(feature = "multicore")]
fn core_id(affinity: CoreAffinity) -> Option<BaseType_t> {
    match affinity {
        CoreAffinity::Core0 => Some(0),
        CoreAffinity::Core1 => Some(1),
        CoreAffinity::Unpinned => None,
    }
}

// ---- scheduler-wide helpers ------------------------------------------

/// Blocks the calling task for `duration_ms`.
pub fn delay(duration_ms: u32) {
    kernel::vTaskDelay(ms_to_ticks(duration_ms));
}

/// Hands the processor to another ready task of equal priority.
pub fn yield_now() {
    kernel::taskYIELD();
}

/// Deletes the calling task. The owning [`Task`] handle is not informed
/// and must not be dropped afterwards; last-resort shutdown only.
#[cfg(feature = "task-delete")]
pub fn delete_self() -> ! {
    unsafe { kernel::vTaskDelete(ptr::null_mut()) };
    unreachable!("vTaskDelete(NULL) does not return");
}

/// Suspends the scheduler. Interrupts stay live; no task switch happens
/// until [`resume_all`].
pub fn suspend_all() {
    kernel::vTaskSuspendAll();
}

/// Resumes the scheduler after [`suspend_all`].
pub fn resume_all() {
    kernel::xTaskResumeAll();
}

/// Raw kernel tick count since scheduler start.
pub fn tick_count() -> TickType_t {
    kernel::xTaskGetTickCount()
}
