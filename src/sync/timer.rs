//! Software timer wrapper.

use core::ffi::c_void;
use core::ptr;

#[cfg(feature = "static-alloc")]
use core::cell::UnsafeCell;

use super::task::name_valid;
use crate::error::RtosError;
use crate::isr;
use crate::kernel;
#[cfg(feature = "static-alloc")]
use crate::kernel::StaticTimer_t;
use crate::types::*;

/// A one-shot or auto-reloading software timer.
///
/// The callback runs on the kernel's shared timer-service context, not
/// the caller's task and not an interrupt. It must never block, sleep or
/// suspend: doing so stalls every other timer in the system. That is a
/// caller obligation this wrapper cannot enforce.
///
/// The period is supplied at [`start`](Self::start) time, not at
/// construction; the timer is created dormant.
///
/// # Example
///
/// ```ignore
/// use freertos_helper::sync::Timer;
///
/// extern "C" fn wifi_off(_timer: freertos_helper::types::TimerHandle_t) {
///     wifi_shutdown();
/// }
///
/// static mut WIFI_OFF: Timer = Timer::new(wifi_off, b"WifiOff\0");
///
/// unsafe {
///     WIFI_OFF.init().unwrap();
///     // shut WiFi down half a second from now
///     if !WIFI_OFF.is_active() {
///         WIFI_OFF.start(500);
///     }
/// }
/// ```
pub struct Timer {
    callback: TimerCallbackFunction_t,
    name: &'static [u8],
    auto_reload: bool,
    id: *mut c_void,
    handle: TimerHandle_t,
    #[cfg(feature = "static-alloc")]
    state: UnsafeCell<StaticTimer_t>,
}

// Safety: post-init state is immutable; all mutation goes through the
// kernel timer commands.
unsafe impl Send for Timer {}
unsafe impl Sync for Timer {}

impl Timer {
    /// Constructs an uninitialized one-shot timer. `name` must be
    /// NUL-terminated (`b"Name\0"`). No kernel call.
    pub const fn new(callback: TimerCallbackFunction_t, name: &'static [u8]) -> Self {
        Self {
            callback,
            name,
            auto_reload: false,
            id: ptr::null_mut(),
            handle: ptr::null_mut(),
            #[cfg(feature = "static-alloc")]
            state: UnsafeCell::new(StaticTimer_t::new()),
        }
    }

    fn is_initialized(&self) -> bool {
        !self.handle.is_null()
    }

    // ---- pre-init configuration -------------------------------------

    /// Makes the timer re-arm itself after each expiry. Only before
    /// `init()`.
    pub fn set_auto_reload(&mut self, auto_reload: bool) -> bool {
        debug_assert!(!self.is_initialized(), "set_auto_reload() after init()");
        if self.is_initialized() {
            return false;
        }
        self.auto_reload = auto_reload;
        true
    }

    /// Sets the opaque ID the callback can read back when one callback
    /// serves several timers. Only before `init()`.
    pub fn set_id(&mut self, id: *mut c_void) -> bool {
        debug_assert!(!self.is_initialized(), "set_id() after init()");
        if self.is_initialized() {
            return false;
        }
        self.id = id;
        true
    }

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

    // ---- lifecycle ---------------------------------------------------

    /// Creates the kernel timer, dormant, with a placeholder period.
    /// Call exactly once, from task context.
    pub fn init(&mut self) -> Result<(), RtosError> {
        debug_assert!(self.handle.is_null(), "init() called twice");
        if !self.handle.is_null() {
            return Err(RtosError::AlreadyInitialized);
        }
        debug_assert!(name_valid(self.name), "timer name must be NUL-terminated and non-empty");
        if !name_valid(self.name) {
            return Err(RtosError::InvalidParameter);
        }

        let reload = if self.auto_reload { pdTRUE } else { pdFALSE };
        #[cfg(feature = "static-alloc")]
        let handle = unsafe {
            kernel::xTimerCreateStatic(
                self.name.as_ptr(),
                1,
                reload,
                self.id,
                self.callback,
                self.state.get(),
            )
        };
        #[cfg(not(feature = "static-alloc"))]
        let handle =
            unsafe { kernel::xTimerCreate(self.name.as_ptr(), 1, reload, self.id, self.callback) };

        debug_assert!(!handle.is_null());
        if handle.is_null() {
            return Err(RtosError::OutOfMemory);
        }
        self.handle = handle;
        Ok(())
    }

    /// Raw kernel handle, for direct API calls. Null before `init()`.
    pub fn handle(&self) -> TimerHandle_t {
        self.handle
    }

    // ---- run control -------------------------------------------------

    /// Sets the period to `period_ms` and arms the timer. Callable from
    /// interrupt context.
    pub fn start(&self, period_ms: u32) -> bool {
        debug_assert!(self.is_initialized(), "start() before init()");
        if !self.is_initialized() {
            return false;
        }

        let period = period_ticks(period_ms);
        isr::dispatch(
            || unsafe {
                kernel::xTimerChangePeriod(self.handle, period, 0);
                kernel::xTimerStart(self.handle, 0)
            },
            |woken| {
                let flag: *mut BaseType_t = woken;
                unsafe {
                    kernel::xTimerChangePeriodFromISR(self.handle, period, flag);
                    kernel::xTimerStartFromISR(self.handle, flag)
                }
            },
        ) == pdPASS
    }

    /// Disarms the timer. A command already in flight to the timer
    /// service may still fire once. Callable from interrupt context.
    pub fn stop(&self) -> bool {
        debug_assert!(self.is_initialized(), "stop() before init()");
        if !self.is_initialized() {
            return false;
        }

        isr::dispatch(
            || unsafe { kernel::xTimerStop(self.handle, 0) },
            |woken| unsafe { kernel::xTimerStopFromISR(self.handle, woken) },
        ) == pdPASS
    }

    /// Re-arms the timer with a fresh `period_ms`, whether it is
    /// currently running or stopped. Callable from interrupt context.
    pub fn restart(&self, period_ms: u32) -> bool {
        debug_assert!(self.is_initialized(), "restart() before init()");
        if !self.is_initialized() {
            return false;
        }

        let period = period_ticks(period_ms);
        isr::dispatch(
            || unsafe {
                kernel::xTimerChangePeriod(self.handle, period, 0);
                kernel::xTimerReset(self.handle, 0)
            },
            |woken| {
                let flag: *mut BaseType_t = woken;
                unsafe {
                    kernel::xTimerChangePeriodFromISR(self.handle, period, flag);
                    kernel::xTimerResetFromISR(self.handle, flag)
                }
            },
        ) == pdPASS
    }

    /// True between arming and expiry (one-shot) or while running
    /// (auto-reload).
    pub fn is_active(&self) -> bool {
        debug_assert!(self.is_initialized(), "is_active() before init()");
        if !self.is_initialized() {
            return false;
        }
        unsafe { kernel::xTimerIsTimerActive(self.handle) != pdFALSE }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug_assert!(self.is_initialized(), "dropping a timer that never completed init()");
        if self.is_initialized() {
            unsafe { kernel::xTimerDelete(self.handle, 0) };
            self.handle = ptr::null_mut();
        }
    }
}

fn period_ticks(period_ms: u32) -> TickType_t {
    let ticks = ms_to_ticks(period_ms);
    if ticks == 0 {
        1
    } else {
        ticks
    }
}

/// Defers `func(arg1, arg2)` to the timer-service context, blocking up
/// to `timeout_ms` while the service's command queue is full. The usual
/// way to get heavier work out of an interrupt handler without a
/// dedicated queue. In interrupt context the timeout is ignored and a
/// full command queue fails the call immediately.
#[cfg(feature = "pend-function-call")]
pub fn pend_call(func: PendedFunction_t, arg1: *mut c_void, arg2: u32, timeout_ms: u32) -> bool {
    isr::dispatch(
        || unsafe { kernel::xTimerPendFunctionCall(func, arg1, arg2, ms_to_ticks(timeout_ms)) },
        |woken| unsafe { kernel::xTimerPendFunctionCallFromISR(func, arg1, arg2, woken) },
    ) == pdPASS
}
