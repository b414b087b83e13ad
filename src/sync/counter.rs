//! Bounded counter over a counting semaphore.

use core::ptr;

#[cfg(feature = "static-alloc")]
use core::cell::UnsafeCell;

use crate::error::RtosError;
use crate::isr;
use crate::kernel;
#[cfg(feature = "static-alloc")]
use crate::kernel::StaticSemaphore_t;
use crate::types::*;

/// A counting semaphore with compile-time maximum `MAX`, starting at
/// zero.
///
/// `give()` increments up to the bound and fails beyond it; `take()`
/// decrements or blocks. Typical use is event counting between an
/// interrupt handler and a worker task.
///
/// # Example
///
/// ```ignore
/// use freertos_helper::sync::Counter;
///
/// static mut PRESSES: Counter<32> = Counter::new();
///
/// // in the button interrupt handler:
/// unsafe { PRESSES.give() };
///
/// // in the worker task:
/// while unsafe { PRESSES.take(0) } {
///     handle_press();
/// }
/// ```
pub struct Counter<const MAX: usize> {
    handle: SemaphoreHandle_t,
    #[cfg(feature = "static-alloc")]
    state: UnsafeCell<StaticSemaphore_t>,
}

// Safety: the kernel semaphore carries all shared state.
unsafe impl<const MAX: usize> Send for Counter<MAX> {}
unsafe impl<const MAX: usize> Sync for Counter<MAX> {}

impl<const MAX: usize> Counter<MAX> {
    /// Constructs an uninitialized counter. No kernel call.
    pub const fn new() -> Self {
        Self {
            handle: ptr::null_mut(),
            #[cfg(feature = "static-alloc")]
            state: UnsafeCell::new(StaticSemaphore_t::new()),
        }
    }

    /// Creates the kernel semaphore with a count of zero. Call exactly
    /// once, from task context.
    pub fn init(&mut self) -> Result<(), RtosError> {
        debug_assert!(self.handle.is_null(), "init() called twice");
        if !self.handle.is_null() {
            return Err(RtosError::AlreadyInitialized);
        }
        debug_assert!(MAX != 0, "zero-bound counter");
        if MAX == 0 {
            return Err(RtosError::InvalidParameter);
        }

        #[cfg(feature = "static-alloc")]
        let handle = unsafe {
            kernel::xSemaphoreCreateCountingStatic(MAX as UBaseType_t, 0, self.state.get())
        };
        #[cfg(not(feature = "static-alloc"))]
        let handle = unsafe { kernel::xSemaphoreCreateCounting(MAX as UBaseType_t, 0) };

        debug_assert!(!handle.is_null());
        if handle.is_null() {
            return Err(RtosError::OutOfMemory);
        }
        self.handle = handle;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        !self.handle.is_null()
    }

    /// Raw kernel handle. Null before `init()`.
    pub fn handle(&self) -> SemaphoreHandle_t {
        self.handle
    }

    /// Decrements the count, blocking up to `timeout_ms` while it is
    /// zero. In interrupt context the timeout is ignored and a zero count
    /// fails immediately.
    pub fn take(&self, timeout_ms: u32) -> bool {
        debug_assert!(self.is_initialized(), "take() before init()");
        if !self.is_initialized() {
            return false;
        }

        isr::dispatch(
            || unsafe { kernel::xSemaphoreTake(self.handle, ms_to_ticks(timeout_ms)) },
            |woken| unsafe { kernel::xSemaphoreTakeFromISR(self.handle, woken) },
        ) == pdTRUE
    }

    /// Increments the count. Fails, rather than wrapping, when already at
    /// `MAX`.
    pub fn give(&self) -> bool {
        debug_assert!(self.is_initialized(), "give() before init()");
        if !self.is_initialized() {
            return false;
        }

        isr::dispatch(
            || unsafe { kernel::xSemaphoreGive(self.handle) },
            |woken| unsafe { kernel::xSemaphoreGiveFromISR(self.handle, woken) },
        ) == pdTRUE
    }

    /// Current count.
    pub fn count(&self) -> usize {
        debug_assert!(self.is_initialized(), "count() before init()");
        if !self.is_initialized() {
            return 0;
        }
        unsafe { kernel::uxSemaphoreGetCount(self.handle) as usize }
    }

    /// Drains the count back to zero. Succeeds (as a no-op) on an already
    /// empty counter.
    ///
    /// The interrupt-context path drains one permit at a time; if another
    /// interrupt keeps calling `give()` meanwhile, the loop is not
    /// guaranteed to terminate.
    pub fn reset(&self) -> bool {
        debug_assert!(self.is_initialized(), "reset() before init()");
        if !self.is_initialized() {
            return false;
        }

        isr::dispatch(
            || unsafe { kernel::xQueueReset(self.handle) == pdPASS },
            |woken| {
                let flag: *mut BaseType_t = woken;
                while unsafe { kernel::xSemaphoreTakeFromISR(self.handle, flag) } == pdTRUE {}
                true
            },
        )
    }
}

impl<const MAX: usize> Drop for Counter<MAX> {
    fn drop(&mut self) {
        debug_assert!(self.is_initialized(), "dropping a counter that never completed init()");
        if self.is_initialized() {
            unsafe { kernel::vSemaphoreDelete(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}
