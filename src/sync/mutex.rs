//! Non-recursive mutex wrapper.

use core::ptr;

#[cfg(feature = "static-alloc")]
use core::cell::UnsafeCell;

use crate::error::RtosError;
use crate::isr;
use crate::kernel;
#[cfg(feature = "static-alloc")]
use crate::kernel::StaticSemaphore_t;
use crate::types::*;

/// A binary, non-recursive lock with priority inheritance.
///
/// Task context only: the kernel provides no interrupt-safe path for
/// priority-inheritance locks, and neither does this wrapper. The lock
/// carries no data and no guard; pairing `lock()` with `unlock()` is the
/// caller's responsibility, as is not re-locking from the holding task.
///
/// # Example
///
/// ```ignore
/// use freertos_helper::sync::Mutex;
///
/// static mut BUS_LOCK: Mutex = Mutex::new();
///
/// unsafe {
///     if BUS_LOCK.lock(50) {
///         spi_transfer();
///         BUS_LOCK.unlock();
///     }
/// }
/// ```
pub struct Mutex {
    handle: SemaphoreHandle_t,
    #[cfg(feature = "static-alloc")]
    state: UnsafeCell<StaticSemaphore_t>,
}

// Safety: cross-task locking is the whole point; the kernel object is
// the synchronization.
unsafe impl Send for Mutex {}
unsafe impl Sync for Mutex {}

impl Mutex {
    /// Constructs an uninitialized mutex. No kernel call.
    pub const fn new() -> Self {
        Self {
            handle: ptr::null_mut(),
            #[cfg(feature = "static-alloc")]
            state: UnsafeCell::new(StaticSemaphore_t::new()),
        }
    }

    /// Creates the kernel mutex. Call exactly once, from task context.
    pub fn init(&mut self) -> Result<(), RtosError> {
        debug_assert!(self.handle.is_null(), "init() called twice");
        if !self.handle.is_null() {
            return Err(RtosError::AlreadyInitialized);
        }

        #[cfg(feature = "static-alloc")]
        let handle = unsafe { kernel::xSemaphoreCreateMutexStatic(self.state.get()) };
        #[cfg(not(feature = "static-alloc"))]
        let handle = unsafe { kernel::xSemaphoreCreateMutex() };

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

    /// Acquires the lock, blocking up to `timeout_ms`.
    pub fn lock(&self, timeout_ms: u32) -> bool {
        debug_assert!(self.is_initialized(), "lock() before init()");
        debug_assert!(!isr::in_isr_context(), "lock() from interrupt context");
        if !self.is_initialized() || isr::in_isr_context() {
            return false;
        }
        unsafe { kernel::xSemaphoreTake(self.handle, ms_to_ticks(timeout_ms)) == pdTRUE }
    }

    /// Releases the lock. Unlocking a mutex the caller does not hold is
    /// kernel-defined behavior, not detected here.
    pub fn unlock(&self) -> bool {
        debug_assert!(self.is_initialized(), "unlock() before init()");
        debug_assert!(!isr::in_isr_context(), "unlock() from interrupt context");
        if !self.is_initialized() || isr::in_isr_context() {
            return false;
        }
        unsafe { kernel::xSemaphoreGive(self.handle) == pdTRUE }
    }
}

impl Drop for Mutex {
    fn drop(&mut self) {
        debug_assert!(self.is_initialized(), "dropping a mutex that never completed init()");
        if self.is_initialized() {
            unsafe { kernel::vSemaphoreDelete(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}
