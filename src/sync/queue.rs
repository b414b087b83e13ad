//! Type-safe queue wrapper.
//!
//! The raw kernel queue traffics in void pointers and byte counts; this
//! wrapper fixes the element type and capacity at compile time, so a
//! mismatched send/receive cannot typecheck.

use core::ffi::c_void;
use core::marker::PhantomData;
use core::mem::size_of;
use core::mem::MaybeUninit;
use core::ptr;

#[cfg(feature = "static-alloc")]
use core::cell::UnsafeCell;

use crate::error::RtosError;
use crate::isr;
use crate::kernel;
#[cfg(feature = "static-alloc")]
use crate::kernel::StaticQueue_t;
use crate::types::*;

/// A fixed-capacity FIFO queue carrying `N` items of type `T`.
///
/// Items are stored by value, so `T` must be `Copy`. Capacity is part of
/// the type; it cannot change after construction.
///
/// # Example
///
/// ```ignore
/// use freertos_helper::sync::Queue;
///
/// static mut READINGS: Queue<i16, 16> = Queue::new();
///
/// // once, after the kernel is up:
/// unsafe { READINGS.init() }.unwrap();
///
/// // producer (task or interrupt handler):
/// unsafe { READINGS.send(&1234, 0) };
///
/// // consumer:
/// if let Some(sample) = unsafe { READINGS.receive(100) } {
///     process(sample);
/// }
/// ```
pub struct Queue<T: Copy, const N: usize> {
    handle: QueueHandle_t,
    #[cfg(feature = "static-alloc")]
    storage: UnsafeCell<[MaybeUninit<T>; N]>,
    #[cfg(feature = "static-alloc")]
    state: UnsafeCell<StaticQueue_t>,
    _marker: PhantomData<T>,
}

// Safety: the kernel queue is the synchronization point; the wrapper adds
// no unsynchronized state after init().
unsafe impl<T: Copy + Send, const N: usize> Send for Queue<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Sync for Queue<T, N> {}

impl<T: Copy, const N: usize> Queue<T, N> {
    /// Constructs an uninitialized queue. No kernel call; usable in a
    /// `static`.
    pub const fn new() -> Self {
        Self {
            handle: ptr::null_mut(),
            #[cfg(feature = "static-alloc")]
            storage: UnsafeCell::new([MaybeUninit::uninit(); N]),
            #[cfg(feature = "static-alloc")]
            state: UnsafeCell::new(StaticQueue_t::new()),
            _marker: PhantomData,
        }
    }

    /// Creates the kernel queue. Call exactly once, from task context.
    pub fn init(&mut self) -> Result<(), RtosError> {
        debug_assert!(self.handle.is_null(), "init() called twice");
        if !self.handle.is_null() {
            return Err(RtosError::AlreadyInitialized);
        }
        debug_assert!(N != 0, "zero-capacity queue");
        if N == 0 {
            return Err(RtosError::InvalidParameter);
        }

        #[cfg(feature = "static-alloc")]
        let handle = unsafe {
            kernel::xQueueCreateStatic(
                N as UBaseType_t,
                size_of::<T>() as UBaseType_t,
                self.storage.get() as *mut u8,
                self.state.get(),
            )
        };
        #[cfg(not(feature = "static-alloc"))]
        let handle =
            unsafe { kernel::xQueueCreate(N as UBaseType_t, size_of::<T>() as UBaseType_t) };

        debug_assert!(!handle.is_null());
        if handle.is_null() {
            return Err(RtosError::OutOfMemory);
        }
        self.handle = handle;
        log::trace!("queue up: capacity={} item={}B", N, size_of::<T>());
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        !self.handle.is_null()
    }

    /// Raw kernel handle, for direct API calls. Null before `init()`.
    pub fn handle(&self) -> QueueHandle_t {
        self.handle
    }

    /// Copies `item` to the back of the queue, blocking up to
    /// `timeout_ms` while it is full. In interrupt context the timeout is
    /// ignored and the send fails immediately on a full queue.
    pub fn send(&self, item: &T, timeout_ms: u32) -> bool {
        debug_assert!(self.is_initialized(), "send() before init()");
        if !self.is_initialized() {
            return false;
        }

        let item = item as *const T as *const c_void;
        isr::dispatch(
            || unsafe { kernel::xQueueSend(self.handle, item, ms_to_ticks(timeout_ms)) },
            |woken| unsafe { kernel::xQueueSendFromISR(self.handle, item, woken) },
        ) == pdPASS
    }

    /// Removes and returns the front item, blocking up to `timeout_ms`
    /// while the queue is empty.
    pub fn receive(&self, timeout_ms: u32) -> Option<T> {
        debug_assert!(self.is_initialized(), "receive() before init()");
        if !self.is_initialized() {
            return None;
        }

        let mut slot = MaybeUninit::<T>::uninit();
        let buf = slot.as_mut_ptr() as *mut c_void;
        let res = isr::dispatch(
            || unsafe { kernel::xQueueReceive(self.handle, buf, ms_to_ticks(timeout_ms)) },
            |woken| unsafe { kernel::xQueueReceiveFromISR(self.handle, buf, woken) },
        );
        if res == pdPASS {
            Some(unsafe { slot.assume_init() })
        } else {
            None
        }
    }

    /// Like [`receive`](Self::receive) but leaves the item in the queue.
    pub fn peek(&self, timeout_ms: u32) -> Option<T> {
        debug_assert!(self.is_initialized(), "peek() before init()");
        if !self.is_initialized() {
            return None;
        }

        let mut slot = MaybeUninit::<T>::uninit();
        let buf = slot.as_mut_ptr() as *mut c_void;
        let res = isr::dispatch(
            || unsafe { kernel::xQueuePeek(self.handle, buf, ms_to_ticks(timeout_ms)) },
            |_woken| unsafe { kernel::xQueuePeekFromISR(self.handle, buf) },
        );
        if res == pdPASS {
            Some(unsafe { slot.assume_init() })
        } else {
            None
        }
    }

    /// True when no items are waiting.
    pub fn is_empty(&self) -> bool {
        debug_assert!(self.is_initialized(), "is_empty() before init()");
        if !self.is_initialized() {
            return true;
        }
        unsafe { kernel::uxQueueSpacesAvailable(self.handle) as usize == N }
    }

    /// Number of free slots.
    pub fn free_space(&self) -> usize {
        debug_assert!(self.is_initialized(), "free_space() before init()");
        if !self.is_initialized() {
            return 0;
        }
        unsafe { kernel::uxQueueSpacesAvailable(self.handle) as usize }
    }

    /// Discards every pending item. Task context only. Interaction with
    /// concurrently blocked senders or receivers is kernel-defined.
    pub fn flush(&self) -> bool {
        debug_assert!(self.is_initialized(), "flush() before init()");
        debug_assert!(!isr::in_isr_context(), "flush() from interrupt context");
        if !self.is_initialized() || isr::in_isr_context() {
            return false;
        }
        unsafe { kernel::xQueueReset(self.handle) == pdPASS }
    }
}

impl<T: Copy, const N: usize> Drop for Queue<T, N> {
    fn drop(&mut self) {
        debug_assert!(self.is_initialized(), "dropping a queue that never completed init()");
        if self.is_initialized() {
            unsafe { kernel::vQueueDelete(self.handle) };
            self.handle = ptr::null_mut();
        }
    }
}
