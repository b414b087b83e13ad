//! The narrow kernel API surface the handles consume.
//!
//! The handle layer owns no scheduling, storage or timing logic of its
//! own; everything funnels into the small set of create/take/give/
//! suspend/resume entry points re-exported here. Two backends provide
//! them:
//!
//! - `kernel-ffi` - `extern "C"` bindings against a real FreeRTOS kernel
//!   compiled into the target image.
//! - `kernel-hosted` - an std-backed simulation of the same surface, so
//!   the crate builds and its tests run on a development host.
//!
//! Both export identical signatures; the handles never know which one
//! they are talking to.

use crate::types::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "kernel-hosted")] {
        mod hosted;
        pub use hosted::*;
    } else if #[cfg(feature = "kernel-ffi")] {
        mod ffi;
        pub use ffi::*;
    } else {
        compile_error!("select a kernel backend: feature `kernel-hosted` or `kernel-ffi`");
    }
}

// =============================================================================
// Scheduler state (task.h)
// =============================================================================

pub const taskSCHEDULER_NOT_STARTED: BaseType_t = 0;
pub const taskSCHEDULER_RUNNING: BaseType_t = 1;
pub const taskSCHEDULER_SUSPENDED: BaseType_t = 2;

// =============================================================================
// Static kernel-object storage
// =============================================================================
//
// Mirrors of the xSTATIC_* structures from FreeRTOS.h: opaque blobs the
// kernel formats in place when an object is created through one of the
// *CreateStatic entry points. The sizes cover a 32-bit port built without
// the trace facility; a `kernel-ffi` build against a differently
// configured kernel must keep these in sync with its FreeRTOSConfig.h.
// The hosted backend accepts and ignores them.

/// Storage for a statically allocated task control block (`StaticTask_t`).
#[repr(C, align(8))]
pub struct StaticTask_t {
    _storage: [u8; 120],
}

impl StaticTask_t {
    pub const fn new() -> Self {
        Self { _storage: [0; 120] }
    }
}

/// Storage for a statically allocated queue, semaphore or mutex
/// (`StaticQueue_t` / `StaticSemaphore_t`).
#[repr(C, align(8))]
pub struct StaticQueue_t {
    _storage: [u8; 80],
}

impl StaticQueue_t {
    pub const fn new() -> Self {
        Self { _storage: [0; 80] }
    }
}

/// Semaphores and mutexes are queues underneath.
pub type StaticSemaphore_t = StaticQueue_t;

/// Storage for a statically allocated software timer (`StaticTimer_t`).
#[repr(C, align(8))]
pub struct StaticTimer_t {
    _storage: [u8; 48],
}

impl StaticTimer_t {
    pub const fn new() -> Self {
        Self { _storage: [0; 48] }
    }
}
