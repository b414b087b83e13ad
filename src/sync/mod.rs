//! Safe handle types over the kernel primitives.
//!
//! Each handle owns exactly one kernel object and follows the same
//! two-phase lifecycle: construction is plain data assignment (usable in
//! statics, before the scheduler exists), and a single `init()` call
//! performs the one kernel-object creation. Operational methods route
//! through [`crate::isr::dispatch`] wherever the kernel provides a
//! `FromISR` form, so the same call works from task code and interrupt
//! handlers alike.
//!
//! # Example
//!
//! ```ignore
//! use freertos_helper::sync::Queue;
//!
//! static mut EVENTS: Queue<u32, 8> = Queue::new();
//!
//! fn startup() {
//!     unsafe { EVENTS.init() }.expect("queue creation failed");
//! }
//! ```

mod queue;
mod task;

#[cfg(feature = "counting-semaphores")]
mod counter;
#[cfg(feature = "mutexes")]
mod mutex;
#[cfg(feature = "timers")]
mod timer;

pub use queue::Queue;
pub use task::{
    delay, suspend_all, resume_all, tick_count, yield_now, CoreAffinity, Task,
};
#[cfg(feature = "task-delete")]
pub use task::delete_self;

#[cfg(feature = "counting-semaphores")]
pub use counter::Counter;
#[cfg(feature = "mutexes")]
pub use mutex::Mutex;
#[cfg(feature = "timers")]
pub use timer::Timer;
#[cfg(feature = "pend-function-call")]
pub use timer::pend_call;
