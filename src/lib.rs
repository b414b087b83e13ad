//! # freertos-helper
//!
//! Small object-oriented handles over the FreeRTOS primitives — tasks,
//! queues, mutexes, counting semaphores and software timers — for ESP32,
//! RP2040 and generic Cortex-M targets.
//!
//! Every handle follows the same two-phase lifecycle: `const` construction
//! (data only, safe in statics) followed by a single `init()` that creates
//! the kernel object. Every operation with a `FromISR` counterpart routes
//! through [`isr::dispatch`], so the same call is correct from task code
//! and from interrupt handlers, including the deferred context switch on
//! interrupt return.
//!
//! ## Kernel backends
//!
//! - `kernel-ffi` - link against a real FreeRTOS kernel in the target
//!   image.
//! - `kernel-hosted` (default) - an std-backed simulation of the same API
//!   surface, so the crate and its tests run on a development host.
//!
//! ## Features
//!
//! - `arch-32bit` / `arch-64bit` - width of the kernel base types
//! - `tick-16bit` / `tick-32bit` / `tick-64bit` - width of the tick count
//! - `static-alloc` - back kernel objects with storage embedded in the
//!   handle instead of heap allocation
//! - `multicore` - core-affinity task placement
//! - `mutexes`, `counting-semaphores`, `timers`, `task-notifications`,
//!   `task-suspend`, `task-delete`, `pend-function-call` - the usual
//!   kernel feature toggles, mirroring `FreeRTOSConfig.h`
//! - `defmt` - derive `defmt::Format` on public error and enum types

#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod error;
pub mod isr;
pub mod kernel;
pub mod sync;
pub mod types;

pub use error::RtosError;
pub use isr::{dispatch, in_isr_context};
pub use sync::{delay, yield_now, CoreAffinity, Queue, Task};

#[cfg(feature = "counting-semaphores")]
pub use sync::Counter;
#[cfg(feature = "mutexes")]
pub use sync::Mutex;
#[cfg(feature = "timers")]
pub use sync::Timer;
