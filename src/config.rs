//! Build-time kernel configuration.
//!
//! The Rust equivalent of the slice of `FreeRTOSConfig.h` this layer
//! consumes. Feature toggles live in `Cargo.toml` (`mutexes`, `timers`,
//! `task-suspend`, ...); the numeric constants live here. When binding a
//! real kernel with the `kernel-ffi` backend, these values must match the
//! configuration the kernel image was compiled with.

use crate::types::*;

/// Tick rate in Hz. Millisecond timeouts are converted with this.
pub const configTICK_RATE_HZ: TickType_t = 1000;

/// Smallest stack a task may be created with, in words.
pub const configMINIMAL_STACK_SIZE: usize = 128;

/// Number of distinct task priority levels.
pub const configMAX_PRIORITIES: UBaseType_t = 25;

/// Maximum length of a task name, including the trailing NUL.
pub const configMAX_TASK_NAME_LEN: usize = 16;

/// Priority of the lowest-priority (idle) task.
pub const tskIDLE_PRIORITY: UBaseType_t = 0;

/// Number of cores the scheduler runs on.
#[cfg(feature = "multicore")]
pub const configNUMBER_OF_CORES: BaseType_t = 2;
#[cfg(not(feature = "multicore"))]
pub const configNUMBER_OF_CORES: BaseType_t = 1;
