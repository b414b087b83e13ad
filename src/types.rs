//! FreeRTOS base types and constants.
//!
//! The kernel API is defined in terms of a handful of port-dependent
//! scalar types. Their widths are selected with Cargo features so the
//! same handle code compiles against 32-bit and 64-bit ports:
//!
//! - `arch-32bit` / `arch-64bit` - `BaseType_t`, `UBaseType_t`, `StackType_t`
//! - `tick-16bit` / `tick-32bit` / `tick-64bit` - `TickType_t`

use core::ffi::c_void;

// =============================================================================
// Architecture-dependent types
// =============================================================================

/// Signed base type, architecture word size.
/// Used for boolean returns and error codes.
#[cfg(feature = "arch-32bit")]
pub type BaseType_t = i32;

#[cfg(feature = "arch-64bit")]
pub type BaseType_t = i64;

/// Unsigned base type, architecture word size.
/// Used for counts, capacities and priorities.
#[cfg(feature = "arch-32bit")]
pub type UBaseType_t = u32;

#[cfg(feature = "arch-64bit")]
pub type UBaseType_t = u64;

/// Stack element type; task stack depths are counted in these, not bytes.
#[cfg(feature = "arch-32bit")]
pub type StackType_t = u32;

#[cfg(feature = "arch-64bit")]
pub type StackType_t = u64;

// =============================================================================
// Tick type
// =============================================================================

#[cfg(feature = "tick-16bit")]
pub type TickType_t = u16;

#[cfg(feature = "tick-16bit")]
pub const portMAX_DELAY: TickType_t = 0xFFFF;

/// Tick counter type, 32-bit variant (the common case).
#[cfg(feature = "tick-32bit")]
pub type TickType_t = u32;

/// Block "forever" sentinel in ticks.
#[cfg(feature = "tick-32bit")]
pub const portMAX_DELAY: TickType_t = 0xFFFF_FFFF;

#[cfg(feature = "tick-64bit")]
pub type TickType_t = u64;

#[cfg(feature = "tick-64bit")]
pub const portMAX_DELAY: TickType_t = 0xFFFF_FFFF_FFFF_FFFF;

// =============================================================================
// Boolean-like constants (projdefs.h)
// =============================================================================

pub const pdFALSE: BaseType_t = 0;
pub const pdTRUE: BaseType_t = 1;

pub const pdPASS: BaseType_t = pdTRUE;
pub const pdFAIL: BaseType_t = pdFALSE;

// =============================================================================
// Millisecond/tick conversion
// =============================================================================

/// Convert milliseconds to ticks (pdMS_TO_TICKS).
#[inline(always)]
pub const fn pdMS_TO_TICKS(xTimeInMs: TickType_t) -> TickType_t {
    ((xTimeInMs as u64 * crate::config::configTICK_RATE_HZ as u64) / 1000u64) as TickType_t
}

/// Convert ticks to milliseconds (pdTICKS_TO_MS).
#[inline(always)]
pub const fn pdTICKS_TO_MS(xTimeInTicks: TickType_t) -> TickType_t {
    ((xTimeInTicks as u64 * 1000u64) / crate::config::configTICK_RATE_HZ as u64) as TickType_t
}

/// Millisecond sentinel for "wait forever".
///
/// Every blocking handle operation takes a timeout in milliseconds; `0`
/// polls, `MAX_DELAY_MS` blocks indefinitely.
pub const MAX_DELAY_MS: u32 = u32::MAX;

/// Map a millisecond timeout onto kernel ticks, preserving the
/// wait-forever sentinel. The conversion runs in 64 bits and clamps to
/// the longest finite delay, so a timeout that exceeds a narrow tick
/// range never truncates into a short one or aliases the sentinel.
#[inline]
pub(crate) fn ms_to_ticks(ms: u32) -> TickType_t {
    if ms == MAX_DELAY_MS {
        return portMAX_DELAY;
    }
    let ticks = (ms as u64 * crate::config::configTICK_RATE_HZ as u64) / 1000u64;
    if ticks >= portMAX_DELAY as u64 {
        portMAX_DELAY - 1
    } else {
        ticks as TickType_t
    }
}

// =============================================================================
// Function pointer types
// =============================================================================

/// Task entry point: `void vTaskFunction(void *pvParameters)`.
///
/// Task functions typically contain an endless loop and never return.
pub type TaskFunction_t = extern "C" fn(*mut c_void);

/// Software timer expiry callback, invoked on the timer-service task.
pub type TimerCallbackFunction_t = extern "C" fn(TimerHandle_t);

/// Function deferred to the timer-service task via a pended call.
pub type PendedFunction_t = extern "C" fn(*mut c_void, u32);

// =============================================================================
// Opaque kernel object handles
// =============================================================================

/// Opaque handle to a task control block.
pub type TaskHandle_t = *mut c_void;

/// Opaque handle to a queue.
pub type QueueHandle_t = *mut c_void;

/// Opaque handle to a semaphore or mutex (a queue underneath).
pub type SemaphoreHandle_t = QueueHandle_t;

/// Opaque handle to a software timer.
pub type TimerHandle_t = *mut c_void;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_forever_sentinel_maps_to_port_max_delay() {
        assert_eq!(ms_to_ticks(MAX_DELAY_MS), portMAX_DELAY);
    }

    #[test]
    fn zero_milliseconds_polls() {
        assert_eq!(ms_to_ticks(0), 0);
    }

    #[test]
    fn long_timeouts_convert_without_truncation() {
        // 70 s overflows a 16-bit tick range; the conversion must widen
        // and clamp rather than wrap.
        let ticks = ms_to_ticks(70_000);
        if (portMAX_DELAY as u64) > 70_000 {
            assert_eq!(ticks as u64, 70_000);
        } else {
            assert_eq!(ticks, portMAX_DELAY - 1);
        }
    }
}
