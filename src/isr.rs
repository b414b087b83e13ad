//! Interrupt-context detection and the dual-path dispatch rule.
//!
//! Nearly every kernel call has two entry points: a blocking task-context
//! form and a non-blocking `FromISR` form that reports, through an output
//! flag, whether a higher-priority task became ready. Picking the wrong
//! one is undefined behaviour on a real kernel, so every handle operation
//! funnels through [`dispatch`], which resolves the context once and runs
//! the matching form.
//!
//! When the `FromISR` form raises the flag, the deferred context switch is
//! requested exactly once, after the operation completes and before
//! control returns to the interrupted code. Skipping it would leave the
//! newly-ready task waiting until the next natural preemption point.

use crate::kernel;
use crate::types::*;

/// Returns `true` while executing inside an interrupt handler.
///
/// Pure query, callable from any context. Backed by the port's
/// interrupt-nesting check (`xPortIsInsideInterrupt`).
#[inline]
pub fn in_isr_context() -> bool {
    kernel::xPortIsInsideInterrupt() != pdFALSE
}

/// Run the context-appropriate form of a kernel operation.
///
/// In task context only `task_ctx` runs; the woken-flag machinery is
/// bypassed entirely and no reschedule is ever requested. In interrupt
/// context `isr_ctx` runs with a fresh higher-priority-task-woken flag,
/// and a deferred reschedule is requested afterwards if the operation
/// raised it.
#[inline]
pub fn dispatch<R>(
    task_ctx: impl FnOnce() -> R,
    isr_ctx: impl FnOnce(&mut BaseType_t) -> R,
) -> R {
    if !in_isr_context() {
        task_ctx()
    } else {
        let mut higher_priority_woken: BaseType_t = pdFALSE;
        let result = isr_ctx(&mut higher_priority_woken);
        kernel::portYIELD_FROM_ISR(higher_priority_woken);
        result
    }
}
