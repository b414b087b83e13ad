//! `extern "C"` bindings against a real FreeRTOS kernel.
//!
//! Only functions that exist as linkable symbols are declared; the
//! convenience names the C headers provide as macros (`xQueueCreate`,
//! `xSemaphoreTake`, `xTimerStart`, ...) are reconstructed here as inline
//! wrappers over their generic counterparts, expanding to the same calls
//! the macros would.
//!
//! This backend never runs on a host: it links only when the final image
//! carries a FreeRTOS kernel built with a configuration matching the
//! crate's features (see `config.rs`).

use core::ffi::c_void;
use core::ptr;

use super::{StaticQueue_t, StaticTask_t, StaticTimer_t};
use crate::types::*;

// =============================================================================
// Raw symbols
// =============================================================================

// queue.h
const queueSEND_TO_BACK: BaseType_t = 0;
const queueQUEUE_TYPE_BASE: u8 = 0;
#[cfg(feature = "mutexes")]
const queueQUEUE_TYPE_MUTEX: u8 = 1;

// timers.h command identifiers
#[cfg(feature = "timers")]
const tmrCOMMAND_START: BaseType_t = 1;
#[cfg(feature = "timers")]
const tmrCOMMAND_RESET: BaseType_t = 2;
#[cfg(feature = "timers")]
const tmrCOMMAND_STOP: BaseType_t = 3;
#[cfg(feature = "timers")]
const tmrCOMMAND_CHANGE_PERIOD: BaseType_t = 4;
#[cfg(feature = "timers")]
const tmrCOMMAND_DELETE: BaseType_t = 5;
#[cfg(feature = "timers")]
const tmrCOMMAND_START_FROM_ISR: BaseType_t = 6;
#[cfg(feature = "timers")]
const tmrCOMMAND_RESET_FROM_ISR: BaseType_t = 7;
#[cfg(feature = "timers")]
const tmrCOMMAND_STOP_FROM_ISR: BaseType_t = 8;
#[cfg(feature = "timers")]
const tmrCOMMAND_CHANGE_PERIOD_FROM_ISR: BaseType_t = 9;

// task.h notify action (eNotifyAction)
#[cfg(feature = "task-notifications")]
const eIncrement: BaseType_t = 2;

extern "C" {
    pub fn xTaskCreate(
        pxTaskCode: TaskFunction_t,
        pcName: *const u8,
        usStackDepth: u32,
        pvParameters: *mut c_void,
        uxPriority: UBaseType_t,
        pxCreatedTask: *mut TaskHandle_t,
    ) -> BaseType_t;

    #[cfg(feature = "static-alloc")]
    pub fn xTaskCreateStatic(
        pxTaskCode: TaskFunction_t,
        pcName: *const u8,
        ulStackDepth: u32,
        pvParameters: *mut c_void,
        uxPriority: UBaseType_t,
        puxStackBuffer: *mut StackType_t,
        pxTaskBuffer: *mut StaticTask_t,
    ) -> TaskHandle_t;

    #[cfg(feature = "multicore")]
    pub fn xTaskCreatePinnedToCore(
        pxTaskCode: TaskFunction_t,
        pcName: *const u8,
        usStackDepth: u32,
        pvParameters: *mut c_void,
        uxPriority: UBaseType_t,
        pxCreatedTask: *mut TaskHandle_t,
        xCoreID: BaseType_t,
    ) -> BaseType_t;

    #[cfg(all(feature = "multicore", feature = "static-alloc"))]
    pub fn xTaskCreateStaticPinnedToCore(
        pxTaskCode: TaskFunction_t,
        pcName: *const u8,
        ulStackDepth: u32,
        pvParameters: *mut c_void,
        uxPriority: UBaseType_t,
        puxStackBuffer: *mut StackType_t,
        pxTaskBuffer: *mut StaticTask_t,
        xCoreID: BaseType_t,
    ) -> TaskHandle_t;

    #[cfg(feature = "task-delete")]
    pub fn vTaskDelete(xTaskToDelete: TaskHandle_t);
    #[cfg(feature = "task-suspend")]
    pub fn vTaskSuspend(xTaskToSuspend: TaskHandle_t);
    #[cfg(feature = "task-suspend")]
    pub fn vTaskResume(xTaskToResume: TaskHandle_t);
    #[cfg(feature = "task-suspend")]
    pub fn xTaskResumeFromISR(xTaskToResume: TaskHandle_t) -> BaseType_t;

    #[cfg(feature = "task-notifications")]
    fn xTaskGenericNotify(
        xTaskToNotify: TaskHandle_t,
        uxIndexToNotify: UBaseType_t,
        ulValue: u32,
        eAction: BaseType_t,
        pulPreviousNotificationValue: *mut u32,
    ) -> BaseType_t;
    #[cfg(feature = "task-notifications")]
    fn vTaskGenericNotifyGiveFromISR(
        xTaskToNotify: TaskHandle_t,
        uxIndexToNotify: UBaseType_t,
        pxHigherPriorityTaskWoken: *mut BaseType_t,
    );
    #[cfg(feature = "task-notifications")]
    fn ulTaskGenericNotifyTake(
        uxIndexToWaitOn: UBaseType_t,
        xClearCountOnExit: BaseType_t,
        xTicksToWait: TickType_t,
    ) -> u32;

    #[link_name = "xTaskGetCurrentTaskHandle"]
    fn xTaskGetCurrentTaskHandle_raw() -> TaskHandle_t;
    #[link_name = "xTaskGetSchedulerState"]
    fn xTaskGetSchedulerState_raw() -> BaseType_t;
    #[link_name = "xTaskGetTickCount"]
    fn xTaskGetTickCount_raw() -> TickType_t;
    #[cfg(feature = "timers")]
    fn xTaskGetTickCountFromISR() -> TickType_t;
    #[link_name = "vTaskDelay"]
    fn vTaskDelay_raw(xTicksToDelay: TickType_t);
    pub fn xTaskDelayUntil(
        pxPreviousWakeTime: *mut TickType_t,
        xTimeIncrement: TickType_t,
    ) -> BaseType_t;
    #[link_name = "vTaskSuspendAll"]
    fn vTaskSuspendAll_raw();
    #[link_name = "xTaskResumeAll"]
    fn xTaskResumeAll_raw() -> BaseType_t;

    fn xQueueGenericCreate(
        uxQueueLength: UBaseType_t,
        uxItemSize: UBaseType_t,
        ucQueueType: u8,
    ) -> QueueHandle_t;
    #[cfg(feature = "static-alloc")]
    fn xQueueGenericCreateStatic(
        uxQueueLength: UBaseType_t,
        uxItemSize: UBaseType_t,
        pucQueueStorage: *mut u8,
        pxStaticQueue: *mut StaticQueue_t,
        ucQueueType: u8,
    ) -> QueueHandle_t;
    pub fn vQueueDelete(xQueue: QueueHandle_t);
    fn xQueueGenericSend(
        xQueue: QueueHandle_t,
        pvItemToQueue: *const c_void,
        xTicksToWait: TickType_t,
        xCopyPosition: BaseType_t,
    ) -> BaseType_t;
    fn xQueueGenericSendFromISR(
        xQueue: QueueHandle_t,
        pvItemToQueue: *const c_void,
        pxHigherPriorityTaskWoken: *mut BaseType_t,
        xCopyPosition: BaseType_t,
    ) -> BaseType_t;
    #[link_name = "xQueueReceive"]
    fn xQueueReceive_raw(
        xQueue: QueueHandle_t,
        pvBuffer: *mut c_void,
        xTicksToWait: TickType_t,
    ) -> BaseType_t;
    #[link_name = "xQueueReceiveFromISR"]
    fn xQueueReceiveFromISR_raw(
        xQueue: QueueHandle_t,
        pvBuffer: *mut c_void,
        pxHigherPriorityTaskWoken: *mut BaseType_t,
    ) -> BaseType_t;
    #[link_name = "xQueuePeek"]
    fn xQueuePeek_raw(
        xQueue: QueueHandle_t,
        pvBuffer: *mut c_void,
        xTicksToWait: TickType_t,
    ) -> BaseType_t;
    #[link_name = "xQueuePeekFromISR"]
    fn xQueuePeekFromISR_raw(xQueue: QueueHandle_t, pvBuffer: *mut c_void) -> BaseType_t;
    #[link_name = "uxQueueMessagesWaiting"]
    fn uxQueueMessagesWaiting_raw(xQueue: QueueHandle_t) -> UBaseType_t;
    #[link_name = "uxQueueSpacesAvailable"]
    fn uxQueueSpacesAvailable_raw(xQueue: QueueHandle_t) -> UBaseType_t;
    fn xQueueGenericReset(xQueue: QueueHandle_t, xNewQueue: BaseType_t) -> BaseType_t;

    #[cfg(feature = "mutexes")]
    fn xQueueCreateMutex(ucQueueType: u8) -> QueueHandle_t;
    #[cfg(all(feature = "mutexes", feature = "static-alloc"))]
    fn xQueueCreateMutexStatic(
        ucQueueType: u8,
        pxStaticQueue: *mut StaticQueue_t,
    ) -> QueueHandle_t;
    #[cfg(feature = "counting-semaphores")]
    fn xQueueCreateCountingSemaphore(
        uxMaxCount: UBaseType_t,
        uxInitialCount: UBaseType_t,
    ) -> QueueHandle_t;
    #[cfg(all(feature = "counting-semaphores", feature = "static-alloc"))]
    fn xQueueCreateCountingSemaphoreStatic(
        uxMaxCount: UBaseType_t,
        uxInitialCount: UBaseType_t,
        pxStaticQueue: *mut StaticQueue_t,
    ) -> QueueHandle_t;
    fn xQueueSemaphoreTake(xQueue: QueueHandle_t, xTicksToWait: TickType_t) -> BaseType_t;
    fn xQueueGiveFromISR(
        xQueue: QueueHandle_t,
        pxHigherPriorityTaskWoken: *mut BaseType_t,
    ) -> BaseType_t;

    #[cfg(feature = "timers")]
    #[link_name = "xTimerCreate"]
    fn xTimerCreate_raw(
        pcTimerName: *const u8,
        xTimerPeriodInTicks: TickType_t,
        xAutoReload: BaseType_t,
        pvTimerID: *mut c_void,
        pxCallbackFunction: TimerCallbackFunction_t,
    ) -> TimerHandle_t;
    #[cfg(all(feature = "timers", feature = "static-alloc"))]
    fn xTimerCreateStatic_raw(
        pcTimerName: *const u8,
        xTimerPeriodInTicks: TickType_t,
        xAutoReload: BaseType_t,
        pvTimerID: *mut c_void,
        pxCallbackFunction: TimerCallbackFunction_t,
        pxTimerBuffer: *mut StaticTimer_t,
    ) -> TimerHandle_t;
    #[cfg(feature = "timers")]
    fn xTimerGenericCommand(
        xTimer: TimerHandle_t,
        xCommandID: BaseType_t,
        xOptionalValue: TickType_t,
        pxHigherPriorityTaskWoken: *mut BaseType_t,
        xTicksToWait: TickType_t,
    ) -> BaseType_t;
    #[cfg(feature = "timers")]
    #[link_name = "xTimerIsTimerActive"]
    fn xTimerIsTimerActive_raw(xTimer: TimerHandle_t) -> BaseType_t;
    #[cfg(feature = "timers")]
    pub fn pvTimerGetTimerID(xTimer: TimerHandle_t) -> *mut c_void;
    #[cfg(feature = "timers")]
    pub fn vTimerSetTimerID(xTimer: TimerHandle_t, pvNewID: *mut c_void);
    #[cfg(feature = "pend-function-call")]
    #[link_name = "xTimerPendFunctionCall"]
    fn xTimerPendFunctionCall_raw(
        xFunctionToPend: PendedFunction_t,
        pvParameter1: *mut c_void,
        ulParameter2: u32,
        xTicksToWait: TickType_t,
    ) -> BaseType_t;
    #[cfg(feature = "pend-function-call")]
    #[link_name = "xTimerPendFunctionCallFromISR"]
    fn xTimerPendFunctionCallFromISR_raw(
        xFunctionToPend: PendedFunction_t,
        pvParameter1: *mut c_void,
        ulParameter2: u32,
        pxHigherPriorityTaskWoken: *mut BaseType_t,
    ) -> BaseType_t;
}

// =============================================================================
// Port queries
// =============================================================================

/// Interrupt-nesting check supplied by the port layer.
#[inline]
pub fn xPortIsInsideInterrupt() -> BaseType_t {
    #[cfg(target_os = "espidf")]
    {
        extern "C" {
            fn xPortInIsrContext() -> BaseType_t;
        }
        return unsafe { xPortInIsrContext() };
    }
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    {
        // SCB->ICSR VECTACTIVE: non-zero while servicing an exception.
        const SCB_ICSR: *const u32 = 0xE000_ED04 as *const u32;
        return if unsafe { core::ptr::read_volatile(SCB_ICSR) } & 0x1FF != 0 {
            pdTRUE
        } else {
            pdFALSE
        };
    }
    #[cfg(not(any(target_os = "espidf", all(target_arch = "arm", target_os = "none"))))]
    {
        return pdFALSE;
    }
}

/// Request a context switch at interrupt return if `xSwitchRequired`.
#[inline]
pub fn portYIELD_FROM_ISR(xSwitchRequired: BaseType_t) {
    if xSwitchRequired != pdFALSE {
        taskYIELD();
    }
}

/// Hand the processor to the scheduler.
#[inline]
pub fn taskYIELD() {
    #[cfg(target_os = "espidf")]
    {
        extern "C" {
            fn vPortYield();
        }
        unsafe { vPortYield() };
    }
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    {
        // Pend PendSV; the switch happens at the lowest exception priority.
        const SCB_ICSR: *mut u32 = 0xE000_ED04 as *mut u32;
        const PENDSVSET: u32 = 1 << 28;
        unsafe { core::ptr::write_volatile(SCB_ICSR, PENDSVSET) };
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
    #[cfg(not(any(target_os = "espidf", all(target_arch = "arm", target_os = "none"))))]
    {
        unimplemented!("no yield mechanism for this target")
    }
}

// =============================================================================
// Tasks
// =============================================================================

pub fn xTaskGetCurrentTaskHandle() -> TaskHandle_t {
    unsafe { xTaskGetCurrentTaskHandle_raw() }
}

pub fn xTaskGetSchedulerState() -> BaseType_t {
    unsafe { xTaskGetSchedulerState_raw() }
}

pub fn xTaskGetTickCount() -> TickType_t {
    unsafe { xTaskGetTickCount_raw() }
}

pub fn vTaskDelay(xTicksToDelay: TickType_t) {
    unsafe { vTaskDelay_raw(xTicksToDelay) }
}

pub fn vTaskSuspendAll() {
    unsafe { vTaskSuspendAll_raw() }
}

pub fn xTaskResumeAll() -> BaseType_t {
    unsafe { xTaskResumeAll_raw() }
}

#[cfg(feature = "task-notifications")]
pub unsafe fn xTaskNotifyGive(xTaskToNotify: TaskHandle_t) -> BaseType_t {
    xTaskGenericNotify(xTaskToNotify, 0, 0, eIncrement, ptr::null_mut())
}

#[cfg(feature = "task-notifications")]
pub unsafe fn vTaskNotifyGiveFromISR(
    xTaskToNotify: TaskHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) {
    vTaskGenericNotifyGiveFromISR(xTaskToNotify, 0, pxHigherPriorityTaskWoken)
}

#[cfg(feature = "task-notifications")]
pub fn ulTaskNotifyTake(xClearCountOnExit: BaseType_t, xTicksToWait: TickType_t) -> u32 {
    unsafe { ulTaskGenericNotifyTake(0, xClearCountOnExit, xTicksToWait) }
}

// =============================================================================
// Queues
// =============================================================================

pub unsafe fn xQueueCreate(uxQueueLength: UBaseType_t, uxItemSize: UBaseType_t) -> QueueHandle_t {
    xQueueGenericCreate(uxQueueLength, uxItemSize, queueQUEUE_TYPE_BASE)
}

#[cfg(feature = "static-alloc")]
pub unsafe fn xQueueCreateStatic(
    uxQueueLength: UBaseType_t,
    uxItemSize: UBaseType_t,
    pucQueueStorage: *mut u8,
    pxStaticQueue: *mut StaticQueue_t,
) -> QueueHandle_t {
    xQueueGenericCreateStatic(
        uxQueueLength,
        uxItemSize,
        pucQueueStorage,
        pxStaticQueue,
        queueQUEUE_TYPE_BASE,
    )
}

pub unsafe fn xQueueSend(
    xQueue: QueueHandle_t,
    pvItemToQueue: *const c_void,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    xQueueGenericSend(xQueue, pvItemToQueue, xTicksToWait, queueSEND_TO_BACK)
}

pub unsafe fn xQueueSendFromISR(
    xQueue: QueueHandle_t,
    pvItemToQueue: *const c_void,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xQueueGenericSendFromISR(xQueue, pvItemToQueue, pxHigherPriorityTaskWoken, queueSEND_TO_BACK)
}

pub unsafe fn xQueueReceive(
    xQueue: QueueHandle_t,
    pvBuffer: *mut c_void,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    xQueueReceive_raw(xQueue, pvBuffer, xTicksToWait)
}

pub unsafe fn xQueueReceiveFromISR(
    xQueue: QueueHandle_t,
    pvBuffer: *mut c_void,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xQueueReceiveFromISR_raw(xQueue, pvBuffer, pxHigherPriorityTaskWoken)
}

pub unsafe fn xQueuePeek(
    xQueue: QueueHandle_t,
    pvBuffer: *mut c_void,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    xQueuePeek_raw(xQueue, pvBuffer, xTicksToWait)
}

pub unsafe fn xQueuePeekFromISR(xQueue: QueueHandle_t, pvBuffer: *mut c_void) -> BaseType_t {
    xQueuePeekFromISR_raw(xQueue, pvBuffer)
}

pub unsafe fn uxQueueMessagesWaiting(xQueue: QueueHandle_t) -> UBaseType_t {
    uxQueueMessagesWaiting_raw(xQueue)
}

pub unsafe fn uxQueueSpacesAvailable(xQueue: QueueHandle_t) -> UBaseType_t {
    uxQueueSpacesAvailable_raw(xQueue)
}

pub unsafe fn xQueueReset(xQueue: QueueHandle_t) -> BaseType_t {
    xQueueGenericReset(xQueue, pdFALSE)
}

// =============================================================================
// Semaphores
// =============================================================================

#[cfg(feature = "mutexes")]
pub unsafe fn xSemaphoreCreateMutex() -> SemaphoreHandle_t {
    xQueueCreateMutex(queueQUEUE_TYPE_MUTEX)
}

#[cfg(all(feature = "mutexes", feature = "static-alloc"))]
pub unsafe fn xSemaphoreCreateMutexStatic(
    pxMutexBuffer: *mut StaticQueue_t,
) -> SemaphoreHandle_t {
    xQueueCreateMutexStatic(queueQUEUE_TYPE_MUTEX, pxMutexBuffer)
}

#[cfg(feature = "counting-semaphores")]
pub unsafe fn xSemaphoreCreateCounting(
    uxMaxCount: UBaseType_t,
    uxInitialCount: UBaseType_t,
) -> SemaphoreHandle_t {
    xQueueCreateCountingSemaphore(uxMaxCount, uxInitialCount)
}

#[cfg(all(feature = "counting-semaphores", feature = "static-alloc"))]
pub unsafe fn xSemaphoreCreateCountingStatic(
    uxMaxCount: UBaseType_t,
    uxInitialCount: UBaseType_t,
    pxSemaphoreBuffer: *mut StaticQueue_t,
) -> SemaphoreHandle_t {
    xQueueCreateCountingSemaphoreStatic(uxMaxCount, uxInitialCount, pxSemaphoreBuffer)
}

pub unsafe fn vSemaphoreDelete(xSemaphore: SemaphoreHandle_t) {
    vQueueDelete(xSemaphore)
}

pub unsafe fn xSemaphoreTake(xSemaphore: SemaphoreHandle_t, xTicksToWait: TickType_t) -> BaseType_t {
    xQueueSemaphoreTake(xSemaphore, xTicksToWait)
}

pub unsafe fn xSemaphoreTakeFromISR(
    xSemaphore: SemaphoreHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xQueueReceiveFromISR_raw(xSemaphore, ptr::null_mut(), pxHigherPriorityTaskWoken)
}

pub unsafe fn xSemaphoreGive(xSemaphore: SemaphoreHandle_t) -> BaseType_t {
    xQueueGenericSend(xSemaphore, ptr::null(), 0, queueSEND_TO_BACK)
}

pub unsafe fn xSemaphoreGiveFromISR(
    xSemaphore: SemaphoreHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xQueueGiveFromISR(xSemaphore, pxHigherPriorityTaskWoken)
}

pub unsafe fn uxSemaphoreGetCount(xSemaphore: SemaphoreHandle_t) -> UBaseType_t {
    uxQueueMessagesWaiting_raw(xSemaphore)
}

// =============================================================================
// Software timers
// =============================================================================

#[cfg(feature = "timers")]
pub unsafe fn xTimerCreate(
    pcTimerName: *const u8,
    xTimerPeriodInTicks: TickType_t,
    xAutoReload: BaseType_t,
    pvTimerID: *mut c_void,
    pxCallbackFunction: TimerCallbackFunction_t,
) -> TimerHandle_t {
    xTimerCreate_raw(pcTimerName, xTimerPeriodInTicks, xAutoReload, pvTimerID, pxCallbackFunction)
}

#[cfg(all(feature = "timers", feature = "static-alloc"))]
pub unsafe fn xTimerCreateStatic(
    pcTimerName: *const u8,
    xTimerPeriodInTicks: TickType_t,
    xAutoReload: BaseType_t,
    pvTimerID: *mut c_void,
    pxCallbackFunction: TimerCallbackFunction_t,
    pxTimerBuffer: *mut StaticTimer_t,
) -> TimerHandle_t {
    xTimerCreateStatic_raw(
        pcTimerName,
        xTimerPeriodInTicks,
        xAutoReload,
        pvTimerID,
        pxCallbackFunction,
        pxTimerBuffer,
    )
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerDelete(xTimer: TimerHandle_t, xTicksToWait: TickType_t) -> BaseType_t {
    xTimerGenericCommand(xTimer, tmrCOMMAND_DELETE, 0, ptr::null_mut(), xTicksToWait)
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStart(xTimer: TimerHandle_t, xTicksToWait: TickType_t) -> BaseType_t {
    xTimerGenericCommand(
        xTimer,
        tmrCOMMAND_START,
        xTaskGetTickCount(),
        ptr::null_mut(),
        xTicksToWait,
    )
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStartFromISR(
    xTimer: TimerHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xTimerGenericCommand(
        xTimer,
        tmrCOMMAND_START_FROM_ISR,
        xTaskGetTickCountFromISR(),
        pxHigherPriorityTaskWoken,
        0,
    )
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStop(xTimer: TimerHandle_t, xTicksToWait: TickType_t) -> BaseType_t {
    xTimerGenericCommand(xTimer, tmrCOMMAND_STOP, 0, ptr::null_mut(), xTicksToWait)
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStopFromISR(
    xTimer: TimerHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xTimerGenericCommand(xTimer, tmrCOMMAND_STOP_FROM_ISR, 0, pxHigherPriorityTaskWoken, 0)
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerChangePeriod(
    xTimer: TimerHandle_t,
    xNewPeriod: TickType_t,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    xTimerGenericCommand(xTimer, tmrCOMMAND_CHANGE_PERIOD, xNewPeriod, ptr::null_mut(), xTicksToWait)
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerChangePeriodFromISR(
    xTimer: TimerHandle_t,
    xNewPeriod: TickType_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xTimerGenericCommand(
        xTimer,
        tmrCOMMAND_CHANGE_PERIOD_FROM_ISR,
        xNewPeriod,
        pxHigherPriorityTaskWoken,
        0,
    )
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerReset(xTimer: TimerHandle_t, xTicksToWait: TickType_t) -> BaseType_t {
    xTimerGenericCommand(
        xTimer,
        tmrCOMMAND_RESET,
        xTaskGetTickCount(),
        ptr::null_mut(),
        xTicksToWait,
    )
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerResetFromISR(
    xTimer: TimerHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xTimerGenericCommand(
        xTimer,
        tmrCOMMAND_RESET_FROM_ISR,
        xTaskGetTickCountFromISR(),
        pxHigherPriorityTaskWoken,
        0,
    )
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerIsTimerActive(xTimer: TimerHandle_t) -> BaseType_t {
    xTimerIsTimerActive_raw(xTimer)
}

#[cfg(feature = "pend-function-call")]
pub unsafe fn xTimerPendFunctionCall(
    xFunctionToPend: PendedFunction_t,
    pvParameter1: *mut c_void,
    ulParameter2: u32,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    xTimerPendFunctionCall_raw(xFunctionToPend, pvParameter1, ulParameter2, xTicksToWait)
}

#[cfg(feature = "pend-function-call")]
pub unsafe fn xTimerPendFunctionCallFromISR(
    xFunctionToPend: PendedFunction_t,
    pvParameter1: *mut c_void,
    ulParameter2: u32,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xTimerPendFunctionCallFromISR_raw(
        xFunctionToPend,
        pvParameter1,
        ulParameter2,
        pxHigherPriorityTaskWoken,
    )
}
