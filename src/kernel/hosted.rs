//! Host-side simulation of the kernel surface.
//!
//! Implements the same entry points as the `kernel-ffi` backend on top of
//! `std` threads and condvars so the crate, and above all its test suite,
//! runs on a development machine. Handles are raw pointers into leaked
//! `Arc` allocations, mirroring the opaque-pointer handles a real kernel
//! hands out.
//!
//! Fidelity notes:
//! - Queues copy items by value, block with real timeouts and report the
//!   woken flag from the `FromISR` forms based on whether a waiter was
//!   actually parked on the other side.
//! - "Interrupt context" is a thread-local flag toggled through
//!   [`sim_enter_isr`] / [`sim_exit_isr`]; deferred reschedule requests
//!   are counted per thread and drained with [`sim_take_yield_requests`].
//! - Suspend/resume and delete are observed at blocking points only; a
//!   compute-bound simulated task cannot be preempted mid-loop the way
//!   real hardware would.

use core::ffi::c_void;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use crate::types::*;

#[cfg(feature = "static-alloc")]
use super::{StaticQueue_t, StaticTask_t};
#[cfg(all(feature = "timers", feature = "static-alloc"))]
use super::StaticTimer_t;
use super::{taskSCHEDULER_RUNNING, taskSCHEDULER_SUSPENDED};

/// Raw pointer that may cross a thread boundary. The simulation upholds
/// the aliasing rules the kernel API already demands of its callers.
#[derive(Copy, Clone)]
struct SendPtr(*mut c_void);
unsafe impl Send for SendPtr {}

thread_local! {
    static CURRENT_TASK: core::cell::Cell<*mut c_void> =
        const { core::cell::Cell::new(core::ptr::null_mut()) };
    static IN_ISR: core::cell::Cell<bool> = const { core::cell::Cell::new(false) };
    static YIELD_REQUESTS: core::cell::Cell<u32> = const { core::cell::Cell::new(0) };
}

fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// `portMAX_DELAY` means block forever; anything else is a tick count at
/// the configured 1 kHz tick rate.
fn ticks_to_duration(ticks: TickType_t) -> Option<Duration> {
    if ticks == portMAX_DELAY {
        None
    } else {
        Some(Duration::from_millis(ticks as u64))
    }
}

fn name_from_ptr(pcName: *const u8) -> String {
    if pcName.is_null() {
        return String::new();
    }
    let mut bytes = Vec::new();
    let mut p = pcName;
    unsafe {
        while *p != 0 {
            bytes.push(*p);
            p = p.add(1);
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

// =============================================================================
// Simulated interrupt context
// =============================================================================

/// Mark the calling thread as executing inside an interrupt handler.
pub fn sim_enter_isr() {
    IN_ISR.with(|f| f.set(true));
}

/// Leave the simulated interrupt context.
pub fn sim_exit_isr() {
    IN_ISR.with(|f| f.set(false));
}

/// Drain the calling thread's deferred-reschedule counter.
pub fn sim_take_yield_requests() -> u32 {
    YIELD_REQUESTS.with(|c| c.replace(0))
}

pub fn xPortIsInsideInterrupt() -> BaseType_t {
    if IN_ISR.with(|f| f.get()) {
        pdTRUE
    } else {
        pdFALSE
    }
}

pub fn portYIELD_FROM_ISR(xSwitchRequired: BaseType_t) {
    if xSwitchRequired != pdFALSE {
        YIELD_REQUESTS.with(|c| c.set(c.get() + 1));
    }
}

pub fn taskYIELD() {
    thread::yield_now();
}

// =============================================================================
// Queues (also back semaphores and mutexes)
// =============================================================================

struct QueueInner {
    items: VecDeque<Box<[u8]>>,
    rx_waiters: usize,
    tx_waiters: usize,
}

struct HostedQueue {
    item_size: usize,
    capacity: usize,
    inner: Mutex<QueueInner>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl HostedQueue {
    fn new(capacity: usize, item_size: usize) -> Arc<Self> {
        Arc::new(HostedQueue {
            item_size,
            capacity,
            inner: Mutex::new(QueueInner {
                items: VecDeque::with_capacity(capacity),
                rx_waiters: 0,
                tx_waiters: 0,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        })
    }

    fn into_handle(self: Arc<Self>) -> QueueHandle_t {
        Arc::into_raw(self) as QueueHandle_t
    }

    unsafe fn item_from_ptr(&self, pvItem: *const c_void) -> Box<[u8]> {
        if self.item_size == 0 {
            Box::new([])
        } else {
            core::slice::from_raw_parts(pvItem as *const u8, self.item_size).into()
        }
    }

    unsafe fn item_to_ptr(&self, item: &[u8], pvBuffer: *mut c_void) {
        if self.item_size != 0 && !pvBuffer.is_null() {
            core::ptr::copy_nonoverlapping(item.as_ptr(), pvBuffer as *mut u8, self.item_size);
        }
    }
}

/// Borrow the queue behind a handle without consuming the handle's
/// reference.
unsafe fn queue_ref(xQueue: QueueHandle_t) -> Arc<HostedQueue> {
    let ptr = xQueue as *const HostedQueue;
    Arc::increment_strong_count(ptr);
    Arc::from_raw(ptr)
}

pub unsafe fn xQueueCreate(uxQueueLength: UBaseType_t, uxItemSize: UBaseType_t) -> QueueHandle_t {
    if uxQueueLength == 0 {
        return core::ptr::null_mut();
    }
    HostedQueue::new(uxQueueLength as usize, uxItemSize as usize).into_handle()
}

#[cfg(feature = "static-alloc")]
pub unsafe fn xQueueCreateStatic(
    uxQueueLength: UBaseType_t,
    uxItemSize: UBaseType_t,
    _pucQueueStorage: *mut u8,
    _pxStaticQueue: *mut StaticQueue_t,
) -> QueueHandle_t {
    xQueueCreate(uxQueueLength, uxItemSize)
}

pub unsafe fn vQueueDelete(xQueue: QueueHandle_t) {
    drop(Arc::from_raw(xQueue as *const HostedQueue));
}

pub unsafe fn xQueueSend(
    xQueue: QueueHandle_t,
    pvItemToQueue: *const c_void,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    let q = queue_ref(xQueue);
    let item = q.item_from_ptr(pvItemToQueue);
    let timeout = ticks_to_duration(xTicksToWait);
    let deadline = timeout.map(|d| Instant::now() + d);
    let mut inner = q.inner.lock().unwrap();
    while inner.items.len() == q.capacity {
        inner.tx_waiters += 1;
        let (guard, timed_out) = match deadline {
            None => (q.not_full.wait(inner).unwrap(), false),
            Some(dl) => {
                let now = Instant::now();
                if now >= dl {
                    inner.tx_waiters -= 1;
                    return pdFAIL;
                }
                let (g, r) = q.not_full.wait_timeout(inner, dl - now).unwrap();
                (g, r.timed_out())
            }
        };
        inner = guard;
        inner.tx_waiters -= 1;
        if timed_out && inner.items.len() == q.capacity {
            return pdFAIL;
        }
    }
    inner.items.push_back(item);
    q.not_empty.notify_one();
    pdPASS
}

pub unsafe fn xQueueSendFromISR(
    xQueue: QueueHandle_t,
    pvItemToQueue: *const c_void,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    let q = queue_ref(xQueue);
    let item = q.item_from_ptr(pvItemToQueue);
    let mut inner = q.inner.lock().unwrap();
    if inner.items.len() == q.capacity {
        return pdFAIL;
    }
    inner.items.push_back(item);
    if inner.rx_waiters > 0 && !pxHigherPriorityTaskWoken.is_null() {
        *pxHigherPriorityTaskWoken = pdTRUE;
    }
    q.not_empty.notify_one();
    pdPASS
}

unsafe fn queue_take(
    q: &HostedQueue,
    pvBuffer: *mut c_void,
    xTicksToWait: TickType_t,
    remove: bool,
) -> BaseType_t {
    let timeout = ticks_to_duration(xTicksToWait);
    let deadline = timeout.map(|d| Instant::now() + d);
    let mut inner = q.inner.lock().unwrap();
    while inner.items.is_empty() {
        inner.rx_waiters += 1;
        let (guard, timed_out) = match deadline {
            None => (q.not_empty.wait(inner).unwrap(), false),
            Some(dl) => {
                let now = Instant::now();
                if now >= dl {
                    inner.rx_waiters -= 1;
                    return pdFAIL;
                }
                let (g, r) = q.not_empty.wait_timeout(inner, dl - now).unwrap();
                (g, r.timed_out())
            }
        };
        inner = guard;
        inner.rx_waiters -= 1;
        if timed_out && inner.items.is_empty() {
            return pdFAIL;
        }
    }
    if remove {
        let item = inner.items.pop_front().unwrap();
        q.item_to_ptr(&item, pvBuffer);
        q.not_full.notify_one();
    } else {
        q.item_to_ptr(inner.items.front().unwrap(), pvBuffer);
        // A peek leaves the item in place, so other receivers stay
        // eligible.
        q.not_empty.notify_one();
    }
    pdPASS
}

pub unsafe fn xQueueReceive(
    xQueue: QueueHandle_t,
    pvBuffer: *mut c_void,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    let q = queue_ref(xQueue);
    queue_take(&q, pvBuffer, xTicksToWait, true)
}

pub unsafe fn xQueueReceiveFromISR(
    xQueue: QueueHandle_t,
    pvBuffer: *mut c_void,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    let q = queue_ref(xQueue);
    let mut inner = q.inner.lock().unwrap();
    let Some(item) = inner.items.pop_front() else {
        return pdFAIL;
    };
    q.item_to_ptr(&item, pvBuffer);
    if inner.tx_waiters > 0 && !pxHigherPriorityTaskWoken.is_null() {
        *pxHigherPriorityTaskWoken = pdTRUE;
    }
    q.not_full.notify_one();
    pdPASS
}

pub unsafe fn xQueuePeek(
    xQueue: QueueHandle_t,
    pvBuffer: *mut c_void,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    let q = queue_ref(xQueue);
    queue_take(&q, pvBuffer, xTicksToWait, false)
}

pub unsafe fn xQueuePeekFromISR(xQueue: QueueHandle_t, pvBuffer: *mut c_void) -> BaseType_t {
    let q = queue_ref(xQueue);
    let inner = q.inner.lock().unwrap();
    let Some(item) = inner.items.front() else {
        return pdFAIL;
    };
    q.item_to_ptr(item, pvBuffer);
    pdPASS
}

pub unsafe fn uxQueueMessagesWaiting(xQueue: QueueHandle_t) -> UBaseType_t {
    let q = queue_ref(xQueue);
    let n = q.inner.lock().unwrap().items.len();
    n as UBaseType_t
}

pub unsafe fn uxQueueSpacesAvailable(xQueue: QueueHandle_t) -> UBaseType_t {
    let q = queue_ref(xQueue);
    let n = q.inner.lock().unwrap().items.len();
    (q.capacity - n) as UBaseType_t
}

pub unsafe fn xQueueReset(xQueue: QueueHandle_t) -> BaseType_t {
    let q = queue_ref(xQueue);
    let mut inner = q.inner.lock().unwrap();
    inner.items.clear();
    q.not_full.notify_all();
    pdPASS
}

// =============================================================================
// Semaphores
// =============================================================================

#[cfg(feature = "mutexes")]
pub unsafe fn xSemaphoreCreateMutex() -> SemaphoreHandle_t {
    let q = HostedQueue::new(1, 0);
    q.inner.lock().unwrap().items.push_back(Box::new([]));
    q.into_handle()
}

#[cfg(all(feature = "mutexes", feature = "static-alloc"))]
pub unsafe fn xSemaphoreCreateMutexStatic(
    _pxMutexBuffer: *mut StaticQueue_t,
) -> SemaphoreHandle_t {
    xSemaphoreCreateMutex()
}

#[cfg(feature = "counting-semaphores")]
pub unsafe fn xSemaphoreCreateCounting(
    uxMaxCount: UBaseType_t,
    uxInitialCount: UBaseType_t,
) -> SemaphoreHandle_t {
    if uxMaxCount == 0 || uxInitialCount > uxMaxCount {
        return core::ptr::null_mut();
    }
    let q = HostedQueue::new(uxMaxCount as usize, 0);
    {
        let mut inner = q.inner.lock().unwrap();
        for _ in 0..uxInitialCount {
            inner.items.push_back(Box::new([]));
        }
    }
    q.into_handle()
}

#[cfg(all(feature = "counting-semaphores", feature = "static-alloc"))]
pub unsafe fn xSemaphoreCreateCountingStatic(
    uxMaxCount: UBaseType_t,
    uxInitialCount: UBaseType_t,
    _pxSemaphoreBuffer: *mut StaticQueue_t,
) -> SemaphoreHandle_t {
    xSemaphoreCreateCounting(uxMaxCount, uxInitialCount)
}

pub unsafe fn vSemaphoreDelete(xSemaphore: SemaphoreHandle_t) {
    vQueueDelete(xSemaphore)
}

pub unsafe fn xSemaphoreTake(
    xSemaphore: SemaphoreHandle_t,
    xTicksToWait: TickType_t,
) -> BaseType_t {
    xQueueReceive(xSemaphore, core::ptr::null_mut(), xTicksToWait)
}

pub unsafe fn xSemaphoreTakeFromISR(
    xSemaphore: SemaphoreHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xQueueReceiveFromISR(xSemaphore, core::ptr::null_mut(), pxHigherPriorityTaskWoken)
}

pub unsafe fn xSemaphoreGive(xSemaphore: SemaphoreHandle_t) -> BaseType_t {
    let q = queue_ref(xSemaphore);
    let mut inner = q.inner.lock().unwrap();
    if inner.items.len() == q.capacity {
        return pdFAIL;
    }
    inner.items.push_back(Box::new([]));
    q.not_empty.notify_one();
    pdPASS
}

pub unsafe fn xSemaphoreGiveFromISR(
    xSemaphore: SemaphoreHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    xQueueSendFromISR(xSemaphore, core::ptr::null(), pxHigherPriorityTaskWoken)
}

pub unsafe fn uxSemaphoreGetCount(xSemaphore: SemaphoreHandle_t) -> UBaseType_t {
    uxQueueMessagesWaiting(xSemaphore)
}

// =============================================================================
// Tasks
// =============================================================================

#[derive(Copy, Clone, Eq, PartialEq)]
enum RunState {
    Running,
    Suspended,
    Deleted,
}

struct NotifyState {
    value: u32,
    waiters: usize,
}

struct HostedTask {
    #[allow(dead_code)]
    name: String,
    state: Mutex<RunState>,
    resumed: Condvar,
    notify: Mutex<NotifyState>,
    notified: Condvar,
}

impl HostedTask {
    fn new(name: String) -> Arc<Self> {
        Arc::new(HostedTask {
            name,
            state: Mutex::new(RunState::Running),
            resumed: Condvar::new(),
            notify: Mutex::new(NotifyState { value: 0, waiters: 0 }),
            notified: Condvar::new(),
        })
    }
}

unsafe fn task_ref(xTask: TaskHandle_t) -> Arc<HostedTask> {
    let ptr = xTask as *const HostedTask;
    Arc::increment_strong_count(ptr);
    Arc::from_raw(ptr)
}

/// Scheduling point: a simulated task honours suspension and deletion
/// only when it passes through here (delays and blocking waits).
fn suspension_point() {
    let handle = CURRENT_TASK.with(|c| c.get());
    if handle.is_null() {
        return;
    }
    let task = unsafe { task_ref(handle) };
    let mut state = task.state.lock().unwrap();
    loop {
        match *state {
            RunState::Running => return,
            RunState::Suspended => state = task.resumed.wait(state).unwrap(),
            RunState::Deleted => {
                drop(state);
                drop(task);
                loop {
                    thread::park();
                }
            }
        }
    }
}

pub unsafe fn xTaskCreate(
    pxTaskCode: TaskFunction_t,
    pcName: *const u8,
    usStackDepth: u32,
    pvParameters: *mut c_void,
    _uxPriority: UBaseType_t,
    pxCreatedTask: *mut TaskHandle_t,
) -> BaseType_t {
    let name = name_from_ptr(pcName);
    let task = HostedTask::new(name.clone());
    let thread_task = Arc::clone(&task);
    let handle = Arc::into_raw(task) as TaskHandle_t;
    if !pxCreatedTask.is_null() {
        *pxCreatedTask = handle;
    }
    let arg = SendPtr(pvParameters);
    let spawned = thread::Builder::new()
        .name(if name.is_empty() { "task".into() } else { name })
        // Host threads need far more stack than an embedded task would
        // ask for; the requested depth is only a lower bound.
        .stack_size(((usStackDepth as usize) * core::mem::size_of::<StackType_t>()).max(128 * 1024))
        .spawn(move || {
            // The thread holds its own reference to the control block so
            // it stays valid after vTaskDelete releases the creation
            // reference.
            let task = thread_task;
            // Capture the whole `SendPtr` wrapper; edition-2021 closures
            // would otherwise capture only the raw-pointer field, which
            // is not `Send`.
            let arg = arg;
            let SendPtr(param) = arg;
            CURRENT_TASK.with(|c| c.set(Arc::as_ptr(&task) as TaskHandle_t));
            pxTaskCode(param);
            // A task function that returns would corrupt a real kernel;
            // the simulation just parks the thread.
            loop {
                thread::park();
            }
        });
    match spawned {
        Ok(_) => pdPASS,
        Err(_) => {
            drop(Arc::from_raw(handle as *const HostedTask));
            if !pxCreatedTask.is_null() {
                *pxCreatedTask = core::ptr::null_mut();
            }
            pdFAIL
        }
    }
}

#[cfg(feature = "static-alloc")]
pub unsafe fn xTaskCreateStatic(
    pxTaskCode: TaskFunction_t,
    pcName: *const u8,
    ulStackDepth: u32,
    pvParameters: *mut c_void,
    uxPriority: UBaseType_t,
    _puxStackBuffer: *mut StackType_t,
    _pxTaskBuffer: *mut StaticTask_t,
) -> TaskHandle_t {
    let mut handle: TaskHandle_t = core::ptr::null_mut();
    xTaskCreate(pxTaskCode, pcName, ulStackDepth, pvParameters, uxPriority, &mut handle);
    handle
}

#[cfg(feature = "multicore")]
pub unsafe fn xTaskCreatePinnedToCore(
    pxTaskCode: TaskFunction_t,
    pcName: *const u8,
    usStackDepth: u32,
    pvParameters: *mut c_void,
    uxPriority: UBaseType_t,
    pxCreatedTask: *mut TaskHandle_t,
    _xCoreID: BaseType_t,
) -> BaseType_t {
    xTaskCreate(pxTaskCode, pcName, usStackDepth, pvParameters, uxPriority, pxCreatedTask)
}

#[cfg(all(feature = "multicore", feature = "static-alloc"))]
pub unsafe fn xTaskCreateStaticPinnedToCore(
    pxTaskCode: TaskFunction_t,
    pcName: *const u8,
    ulStackDepth: u32,
    pvParameters: *mut c_void,
    uxPriority: UBaseType_t,
    puxStackBuffer: *mut StackType_t,
    pxTaskBuffer: *mut StaticTask_t,
    _xCoreID: BaseType_t,
) -> TaskHandle_t {
    xTaskCreateStatic(
        pxTaskCode,
        pcName,
        ulStackDepth,
        pvParameters,
        uxPriority,
        puxStackBuffer,
        pxTaskBuffer,
    )
}

#[cfg(feature = "task-delete")]
pub unsafe fn vTaskDelete(xTaskToDelete: TaskHandle_t) {
    if xTaskToDelete.is_null() {
        // Self-delete: mark and never return.
        let handle = CURRENT_TASK.with(|c| c.get());
        if !handle.is_null() {
            let task = task_ref(handle);
            *task.state.lock().unwrap() = RunState::Deleted;
        }
        loop {
            thread::park();
        }
    }
    let task = task_ref(xTaskToDelete);
    {
        let mut state = task.state.lock().unwrap();
        *state = RunState::Deleted;
        task.resumed.notify_all();
    }
    task.notified.notify_all();
    drop(Arc::from_raw(xTaskToDelete as *const HostedTask));
}

#[cfg(feature = "task-suspend")]
pub unsafe fn vTaskSuspend(xTaskToSuspend: TaskHandle_t) {
    let handle = if xTaskToSuspend.is_null() {
        CURRENT_TASK.with(|c| c.get())
    } else {
        xTaskToSuspend
    };
    if handle.is_null() {
        return;
    }
    let task = task_ref(handle);
    let mut state = task.state.lock().unwrap();
    if *state == RunState::Running {
        *state = RunState::Suspended;
    }
    drop(state);
    // Self-suspend parks immediately instead of at the next blocking call.
    if handle == CURRENT_TASK.with(|c| c.get()) {
        suspension_point();
    }
}

#[cfg(feature = "task-suspend")]
pub unsafe fn vTaskResume(xTaskToResume: TaskHandle_t) {
    xTaskResumeFromISR(xTaskToResume);
}

#[cfg(feature = "task-suspend")]
pub unsafe fn xTaskResumeFromISR(xTaskToResume: TaskHandle_t) -> BaseType_t {
    if xTaskToResume.is_null() {
        return pdFALSE;
    }
    let task = task_ref(xTaskToResume);
    let mut state = task.state.lock().unwrap();
    if *state == RunState::Suspended {
        *state = RunState::Running;
        task.resumed.notify_all();
        pdTRUE
    } else {
        pdFALSE
    }
}

pub fn xTaskGetCurrentTaskHandle() -> TaskHandle_t {
    CURRENT_TASK.with(|c| c.get())
}

pub fn xTaskGetSchedulerState() -> BaseType_t {
    if suspend_all_depth().load(Ordering::SeqCst) > 0 {
        taskSCHEDULER_SUSPENDED
    } else {
        taskSCHEDULER_RUNNING
    }
}

pub fn xTaskGetTickCount() -> TickType_t {
    epoch().elapsed().as_millis() as TickType_t
}

pub fn vTaskDelay(xTicksToDelay: TickType_t) {
    suspension_point();
    match ticks_to_duration(xTicksToDelay) {
        Some(d) => thread::sleep(d),
        None => loop {
            thread::park();
        },
    }
    suspension_point();
}

pub unsafe fn xTaskDelayUntil(
    pxPreviousWakeTime: *mut TickType_t,
    xTimeIncrement: TickType_t,
) -> BaseType_t {
    let target = (*pxPreviousWakeTime).wrapping_add(xTimeIncrement);
    *pxPreviousWakeTime = target;
    let now = xTaskGetTickCount();
    let remaining = target.wrapping_sub(now);
    // Past deadlines show up as huge unsigned remainders; treat anything
    // beyond half the tick range as already elapsed.
    if remaining == 0 || remaining > TickType_t::MAX / 2 {
        return pdFALSE;
    }
    vTaskDelay(remaining);
    pdTRUE
}

fn suspend_all_depth() -> &'static AtomicU32 {
    static DEPTH: AtomicU32 = AtomicU32::new(0);
    &DEPTH
}

/// Bookkeeping only: the simulation cannot freeze other host threads, but
/// the scheduler-state query reflects the nesting depth.
pub fn vTaskSuspendAll() {
    suspend_all_depth().fetch_add(1, Ordering::SeqCst);
}

pub fn xTaskResumeAll() -> BaseType_t {
    suspend_all_depth().fetch_sub(1, Ordering::SeqCst);
    pdFALSE
}

// =============================================================================
// Task notifications
// =============================================================================

#[cfg(feature = "task-notifications")]
pub unsafe fn xTaskNotifyGive(xTaskToNotify: TaskHandle_t) -> BaseType_t {
    let task = task_ref(xTaskToNotify);
    let mut notify = task.notify.lock().unwrap();
    notify.value = notify.value.wrapping_add(1);
    task.notified.notify_all();
    pdPASS
}

#[cfg(feature = "task-notifications")]
pub unsafe fn vTaskNotifyGiveFromISR(
    xTaskToNotify: TaskHandle_t,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) {
    let task = task_ref(xTaskToNotify);
    let mut notify = task.notify.lock().unwrap();
    notify.value = notify.value.wrapping_add(1);
    if notify.waiters > 0 && !pxHigherPriorityTaskWoken.is_null() {
        *pxHigherPriorityTaskWoken = pdTRUE;
    }
    task.notified.notify_all();
}

#[cfg(feature = "task-notifications")]
pub fn ulTaskNotifyTake(xClearCountOnExit: BaseType_t, xTicksToWait: TickType_t) -> u32 {
    suspension_point();
    let handle = CURRENT_TASK.with(|c| c.get());
    if handle.is_null() {
        return 0;
    }
    let task = unsafe { task_ref(handle) };
    let deadline = ticks_to_duration(xTicksToWait).map(|d| Instant::now() + d);
    let mut notify = task.notify.lock().unwrap();
    while notify.value == 0 {
        notify.waiters += 1;
        let (guard, timed_out) = match deadline {
            None => (task.notified.wait(notify).unwrap(), false),
            Some(dl) => {
                let now = Instant::now();
                if now >= dl {
                    notify.waiters -= 1;
                    return 0;
                }
                let (g, r) = task.notified.wait_timeout(notify, dl - now).unwrap();
                (g, r.timed_out())
            }
        };
        notify = guard;
        notify.waiters -= 1;
        if timed_out && notify.value == 0 {
            return 0;
        }
    }
    let taken = notify.value;
    notify.value = if xClearCountOnExit != pdFALSE { 0 } else { notify.value - 1 };
    taken
}

// =============================================================================
// Software timers
// =============================================================================

#[cfg(feature = "timers")]
struct TimerSched {
    period: Duration,
    deadline: Option<Instant>,
}

#[cfg(feature = "timers")]
struct HostedTimer {
    #[allow(dead_code)]
    name: String,
    callback: TimerCallbackFunction_t,
    auto_reload: bool,
    id: Mutex<SendPtr>,
    sched: Mutex<TimerSched>,
}

#[cfg(feature = "timers")]
unsafe impl Sync for HostedTimer {}

#[cfg(feature = "pend-function-call")]
struct PendedCall {
    func: PendedFunction_t,
    param1: SendPtr,
    param2: u32,
}

#[cfg(feature = "timers")]
struct ServiceState {
    timers: Vec<Arc<HostedTimer>>,
    #[cfg(feature = "pend-function-call")]
    pended: VecDeque<PendedCall>,
}

#[cfg(feature = "timers")]
struct TimerService {
    state: Mutex<ServiceState>,
    wakeup: Condvar,
}

#[cfg(feature = "timers")]
fn timer_service() -> &'static TimerService {
    static SERVICE: OnceLock<&'static TimerService> = OnceLock::new();
    SERVICE.get_or_init(|| {
        let svc: &'static TimerService = Box::leak(Box::new(TimerService {
            state: Mutex::new(ServiceState {
                timers: Vec::new(),
                #[cfg(feature = "pend-function-call")]
                pended: VecDeque::new(),
            }),
            wakeup: Condvar::new(),
        }));
        thread::Builder::new()
            .name("tmr-svc".into())
            .spawn(move || timer_daemon(svc))
            .ok();
        svc
    })
}

/// The simulated equivalent of the kernel's timer service task: executes
/// pended function calls, then fires whichever timers have expired, then
/// sleeps until the earliest remaining deadline.
#[cfg(feature = "timers")]
fn timer_daemon(svc: &'static TimerService) {
    let mut state = svc.state.lock().unwrap();
    loop {
        #[cfg(feature = "pend-function-call")]
        while let Some(call) = state.pended.pop_front() {
            drop(state);
            (call.func)(call.param1.0, call.param2);
            state = svc.state.lock().unwrap();
        }

        let now = Instant::now();
        let mut expired: Vec<(TimerCallbackFunction_t, TimerHandle_t)> = Vec::new();
        let mut next: Option<Instant> = None;
        for timer in &state.timers {
            let mut sched = timer.sched.lock().unwrap();
            if let Some(deadline) = sched.deadline {
                if deadline <= now {
                    expired.push((
                        timer.callback,
                        Arc::as_ptr(timer) as TimerHandle_t,
                    ));
                    sched.deadline = if timer.auto_reload {
                        Some(deadline + sched.period)
                    } else {
                        None
                    };
                }
                if let Some(d) = sched.deadline {
                    next = Some(next.map_or(d, |n| n.min(d)));
                }
            }
        }

        if !expired.is_empty() {
            drop(state);
            for (callback, handle) in expired {
                callback(handle);
            }
            state = svc.state.lock().unwrap();
            continue;
        }

        state = match next {
            Some(deadline) => {
                let now = Instant::now();
                if deadline <= now {
                    continue;
                }
                svc.wakeup.wait_timeout(state, deadline - now).unwrap().0
            }
            None => svc.wakeup.wait(state).unwrap(),
        };
    }
}

#[cfg(feature = "timers")]
unsafe fn timer_ref(xTimer: TimerHandle_t) -> Arc<HostedTimer> {
    let ptr = xTimer as *const HostedTimer;
    Arc::increment_strong_count(ptr);
    Arc::from_raw(ptr)
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerCreate(
    pcTimerName: *const u8,
    xTimerPeriodInTicks: TickType_t,
    xAutoReload: BaseType_t,
    pvTimerID: *mut c_void,
    pxCallbackFunction: TimerCallbackFunction_t,
) -> TimerHandle_t {
    if xTimerPeriodInTicks == 0 {
        return core::ptr::null_mut();
    }
    let timer = Arc::new(HostedTimer {
        name: name_from_ptr(pcTimerName),
        callback: pxCallbackFunction,
        auto_reload: xAutoReload != pdFALSE,
        id: Mutex::new(SendPtr(pvTimerID)),
        sched: Mutex::new(TimerSched {
            period: Duration::from_millis(xTimerPeriodInTicks as u64),
            deadline: None,
        }),
    });
    let svc = timer_service();
    svc.state.lock().unwrap().timers.push(Arc::clone(&timer));
    svc.wakeup.notify_all();
    Arc::into_raw(timer) as TimerHandle_t
}

#[cfg(all(feature = "timers", feature = "static-alloc"))]
pub unsafe fn xTimerCreateStatic(
    pcTimerName: *const u8,
    xTimerPeriodInTicks: TickType_t,
    xAutoReload: BaseType_t,
    pvTimerID: *mut c_void,
    pxCallbackFunction: TimerCallbackFunction_t,
    _pxTimerBuffer: *mut StaticTimer_t,
) -> TimerHandle_t {
    xTimerCreate(pcTimerName, xTimerPeriodInTicks, xAutoReload, pvTimerID, pxCallbackFunction)
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerDelete(xTimer: TimerHandle_t, _xTicksToWait: TickType_t) -> BaseType_t {
    let svc = timer_service();
    {
        let mut state = svc.state.lock().unwrap();
        state.timers.retain(|t| Arc::as_ptr(t) as TimerHandle_t != xTimer);
        svc.wakeup.notify_all();
    }
    drop(Arc::from_raw(xTimer as *const HostedTimer));
    pdPASS
}

#[cfg(feature = "timers")]
unsafe fn timer_command(xTimer: TimerHandle_t, arm: bool, new_period: Option<TickType_t>) {
    let timer = timer_ref(xTimer);
    {
        let mut sched = timer.sched.lock().unwrap();
        if let Some(ticks) = new_period {
            sched.period = Duration::from_millis(ticks.max(1) as u64);
        }
        sched.deadline = if arm { Some(Instant::now() + sched.period) } else { None };
    }
    let svc = timer_service();
    svc.wakeup.notify_all();
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStart(xTimer: TimerHandle_t, _xTicksToWait: TickType_t) -> BaseType_t {
    timer_command(xTimer, true, None);
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStartFromISR(
    xTimer: TimerHandle_t,
    // Timer commands never unblock a task here; the flag is only ever
    // raised, so it is left untouched.
    _pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    timer_command(xTimer, true, None);
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStop(xTimer: TimerHandle_t, _xTicksToWait: TickType_t) -> BaseType_t {
    timer_command(xTimer, false, None);
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerStopFromISR(
    xTimer: TimerHandle_t,
    _pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    timer_command(xTimer, false, None);
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerChangePeriod(
    xTimer: TimerHandle_t,
    xNewPeriod: TickType_t,
    _xTicksToWait: TickType_t,
) -> BaseType_t {
    // Matches the kernel: changing the period also starts the timer.
    timer_command(xTimer, true, Some(xNewPeriod));
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerChangePeriodFromISR(
    xTimer: TimerHandle_t,
    xNewPeriod: TickType_t,
    _pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    timer_command(xTimer, true, Some(xNewPeriod));
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerReset(xTimer: TimerHandle_t, _xTicksToWait: TickType_t) -> BaseType_t {
    timer_command(xTimer, true, None);
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerResetFromISR(
    xTimer: TimerHandle_t,
    _pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    timer_command(xTimer, true, None);
    pdPASS
}

#[cfg(feature = "timers")]
pub unsafe fn xTimerIsTimerActive(xTimer: TimerHandle_t) -> BaseType_t {
    let timer = timer_ref(xTimer);
    let active = timer.sched.lock().unwrap().deadline.is_some();
    if active {
        pdTRUE
    } else {
        pdFALSE
    }
}

#[cfg(feature = "timers")]
pub unsafe fn pvTimerGetTimerID(xTimer: TimerHandle_t) -> *mut c_void {
    let timer = timer_ref(xTimer);
    let id = timer.id.lock().unwrap();
    id.0
}

#[cfg(feature = "timers")]
pub unsafe fn vTimerSetTimerID(xTimer: TimerHandle_t, pvNewID: *mut c_void) {
    let timer = timer_ref(xTimer);
    *timer.id.lock().unwrap() = SendPtr(pvNewID);
}

#[cfg(feature = "pend-function-call")]
pub unsafe fn xTimerPendFunctionCall(
    xFunctionToPend: PendedFunction_t,
    pvParameter1: *mut c_void,
    ulParameter2: u32,
    _xTicksToWait: TickType_t,
) -> BaseType_t {
    let svc = timer_service();
    svc.state.lock().unwrap().pended.push_back(PendedCall {
        func: xFunctionToPend,
        param1: SendPtr(pvParameter1),
        param2: ulParameter2,
    });
    svc.wakeup.notify_all();
    pdPASS
}

#[cfg(feature = "pend-function-call")]
pub unsafe fn xTimerPendFunctionCallFromISR(
    xFunctionToPend: PendedFunction_t,
    pvParameter1: *mut c_void,
    ulParameter2: u32,
    pxHigherPriorityTaskWoken: *mut BaseType_t,
) -> BaseType_t {
    if !pxHigherPriorityTaskWoken.is_null() {
        *pxHigherPriorityTaskWoken = pdTRUE;
    }
    xTimerPendFunctionCall(xFunctionToPend, pvParameter1, ulParameter2, 0)
}
