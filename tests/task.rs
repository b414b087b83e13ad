#![cfg(feature = "kernel-hosted")]

use core::ffi::c_void;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use freertos_helper::sync::{delay, tick_count, Task};

fn leak_task<const S: usize>(task: Task<S>) -> &'static mut Task<S> {
    Box::leak(Box::new(task))
}

#[test]
fn delay_blocks_for_roughly_the_requested_time() {
    let started = Instant::now();
    delay(50);
    assert!(started.elapsed() >= Duration::from_millis(45));
}

#[test]
fn tick_count_is_monotonic() {
    let before = tick_count();
    delay(20);
    assert!(tick_count() > before);
}

static SIGNAL_SEEN: AtomicBool = AtomicBool::new(false);
static WAITER_DONE: AtomicBool = AtomicBool::new(false);

extern "C" fn signal_waiter(arg: *mut c_void) {
    let task = unsafe { &*(arg as *const Task<512>) };
    delay(20);
    if task.wait_signal(5_000) {
        SIGNAL_SEEN.store(true, Ordering::SeqCst);
    }
    WAITER_DONE.store(true, Ordering::SeqCst);
    loop {
        delay(1_000);
    }
}

#[test]
fn wait_signal_blocks_until_emit_signal() {
    let task = leak_task(Task::<512>::new(signal_waiter, b"Waiter\0"));
    let self_ptr = task as *mut Task<512> as *mut c_void;
    assert!(task.set_arg(self_ptr));
    task.init().unwrap();

    thread::sleep(Duration::from_millis(80));
    assert!(!WAITER_DONE.load(Ordering::SeqCst), "no signal yet, waiter must be blocked");

    assert!(task.emit_signal());
    thread::sleep(Duration::from_millis(100));
    assert!(WAITER_DONE.load(Ordering::SeqCst));
    assert!(SIGNAL_SEEN.load(Ordering::SeqCst));
}

static TIMEOUT_RESULT: AtomicU32 = AtomicU32::new(0);

extern "C" fn timeout_waiter(arg: *mut c_void) {
    let task = unsafe { &*(arg as *const Task<512>) };
    delay(20);
    let got = task.wait_signal(50);
    TIMEOUT_RESULT.store(if got { 1 } else { 2 }, Ordering::SeqCst);
    loop {
        delay(1_000);
    }
}

#[test]
fn wait_signal_honours_its_timeout() {
    let task = leak_task(Task::<512>::new(timeout_waiter, b"TimeoutWaiter\0"));
    let self_ptr = task as *mut Task<512> as *mut c_void;
    assert!(task.set_arg(self_ptr));
    task.init().unwrap();

    thread::sleep(Duration::from_millis(200));
    assert_eq!(TIMEOUT_RESULT.load(Ordering::SeqCst), 2, "wait must report the timeout");
}

static TICKER: AtomicU32 = AtomicU32::new(0);

extern "C" fn ticker(_arg: *mut c_void) {
    loop {
        TICKER.fetch_add(1, Ordering::SeqCst);
        delay(10);
    }
}

#[test]
fn stop_and_start_gate_execution() {
    let task = leak_task(Task::<512>::new(ticker, b"Ticker\0"));
    task.init().unwrap();

    thread::sleep(Duration::from_millis(100));
    assert!(TICKER.load(Ordering::SeqCst) > 0, "task should be running after init");

    assert!(task.stop());
    // Let the task reach its next blocking point and park.
    thread::sleep(Duration::from_millis(50));
    let frozen = TICKER.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(120));
    assert_eq!(TICKER.load(Ordering::SeqCst), frozen, "suspended task must not run");

    assert!(task.start());
    thread::sleep(Duration::from_millis(100));
    assert!(TICKER.load(Ordering::SeqCst) > frozen, "resumed task must run again");
}

static CYCLES: AtomicU32 = AtomicU32::new(0);

extern "C" fn periodic(arg: *mut c_void) {
    let task = unsafe { &*(arg as *const Task<512>) };
    delay(20);
    task.periodic_wait_init();
    loop {
        task.periodic_wait(25);
        CYCLES.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn periodic_wait_paces_the_loop() {
    let task = leak_task(Task::<512>::new(periodic, b"Periodic\0"));
    let self_ptr = task as *mut Task<512> as *mut c_void;
    assert!(task.set_arg(self_ptr));
    task.init().unwrap();

    thread::sleep(Duration::from_millis(250));
    let cycles = CYCLES.load(Ordering::SeqCst);
    assert!(cycles >= 4, "expected several 25ms cycles, got {cycles}");
    assert!(cycles <= 12, "cycles must be paced, got {cycles}");
}

static DOOMED: AtomicU32 = AtomicU32::new(0);

extern "C" fn doomed(_arg: *mut c_void) {
    loop {
        DOOMED.fetch_add(1, Ordering::SeqCst);
        delay(10);
    }
}

#[test]
fn dropping_the_handle_deletes_the_task() {
    let mut task = Task::<512>::new(doomed, b"Doomed\0");
    task.init().unwrap();

    thread::sleep(Duration::from_millis(60));
    assert!(DOOMED.load(Ordering::SeqCst) > 0, "task should run while the handle lives");

    drop(task);
    // The victim wakes from its delay after the delete and must still be
    // able to observe it.
    thread::sleep(Duration::from_millis(60));
    let frozen = DOOMED.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(150));
    assert_eq!(DOOMED.load(Ordering::SeqCst), frozen, "deleted task must stop running");
}

extern "C" fn idle(_arg: *mut c_void) {
    loop {
        delay(1_000);
    }
}

#[test]
fn pre_init_setters_apply_before_init() {
    let mut task = Task::<512>::new(idle, b"Idle\0");
    assert!(task.set_priority(3));
    assert!(task.set_name(b"StillIdle\0"));
    task.init().unwrap();
    assert_eq!(task.name_str(), "StillIdle");

    std::mem::forget(task); // keep the kernel task alive past the test
}

#[test]
#[should_panic(expected = "emit_signal() before init()")]
fn emit_signal_before_init_asserts() {
    let task = std::mem::ManuallyDrop::new(Task::<512>::new(idle, b"Idle\0"));
    task.emit_signal();
}
