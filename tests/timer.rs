#![cfg(feature = "kernel-hosted")]

use core::ffi::c_void;
use std::mem::ManuallyDrop;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use freertos_helper::dispatch;
use freertos_helper::kernel;
use freertos_helper::kernel::{sim_enter_isr, sim_exit_isr, sim_take_yield_requests};
use freertos_helper::sync::{pend_call, Queue, Timer};
use freertos_helper::types::{pdPASS, BaseType_t, TimerHandle_t};

static ONE_SHOT_FIRED: AtomicU32 = AtomicU32::new(0);

extern "C" fn one_shot_cb(_timer: TimerHandle_t) {
    ONE_SHOT_FIRED.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn one_shot_fires_once_and_deactivates() {
    let mut t = Timer::new(one_shot_cb, b"OneShot\0");
    t.init().unwrap();

    assert!(!t.is_active(), "freshly created timer is dormant");
    assert!(t.start(50));
    assert!(t.is_active(), "armed timer reports active immediately");

    thread::sleep(Duration::from_millis(150));
    assert_eq!(ONE_SHOT_FIRED.load(Ordering::SeqCst), 1);
    assert!(!t.is_active(), "one-shot deactivates after expiry");

    thread::sleep(Duration::from_millis(100));
    assert_eq!(ONE_SHOT_FIRED.load(Ordering::SeqCst), 1, "one-shot must not refire");
}

static STOPPED_FIRED: AtomicU32 = AtomicU32::new(0);

extern "C" fn stopped_cb(_timer: TimerHandle_t) {
    STOPPED_FIRED.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn stop_disarms_before_expiry() {
    let mut t = Timer::new(stopped_cb, b"Stopped\0");
    t.init().unwrap();

    assert!(t.start(200));
    assert!(t.is_active());
    assert!(t.stop());
    assert!(!t.is_active());

    thread::sleep(Duration::from_millis(300));
    assert_eq!(STOPPED_FIRED.load(Ordering::SeqCst), 0);
}

static PERIODIC_FIRED: AtomicU32 = AtomicU32::new(0);

extern "C" fn periodic_cb(_timer: TimerHandle_t) {
    PERIODIC_FIRED.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn auto_reload_refires_until_stopped() {
    let mut t = Timer::new(periodic_cb, b"Periodic\0");
    assert!(t.set_auto_reload(true));
    t.init().unwrap();

    assert!(t.start(30));
    thread::sleep(Duration::from_millis(160));
    assert!(t.stop());
    let fired = PERIODIC_FIRED.load(Ordering::SeqCst);
    assert!(fired >= 2, "auto-reload should have fired repeatedly, got {fired}");

    thread::sleep(Duration::from_millis(100));
    assert_eq!(PERIODIC_FIRED.load(Ordering::SeqCst), fired, "stopped timer must not fire");
}

static RESTART_FIRED: AtomicU32 = AtomicU32::new(0);

extern "C" fn restart_cb(_timer: TimerHandle_t) {
    RESTART_FIRED.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn restart_pushes_expiry_out() {
    let mut t = Timer::new(restart_cb, b"Restart\0");
    t.init().unwrap();

    assert!(t.start(100));
    thread::sleep(Duration::from_millis(60));
    assert!(t.restart(100));
    thread::sleep(Duration::from_millis(60));
    // 120ms after the original start, but only 60ms after the restart.
    assert_eq!(RESTART_FIRED.load(Ordering::SeqCst), 0);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(RESTART_FIRED.load(Ordering::SeqCst), 1);
}

static PENDED_ARG: AtomicU32 = AtomicU32::new(0);

extern "C" fn pended(_arg1: *mut c_void, arg2: u32) {
    PENDED_ARG.store(arg2, Ordering::SeqCst);
}

#[test]
fn pend_call_runs_on_the_timer_service() {
    assert!(pend_call(pended, core::ptr::null_mut(), 7, 50));
    thread::sleep(Duration::from_millis(80));
    assert_eq!(PENDED_ARG.load(Ordering::SeqCst), 7);
}

extern "C" fn quiet_cb(_timer: TimerHandle_t) {}

#[test]
fn isr_timer_commands_preserve_a_prior_wake() {
    let mut q: Queue<u32, 1> = Queue::new();
    q.init().unwrap();
    let mut t = Timer::new(quiet_cb, b"Quiet\0");
    t.init().unwrap();

    thread::scope(|s| {
        let q = &q;
        let receiver = s.spawn(move || q.receive(2_000));

        // Let the receiver park on the empty queue.
        thread::sleep(Duration::from_millis(50));

        let value: u32 = 7;
        let item = &value as *const u32 as *const c_void;
        sim_enter_isr();
        let sent = dispatch(
            || unreachable!("interrupt context is active"),
            |woken| unsafe {
                let flag: *mut BaseType_t = woken;
                let res = kernel::xQueueSendFromISR(q.handle(), item, flag);
                kernel::xTimerStartFromISR(t.handle(), flag);
                res
            },
        );
        let yields = sim_take_yield_requests();
        sim_exit_isr();

        assert_eq!(sent, pdPASS);
        assert_eq!(yields, 1, "the wake raised by the send must survive the timer command");
        assert_eq!(receiver.join().unwrap(), Some(7));
    });
}

#[test]
#[should_panic(expected = "start() before init()")]
fn start_before_init_asserts() {
    let t: ManuallyDrop<Timer> = ManuallyDrop::new(Timer::new(one_shot_cb, b"T\0"));
    t.start(10);
}
