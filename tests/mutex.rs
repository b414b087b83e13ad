#![cfg(feature = "kernel-hosted")]

use std::mem::ManuallyDrop;
use std::thread;
use std::time::{Duration, Instant};

use freertos_helper::kernel::{sim_enter_isr, sim_exit_isr};
use freertos_helper::sync::Mutex;

#[test]
fn lock_unlock_cycle() {
    let mut m = Mutex::new();
    m.init().unwrap();

    assert!(m.lock(0));
    assert!(m.unlock());
    assert!(m.lock(0), "released lock is acquirable again");
    assert!(m.unlock());
}

#[test]
fn contended_lock_times_out() {
    let mut m = Mutex::new();
    m.init().unwrap();

    thread::scope(|s| {
        let m = &m;
        assert!(m.lock(0));
        let contender = s.spawn(move || {
            let started = Instant::now();
            let got = m.lock(50);
            (got, started.elapsed())
        });
        let (got, waited) = contender.join().unwrap();
        assert!(!got);
        assert!(waited >= Duration::from_millis(45));
        assert!(m.unlock());
    });
}

#[test]
fn contended_lock_succeeds_after_release() {
    let mut m = Mutex::new();
    m.init().unwrap();

    thread::scope(|s| {
        let m = &m;
        assert!(m.lock(0));
        let contender = s.spawn(move || m.lock(1_000));
        thread::sleep(Duration::from_millis(30));
        assert!(m.unlock());
        assert!(contender.join().unwrap());
        assert!(m.unlock());
    });
}

#[test]
fn lock_from_isr_is_rejected() {
    let mut m = Mutex::new();
    m.init().unwrap();

    sim_enter_isr();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| m.lock(0)));
    sim_exit_isr();
    // Debug builds assert; a release build would return false.
    match result {
        Ok(got) => assert!(!got),
        Err(_) => {}
    }
}

#[test]
#[should_panic(expected = "lock() before init()")]
fn lock_before_init_asserts() {
    let m: ManuallyDrop<Mutex> = ManuallyDrop::new(Mutex::new());
    m.lock(0);
}
