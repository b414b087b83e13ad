#![cfg(feature = "kernel-hosted")]

use std::mem::ManuallyDrop;
use std::thread;
use std::time::{Duration, Instant};

use freertos_helper::kernel::{sim_enter_isr, sim_exit_isr, sim_take_yield_requests};
use freertos_helper::sync::Counter;
use freertos_helper::types::MAX_DELAY_MS;

#[test]
fn give_is_bounded_at_max() {
    let mut c: Counter<3> = Counter::new();
    c.init().unwrap();

    assert_eq!(c.count(), 0);
    for _ in 0..3 {
        assert!(c.give());
    }
    assert_eq!(c.count(), 3);
    assert!(!c.give(), "give beyond the bound must fail, not wrap");

    assert!(c.take(0));
    assert!(c.give(), "one slot freed, one give fits");
    assert!(!c.give());
}

#[test]
fn take_on_empty_counter_fails_or_times_out() {
    let mut c: Counter<4> = Counter::new();
    c.init().unwrap();

    assert!(!c.take(0));

    let started = Instant::now();
    assert!(!c.take(50));
    assert!(started.elapsed() >= Duration::from_millis(45));
}

#[test]
fn reset_on_fresh_counter_is_successful_noop() {
    let mut c: Counter<4> = Counter::new();
    c.init().unwrap();

    assert!(c.reset());
    assert_eq!(c.count(), 0);
}

#[test]
fn reset_drains_pending_counts() {
    let mut c: Counter<8> = Counter::new();
    c.init().unwrap();

    for _ in 0..5 {
        c.give();
    }
    assert!(c.reset());
    assert_eq!(c.count(), 0);
    assert!(!c.take(0));
}

#[test]
fn isr_reset_drains_via_retry_loop() {
    let mut c: Counter<8> = Counter::new();
    c.init().unwrap();
    for _ in 0..4 {
        c.give();
    }

    sim_enter_isr();
    assert!(c.reset());
    sim_exit_isr();
    assert_eq!(c.count(), 0);
}

#[test]
fn isr_give_wakes_blocked_taker_with_reschedule() {
    let mut c: Counter<4> = Counter::new();
    c.init().unwrap();

    thread::scope(|s| {
        let c = &c;
        let taker = s.spawn(move || c.take(MAX_DELAY_MS));
        thread::sleep(Duration::from_millis(30));

        sim_take_yield_requests();
        sim_enter_isr();
        assert!(c.give());
        sim_exit_isr();
        assert_eq!(sim_take_yield_requests(), 1);

        assert!(taker.join().unwrap());
    });
}

#[test]
#[should_panic(expected = "give() before init()")]
fn give_before_init_asserts() {
    let c: ManuallyDrop<Counter<4>> = ManuallyDrop::new(Counter::new());
    c.give();
}
