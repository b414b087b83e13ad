#![cfg(feature = "kernel-hosted")]

use std::mem::ManuallyDrop;
use std::thread;
use std::time::{Duration, Instant};

use freertos_helper::kernel::{sim_enter_isr, sim_exit_isr, sim_take_yield_requests};
use freertos_helper::sync::Queue;
use freertos_helper::types::MAX_DELAY_MS;

#[test]
fn fills_to_capacity_and_no_further() {
    let mut q: Queue<u32, 3> = Queue::new();
    q.init().unwrap();

    assert!(q.is_empty());
    assert_eq!(q.free_space(), 3);

    for i in 0..3u32 {
        assert!(q.send(&i, 0), "send {i} should fit");
    }
    assert!(!q.is_empty());
    assert_eq!(q.free_space(), 0);
    assert!(!q.send(&99, 0), "queue is full");

    assert_eq!(q.receive(0), Some(0));
    assert!(q.send(&99, 0), "one slot freed, one send fits");
    assert!(!q.send(&100, 0));
}

#[test]
fn fifo_order() {
    let mut q: Queue<u8, 4> = Queue::new();
    q.init().unwrap();

    for b in [10u8, 20, 30] {
        assert!(q.send(&b, 0));
    }
    assert_eq!(q.receive(0), Some(10));
    assert_eq!(q.receive(0), Some(20));
    assert_eq!(q.receive(0), Some(30));
    assert_eq!(q.receive(0), None);
}

#[test]
fn peek_leaves_item_in_place() {
    let mut q: Queue<u32, 2> = Queue::new();
    q.init().unwrap();

    assert!(q.send(&7, 0));
    assert_eq!(q.peek(0), Some(7));
    assert!(!q.is_empty(), "peek must not consume");
    assert_eq!(q.receive(0), Some(7));
    assert_eq!(q.peek(0), None);
}

#[test]
fn flush_on_fresh_queue_is_successful_noop() {
    let mut q: Queue<u32, 4> = Queue::new();
    q.init().unwrap();

    assert!(q.flush());
    assert!(q.is_empty());
}

#[test]
fn flush_discards_pending_items() {
    let mut q: Queue<u32, 4> = Queue::new();
    q.init().unwrap();

    q.send(&1, 0);
    q.send(&2, 0);
    assert!(q.flush());
    assert!(q.is_empty());
    assert_eq!(q.receive(0), None);
}

#[test]
fn receive_times_out() {
    let mut q: Queue<u32, 2> = Queue::new();
    q.init().unwrap();

    let started = Instant::now();
    assert_eq!(q.receive(50), None);
    assert!(started.elapsed() >= Duration::from_millis(45));
}

#[test]
fn blocked_receiver_unblocks_on_send() {
    let mut q: Queue<u32, 2> = Queue::new();
    q.init().unwrap();

    thread::scope(|s| {
        let q = &q;
        let rx = s.spawn(move || q.receive(MAX_DELAY_MS));
        thread::sleep(Duration::from_millis(30));
        assert!(q.send(&55, 0));
        assert_eq!(rx.join().unwrap(), Some(55));
    });
}

#[test]
fn isr_send_wakes_blocked_receiver_with_reschedule() {
    let mut q: Queue<u32, 2> = Queue::new();
    q.init().unwrap();

    thread::scope(|s| {
        let q = &q;
        let rx = s.spawn(move || q.receive(MAX_DELAY_MS));
        thread::sleep(Duration::from_millis(30));

        sim_take_yield_requests();
        sim_enter_isr();
        assert!(q.send(&9, 0));
        sim_exit_isr();
        assert_eq!(sim_take_yield_requests(), 1);

        assert_eq!(rx.join().unwrap(), Some(9));
    });
}

#[test]
fn isr_send_on_full_queue_fails_without_blocking() {
    let mut q: Queue<u32, 1> = Queue::new();
    q.init().unwrap();
    assert!(q.send(&1, 0));

    sim_enter_isr();
    let started = Instant::now();
    // A timeout is meaningless in interrupt context; this must fail now.
    assert!(!q.send(&2, 500));
    sim_exit_isr();
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[test]
#[should_panic(expected = "send() before init()")]
fn send_before_init_asserts() {
    let q: ManuallyDrop<Queue<u32, 4>> = ManuallyDrop::new(Queue::new());
    q.send(&1, 0);
}

#[test]
#[should_panic(expected = "init() called twice")]
fn double_init_asserts() {
    let mut q: Queue<u32, 4> = Queue::new();
    q.init().unwrap();
    let _ = q.init();
}
