use std::sync::Arc;
use std::thread;
use std::time::Duration;
use threadstep::TimedSemaphore;

/// A release issued while another thread is inside a bounded acquire must
/// satisfy that acquire before its bound elapses.
#[test]
fn release_satisfies_pending_bounded_acquire() {
    let sem = Arc::new(TimedSemaphore::named(0, "pending"));
    let releaser = Arc::clone(&sem);

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        releaser.release();
    });

    sem.acquire_timeout(Duration::from_secs(5))
        .expect("release arrives well inside the bound");
    assert_eq!(sem.permits(), 0);
    handle.join().expect("releaser thread");
}

/// The unbounded form blocks until a permit shows up.
#[test]
fn unbounded_acquire_wakes_on_release() {
    let sem = Arc::new(TimedSemaphore::new(0));
    let waiter = Arc::clone(&sem);

    let handle = thread::spawn(move || {
        waiter.acquire();
    });

    thread::sleep(Duration::from_millis(50));
    sem.release();
    handle.join().expect("waiter must wake and finish");
    assert_eq!(sem.permits(), 0);
}

/// Permits accumulate past one; each acquire consumes exactly one unit.
#[test]
fn accumulated_permits_feed_exactly_that_many_acquires() {
    let sem = TimedSemaphore::new(0);
    for _ in 0..3 {
        sem.release();
    }
    assert_eq!(sem.permits(), 3);

    for remaining in (0..3).rev() {
        sem.acquire_timeout(Duration::from_millis(100))
            .expect("accumulated permit available");
        assert_eq!(sem.permits(), remaining);
    }

    sem.acquire_timeout(Duration::from_millis(20))
        .expect_err("fourth acquire has no permit to consume");
}

/// Exactly one of several waiters consumes a single release.
#[test]
fn single_release_wakes_a_single_waiter() {
    let sem = Arc::new(TimedSemaphore::new(0));

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let s = Arc::clone(&sem);
            thread::spawn(move || s.acquire_timeout(Duration::from_millis(300)).is_ok())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    sem.release();

    let succeeded = waiters
        .into_iter()
        .map(|h| h.join().expect("waiter thread"))
        .filter(|ok| *ok)
        .count();
    assert_eq!(succeeded, 1, "one permit, one successful acquire");
    assert_eq!(sem.permits(), 0);
}
