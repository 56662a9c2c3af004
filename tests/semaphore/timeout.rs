use serial_test::serial;
use std::time::{Duration, Instant};
use threadstep::{SemaphoreError, TimedSemaphore};

/// With zero permits and no concurrent release, a bounded acquire fails
/// after at least the bound and not wildly beyond it.
///
/// Serialized: scheduler noise from parallel tests would loosen the upper
/// bound past usefulness.
#[test]
#[serial]
fn times_out_after_at_least_the_bound() {
    let sem = TimedSemaphore::named(0, "starved");
    let bound = Duration::from_millis(200);

    let start = Instant::now();
    let err = sem.acquire_timeout(bound).expect_err("nothing to acquire");
    let elapsed = start.elapsed();

    assert!(
        elapsed >= bound,
        "returned after {elapsed:?}, before the {bound:?} bound"
    );
    assert!(
        elapsed < bound + Duration::from_secs(1),
        "took {elapsed:?}, far past the {bound:?} bound"
    );
    let SemaphoreError::AcquireTimeout { semaphore, timeout } = err;
    assert_eq!(semaphore, "starved");
    assert_eq!(timeout, bound);
}

/// A timed-out acquire leaves the count untouched, and a later release makes
/// the next acquire succeed.
#[test]
#[serial]
fn timeout_does_not_consume_or_corrupt_permits() {
    let sem = TimedSemaphore::new(0);

    sem.acquire_timeout(Duration::from_millis(30))
        .expect_err("no permits yet");
    assert_eq!(sem.permits(), 0);

    sem.release();
    sem.acquire_timeout(Duration::from_millis(30))
        .expect("permit released after the failed attempt");
    assert_eq!(sem.permits(), 0);
}

/// A zero bound degenerates to a try-acquire.
#[test]
fn zero_timeout_is_a_try_acquire() {
    let sem = TimedSemaphore::new(1);
    sem.acquire_timeout(Duration::ZERO)
        .expect("permit available, no wait needed");
    sem.acquire_timeout(Duration::ZERO)
        .expect_err("empty, must not block");
}
