use std::sync::Arc;
use std::thread;
use std::time::Duration;
use threadstep::TimedSemaphore;

/// Bookkeeping identity: final permits = initial + releases - successful
/// acquires, across an interleaved single-threaded sequence.
#[test]
fn sequential_count_conservation() {
    let initial = 2;
    let sem = TimedSemaphore::new(initial);
    let mut releases = 0usize;
    let mut acquires = 0usize;

    let script = [true, false, false, true, true, false, false, false, true];
    for release in script {
        if release {
            sem.release();
            releases += 1;
        } else if sem.acquire_timeout(Duration::from_millis(5)).is_ok() {
            acquires += 1;
        }
    }

    assert_eq!(sem.permits(), initial + releases - acquires);
}

/// Paired release/acquire from many threads nets out to the initial count.
#[test]
fn threaded_count_conservation() {
    let threads = 8;
    let rounds = 200;
    let sem = Arc::new(TimedSemaphore::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let s = Arc::clone(&sem);
            thread::spawn(move || {
                for _ in 0..rounds {
                    // Release before acquire keeps the global count
                    // non-negative, so no acquire can starve.
                    s.release();
                    s.acquire();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("conservation thread");
    }
    assert_eq!(sem.permits(), 0);
}
