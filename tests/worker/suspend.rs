use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use threadstep::{BreakpointDispatcher, JoinOutcome, WorkerConfig, WorkerError};

#[test]
fn worker_parks_at_its_breakpoint_until_resumed() {
    let dispatcher = BreakpointDispatcher::new();
    let worker = dispatcher.create_worker("parker");
    let past_breakpoint = Arc::new(AtomicBool::new(false));

    let hooks = dispatcher.clone();
    let flag = Arc::clone(&past_breakpoint);
    worker
        .start(move || {
            hooks.breakpoint(1)?;
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .expect("start");

    worker
        .run_to_breakpoint(1, Duration::from_secs(5))
        .expect("worker reaches breakpoint 1");
    assert_eq!(worker.current_breakpoint(), Some(1));
    assert!(worker.is_suspended());
    assert!(
        !past_breakpoint.load(Ordering::SeqCst),
        "worker must not run past the breakpoint while parked"
    );

    assert!(worker.run_to_end(Duration::from_secs(5)).is_completed());
    assert!(past_breakpoint.load(Ordering::SeqCst));
    assert_eq!(worker.current_breakpoint(), None);
}

/// Calling self_suspend from a thread that is not the bound one returns
/// immediately without touching the worker's state.
#[test]
fn foreign_thread_suspension_is_ignored() {
    let dispatcher = BreakpointDispatcher::new();
    let worker = dispatcher.create_worker("bound");

    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let hooks = dispatcher.clone();
    worker
        .start(move || {
            rx.recv().ok();
            hooks.breakpoint(2)?;
            Ok(())
        })
        .expect("start");

    // From the driver thread this is a no-op.
    worker.self_suspend(8).expect("no-op for a foreign thread");
    assert_eq!(worker.current_breakpoint(), None);

    // And from an unrelated helper thread too.
    let w = worker.clone();
    thread::spawn(move || w.self_suspend(8))
        .join()
        .expect("helper thread")
        .expect("no-op for an unrelated thread");
    assert_eq!(worker.current_breakpoint(), None);

    tx.send(()).expect("worker is waiting on the channel");
    worker
        .run_to_breakpoint(2, Duration::from_secs(5))
        .expect("only the bound thread parks");
    assert!(worker.run_to_end(Duration::from_secs(5)).is_completed());
}

/// A suspended worker that nobody resumes fails its own execution path once
/// the suspend bound elapses; the error lands in the fault slot.
#[test]
fn unresumed_suspension_is_fatal_to_the_worker() {
    let dispatcher = BreakpointDispatcher::new();
    let worker = WorkerConfig::builder()
        .name("abandoned")
        .suspend_timeout(Duration::from_millis(100))
        .build();
    dispatcher.register(&worker);

    let hooks = dispatcher.clone();
    worker.start(move || hooks.breakpoint(3)).expect("start");

    worker
        .run_to_breakpoint(3, Duration::from_secs(5))
        .expect("worker reaches breakpoint 3");

    // Let the worker's own bound expire without resuming it.
    thread::sleep(Duration::from_millis(400));

    match worker.run_to_end(Duration::from_secs(5)) {
        JoinOutcome::Faulted(WorkerError::SuspendTimeout {
            breakpoint,
            timeout,
            ..
        }) => {
            assert_eq!(breakpoint, 3);
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("expected a fatal suspend timeout, got {other:?}"),
    }
}
