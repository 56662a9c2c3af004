use std::time::Duration;
use threadstep::{BreakpointDispatcher, ControlledWorker};

#[test]
fn create_worker_registers_the_handle() {
    let dispatcher = BreakpointDispatcher::new();
    assert!(dispatcher.is_empty());

    let worker = dispatcher.create_worker("made");
    assert_eq!(dispatcher.len(), 1);
    assert_eq!(worker.name(), "made");
}

/// An unregistered worker's thread passes breakpoints without stopping:
/// the dispatch finds nobody bound to the calling thread.
#[test]
fn unregistered_worker_is_not_suspended() {
    let dispatcher = BreakpointDispatcher::new();
    let worker = dispatcher.create_worker("dropped-out");
    dispatcher.unregister(&worker);
    assert!(dispatcher.is_empty());

    let hooks = dispatcher.clone();
    worker
        .start(move || {
            hooks.breakpoint(1)?;
            hooks.breakpoint(2)?;
            Ok(())
        })
        .expect("start");

    // No resume is ever issued; the worker must finish on its own.
    assert!(worker.run_to_end(Duration::from_secs(5)).is_completed());
    assert_eq!(worker.current_breakpoint(), None);
}

/// Clones of a dispatcher share one registry.
#[test]
fn clones_share_membership() {
    let dispatcher = BreakpointDispatcher::new();
    let alias = dispatcher.clone();

    let worker = ControlledWorker::new("shared");
    dispatcher.register(&worker);
    assert_eq!(alias.len(), 1);

    alias.unregister(&worker);
    assert!(dispatcher.is_empty());
}
