//! Broadcast of breakpoint hits to registered workers.

use crate::error::Result;
use crate::worker::ControlledWorker;
use crate::BreakpointId;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry that forwards breakpoint hits from instrumented code to every
/// registered worker.
///
/// Instrumented code calls [`breakpoint`](Self::breakpoint) at the points
/// where deterministic interleaving control is wanted. The call is broadcast
/// to every registered worker; each worker's identity check makes it a no-op
/// everywhere except on the one thread that is actually bound to a worker,
/// so the broadcast is safe with any number of registrations.
///
/// The dispatcher is an explicit instance owned by the test driver. There is
/// no process-global registry, so parallel test runs cannot leak workers
/// into each other. Membership changes belong to driver setup and must not
/// race a dispatch; dispatch itself iterates a stable snapshot.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct BreakpointDispatcher {
    registered: Arc<Mutex<Vec<ControlledWorker>>>,
}

impl BreakpointDispatcher {
    /// An empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `worker` to the registry. Insertion order is preserved.
    ///
    /// Registering the same worker twice is permitted but discouraged; a
    /// duplicate entry suspends the bound thread once per entry.
    pub fn register(&self, worker: &ControlledWorker) {
        self.lock().push(worker.clone());
    }

    /// Removes every registration of `worker`.
    pub fn unregister(&self, worker: &ControlledWorker) {
        self.lock().retain(|w| !w.same_worker(worker));
    }

    /// Creates a worker with default configuration, registers it, and
    /// returns its handle.
    pub fn create_worker(&self, name: impl Into<String>) -> ControlledWorker {
        let worker = ControlledWorker::new(name);
        self.register(&worker);
        worker
    }

    /// The breakpoint hook for instrumented code.
    ///
    /// Forwards `id` to every registered worker. Only the worker bound to
    /// the calling thread reacts (by suspending itself); for the rest the
    /// call is a no-op. Reentrant-safe: the registry snapshot is taken
    /// before any worker is given the chance to block.
    ///
    /// The only error that can surface is the suspended worker's own
    /// [`SuspendTimeout`](crate::WorkerError::SuspendTimeout), which the
    /// instrumented task should propagate.
    pub fn breakpoint(&self, id: BreakpointId) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::trace!(breakpoint = id, "dispatching breakpoint");
        let snapshot: Vec<ControlledWorker> = self.lock().clone();
        for worker in &snapshot {
            worker.self_suspend(id)?;
        }
        Ok(())
    }

    /// Number of registered workers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if no workers are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ControlledWorker>> {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BreakpointDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakpointDispatcher")
            .field("registered", &self.len())
            .finish()
    }
}
