//! Configuration for controlled workers.

use crate::events::WorkerEvent;
use crate::worker::ControlledWorker;
use crate::BreakpointId;
use std::time::Duration;
use threadstep_core::events::{EventListener, EventListeners, FnListener};

/// Default bound on a suspended worker waiting to be resumed.
pub const DEFAULT_SUSPEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Default step for the driver's poll loops (`run_to_breakpoint`,
/// `run_to_end`).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for a [`ControlledWorker`].
#[derive(Clone)]
pub struct WorkerConfig {
    /// Worker label, used in thread names, errors and diagnostics.
    pub(crate) name: String,
    /// How long a suspended worker waits for a resume before failing its
    /// own execution path.
    pub(crate) suspend_timeout: Duration,
    /// Polling step for the driver-side bounded waits.
    pub(crate) poll_interval: Duration,
    /// Event listeners.
    pub(crate) listeners: EventListeners<WorkerEvent>,
}

impl WorkerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> WorkerConfigBuilder {
        WorkerConfigBuilder::new()
    }
}

/// Builder for worker configuration.
pub struct WorkerConfigBuilder {
    name: String,
    suspend_timeout: Duration,
    poll_interval: Duration,
    listeners: EventListeners<WorkerEvent>,
}

impl WorkerConfigBuilder {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self {
            name: "worker".to_string(),
            suspend_timeout: DEFAULT_SUSPEND_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            listeners: EventListeners::new(),
        }
    }

    /// Sets the worker's label.
    ///
    /// Default: `"worker"`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the bound on a suspended worker waiting for a resume.
    ///
    /// When it elapses the worker's execution path fails with
    /// [`WorkerError::SuspendTimeout`](crate::WorkerError::SuspendTimeout);
    /// a deadlocked scenario surfaces as an error instead of hanging the
    /// suite.
    ///
    /// Default: 30 seconds
    pub fn suspend_timeout(mut self, timeout: Duration) -> Self {
        self.suspend_timeout = timeout;
        self
    }

    /// Sets the polling step used by `run_to_breakpoint` and `run_to_end`.
    ///
    /// A shorter interval tightens the latency between a worker parking and
    /// the driver observing it, at the cost of more wakeups.
    ///
    /// Default: 10 milliseconds
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Registers a callback for every breakpoint the worker parks at.
    ///
    /// The callback runs on the worker's own thread, just before it blocks.
    pub fn on_breakpoint<F>(mut self, f: F) -> Self
    where
        F: Fn(BreakpointId) + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event| {
            if let WorkerEvent::BreakpointHit { breakpoint, .. } = event {
                f(*breakpoint);
            }
        }));
        self
    }

    /// Registers a callback for every resume the driver issues, including
    /// pre-arming resumes.
    pub fn on_resumed<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(FnListener::new(move |event| {
            if let WorkerEvent::Resumed { .. } = event {
                f();
            }
        }));
        self
    }

    /// Registers a raw event listener receiving every [`WorkerEvent`].
    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: EventListener<WorkerEvent> + 'static,
    {
        self.listeners.add(listener);
        self
    }

    /// Builds the worker.
    pub fn build(self) -> ControlledWorker {
        ControlledWorker::from_config(WorkerConfig {
            name: self.name,
            suspend_timeout: self.suspend_timeout,
            poll_interval: self.poll_interval,
            listeners: self.listeners,
        })
    }
}

impl Default for WorkerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
