//! Error types for the coordination mechanism.
//!
//! Every timeout here signals a logic defect in the driver script or the
//! code under test, never a transient condition. Nothing in this crate
//! retries.

use crate::BreakpointId;
use std::time::Duration;
use threadstep_core::CoordinationError;

/// Errors raised by [`TimedSemaphore`](crate::TimedSemaphore).
#[derive(Debug, Clone, thiserror::Error)]
pub enum SemaphoreError {
    /// No permit became available within the bound.
    #[error("semaphore `{semaphore}` acquire timed out after {timeout:?}")]
    AcquireTimeout {
        /// Diagnostic name of the semaphore.
        semaphore: String,
        /// The bound that elapsed.
        timeout: Duration,
    },
}

/// Errors raised by [`ControlledWorker`](crate::ControlledWorker) and
/// [`BreakpointDispatcher`](crate::BreakpointDispatcher).
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// `start` was called on a worker that already has a thread bound.
    #[error("worker `{worker}` was already started")]
    AlreadyStarted {
        /// Worker label.
        worker: String,
    },
    /// The OS refused to spawn the worker thread.
    #[error("failed to spawn thread for worker `{worker}`")]
    Spawn {
        /// Worker label.
        worker: String,
        /// Underlying spawn failure.
        #[source]
        source: std::io::Error,
    },
    /// The worker suspended at a breakpoint and was never resumed.
    ///
    /// Fatal to the worker's execution path: it cannot safely continue
    /// without the resume it was waiting for, so the task must propagate
    /// this error and stop.
    #[error(
        "worker `{worker}` suspended at breakpoint {breakpoint} was not resumed within {timeout:?}"
    )]
    SuspendTimeout {
        /// Worker label.
        worker: String,
        /// Breakpoint the worker was parked at.
        breakpoint: BreakpointId,
        /// The bound that elapsed.
        timeout: Duration,
    },
    /// The driver never observed the breakpoint it was stepping toward.
    ///
    /// Fatal to the driver script: the code under test either never reaches
    /// the instrumented point or the scenario steps are out of order.
    #[error("worker `{worker}` did not reach breakpoint {breakpoint} within {timeout:?}")]
    BreakpointTimeout {
        /// Worker label.
        worker: String,
        /// Breakpoint the driver was waiting for.
        breakpoint: BreakpointId,
        /// The bound that elapsed.
        timeout: Duration,
    },
}

/// Result type for worker operations.
pub type Result<T> = std::result::Result<T, WorkerError>;

impl From<SemaphoreError> for CoordinationError {
    fn from(err: SemaphoreError) -> Self {
        match err {
            SemaphoreError::AcquireTimeout { semaphore, timeout } => {
                CoordinationError::AcquireTimeout { semaphore, timeout }
            }
        }
    }
}

impl From<WorkerError> for CoordinationError {
    fn from(err: WorkerError) -> Self {
        match err {
            WorkerError::AlreadyStarted { worker } => CoordinationError::AlreadyStarted { worker },
            WorkerError::Spawn { worker, source } => CoordinationError::Spawn { worker, source },
            WorkerError::SuspendTimeout {
                worker,
                breakpoint,
                timeout,
            } => CoordinationError::SuspendTimeout {
                worker,
                breakpoint,
                timeout,
            },
            WorkerError::BreakpointTimeout {
                worker,
                breakpoint,
                timeout,
            } => CoordinationError::BreakpointTimeout {
                worker,
                breakpoint,
                timeout,
            },
        }
    }
}
