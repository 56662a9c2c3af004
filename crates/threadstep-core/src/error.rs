//! Unified error type for driver scripts.
//!
//! The leaf crates define their own error enums (`SemaphoreError`,
//! `WorkerError`) and provide `From` conversions into [`CoordinationError`].
//! A test scenario that mixes raw semaphore use with worker stepping can then
//! declare a single error type and use `?` everywhere:
//!
//! ```rust,ignore
//! fn scenario() -> Result<(), CoordinationError> {
//!     worker.run_to_breakpoint(1, Duration::from_secs(5))?;
//!     gate.acquire_timeout(Duration::from_millis(100))?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

/// Any failure the coordination mechanism can surface to a driver.
///
/// Every variant here indicates a logic defect in the driver script or the
/// code under test, never a transient condition; callers should fail the
/// scenario rather than retry.
#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    /// A semaphore wait exceeded its bound.
    #[error("semaphore `{semaphore}` acquire timed out after {timeout:?}")]
    AcquireTimeout {
        /// Diagnostic name of the semaphore.
        semaphore: String,
        /// The bound that elapsed.
        timeout: Duration,
    },
    /// A suspended worker was never resumed within its allowed window.
    #[error(
        "worker `{worker}` suspended at breakpoint {breakpoint} was not resumed within {timeout:?}"
    )]
    SuspendTimeout {
        /// Worker label.
        worker: String,
        /// Breakpoint the worker was parked at.
        breakpoint: i32,
        /// The bound that elapsed.
        timeout: Duration,
    },
    /// The driver never observed the breakpoint it was stepping toward.
    #[error("worker `{worker}` did not reach breakpoint {breakpoint} within {timeout:?}")]
    BreakpointTimeout {
        /// Worker label.
        worker: String,
        /// Breakpoint the driver was waiting for.
        breakpoint: i32,
        /// The bound that elapsed.
        timeout: Duration,
    },
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
}
