//! Deterministic thread coordination for concurrency tests.
//!
//! Some bugs only appear under a specific interleaving: thread A must reach
//! point X before thread B is allowed to proceed. This crate lets a test
//! driver force such interleavings repeatably by pausing worker threads at
//! named breakpoints in the code under test and resuming them in a chosen
//! order.
//!
//! Three pieces cooperate:
//!
//! - [`TimedSemaphore`] — a blocking counting semaphore with bounded-time
//!   acquisition; the only low-level primitive.
//! - [`ControlledWorker`] — one worker thread. It suspends itself when its
//!   own thread reaches a breakpoint; the driver resumes it, steps it to a
//!   target breakpoint, or runs it to completion. Every wait is bounded.
//! - [`BreakpointDispatcher`] — the registry instrumented code calls into.
//!   `dispatcher.breakpoint(id)` is broadcast to every registered worker;
//!   only the worker bound to the calling thread reacts.
//!
//! # Stepping a worker through breakpoints
//!
//! ```rust
//! use std::time::Duration;
//! use threadstep::{BreakpointDispatcher, WorkerConfig, WorkerError};
//!
//! # fn main() -> Result<(), WorkerError> {
//! let dispatcher = BreakpointDispatcher::new();
//! let worker = WorkerConfig::builder().name("loader").build();
//! dispatcher.register(&worker);
//!
//! let hooks = dispatcher.clone();
//! worker.start(move || {
//!     // first phase of the code under test
//!     hooks.breakpoint(1)?;
//!     // second phase
//!     hooks.breakpoint(2)?;
//!     Ok(())
//! })?;
//!
//! worker.run_to_breakpoint(1, Duration::from_secs(5))?;
//! assert_eq!(worker.current_breakpoint(), Some(1));
//!
//! worker.run_to_breakpoint(2, Duration::from_secs(5))?;
//! assert_eq!(worker.current_breakpoint(), Some(2));
//!
//! assert!(worker.run_to_end(Duration::from_secs(5)).is_completed());
//! # Ok(())
//! # }
//! ```
//!
//! # Letting a worker pass a breakpoint without stopping
//!
//! A resume issued while the worker is not suspended pre-arms its gate, so
//! the next suspension passes straight through. Pre-arms accumulate, one
//! pass-through per resume:
//!
//! ```rust
//! use std::time::Duration;
//! use threadstep::{BreakpointDispatcher, ControlledWorker, WorkerError};
//!
//! # fn main() -> Result<(), WorkerError> {
//! let dispatcher = BreakpointDispatcher::new();
//! let worker = dispatcher.create_worker("skipper");
//!
//! // Allow the worker through breakpoints 1 and 2 before it even starts.
//! worker.resume();
//! worker.resume();
//!
//! let hooks = dispatcher.clone();
//! worker.start(move || {
//!     hooks.breakpoint(1)?;
//!     hooks.breakpoint(2)?;
//!     Ok(())
//! })?;
//!
//! assert!(worker.run_to_end(Duration::from_secs(5)).is_completed());
//! # Ok(())
//! # }
//! ```
//!
//! # Observing worker activity
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//! use threadstep::{BreakpointDispatcher, WorkerConfig, WorkerError};
//!
//! # fn main() -> Result<(), WorkerError> {
//! let hits = Arc::new(AtomicUsize::new(0));
//! let h = Arc::clone(&hits);
//!
//! let dispatcher = BreakpointDispatcher::new();
//! let worker = WorkerConfig::builder()
//!     .name("observed")
//!     .on_breakpoint(move |_| {
//!         h.fetch_add(1, Ordering::SeqCst);
//!     })
//!     .build();
//! dispatcher.register(&worker);
//!
//! worker.resume(); // let it pass breakpoint 7 without stopping
//! let hooks = dispatcher.clone();
//! worker.start(move || hooks.breakpoint(7))?;
//!
//! worker.run_to_end(Duration::from_secs(5));
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Timeouts
//!
//! Every wait in the crate is bounded, so a broken scenario fails instead of
//! hanging the suite:
//!
//! - a suspended worker that is never resumed fails its own execution path
//!   with [`WorkerError::SuspendTimeout`];
//! - a driver stepping toward a breakpoint that is never reached gets
//!   [`WorkerError::BreakpointTimeout`];
//! - [`ControlledWorker::run_to_end`] reports a straggling thread as
//!   [`JoinOutcome::TimedOut`] without failing the caller.
//!
//! None of these are retryable conditions; they indicate a defect in the
//! driver script or the code under test.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod semaphore;
pub mod worker;

/// Identifier of a breakpoint in instrumented code. Non-negative by
/// convention; negative values are reserved for the "not at any breakpoint"
/// sentinel.
pub type BreakpointId = i32;

pub use config::{WorkerConfig, WorkerConfigBuilder, DEFAULT_POLL_INTERVAL, DEFAULT_SUSPEND_TIMEOUT};
pub use dispatcher::BreakpointDispatcher;
pub use error::{Result, SemaphoreError, WorkerError};
pub use events::WorkerEvent;
pub use semaphore::TimedSemaphore;
pub use worker::{ControlledWorker, JoinOutcome};
