//! A worker thread the driver can pause at breakpoints and resume.

use crate::config::WorkerConfig;
use crate::error::{Result, WorkerError};
use crate::events::WorkerEvent;
use crate::semaphore::TimedSemaphore;
use crate::BreakpointId;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};
use threadstep_core::events::EventListeners;

/// Sentinel stored in the current-breakpoint slot while the worker is not
/// parked at any breakpoint. Breakpoint ids are expected to be non-negative.
const NO_BREAKPOINT: i64 = -1;

/// State shared between the driver's handle and the worker's own thread.
struct Shared {
    name: String,
    /// The gate: 0 initial permits, acquired by the worker to suspend,
    /// released by the driver to resume.
    gate: TimedSemaphore,
    /// Breakpoint the worker is currently parked at, or [`NO_BREAKPOINT`].
    /// Written by the worker's thread on suspend and by the driver on
    /// resume; read by the driver's poll loops.
    current: AtomicI64,
    /// Identity of the bound thread, set as the spawned thread's first
    /// action. `self_suspend` is a no-op for every other thread.
    bound: OnceLock<ThreadId>,
    started: AtomicBool,
    /// Error the task finished with, if any.
    fault: Mutex<Option<WorkerError>>,
    suspend_timeout: Duration,
    poll_interval: Duration,
    listeners: EventListeners<WorkerEvent>,
}

impl Shared {
    fn emit(&self, event: WorkerEvent) {
        self.listeners.emit(&event);
    }
}

/// One controlled worker thread.
///
/// The worker side of the contract is [`self_suspend`](Self::self_suspend),
/// called (usually through a [`BreakpointDispatcher`](crate::BreakpointDispatcher))
/// from instrumented code running on the bound thread. The driver side is
/// [`resume`](Self::resume), [`run_to_breakpoint`](Self::run_to_breakpoint)
/// and [`run_to_end`](Self::run_to_end).
///
/// Handles are cheap to clone; all clones control the same worker.
///
/// # Lifecycle
///
/// `NotStarted → Running → (SuspendedAtBreakpoint ⇄ Running) → Finished`.
/// [`start`](Self::start) may be called exactly once.
#[derive(Clone)]
pub struct ControlledWorker {
    shared: Arc<Shared>,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

/// What a bounded join observed.
#[derive(Debug)]
pub enum JoinOutcome {
    /// The task ran to completion and returned `Ok`.
    Completed,
    /// The task returned an error, recorded as the worker's fault.
    Faulted(WorkerError),
    /// The worker thread panicked; the payload's message if it had one.
    Panicked(String),
    /// The thread did not terminate within the bound. Best-effort: the
    /// caller is not failed, and the handle is retained so liveness can
    /// still be checked.
    TimedOut,
    /// `run_to_end` was called before `start`.
    NotStarted,
}

impl JoinOutcome {
    /// True for [`JoinOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, JoinOutcome::Completed)
    }

    /// True for [`JoinOutcome::TimedOut`].
    pub fn is_timed_out(&self) -> bool {
        matches!(self, JoinOutcome::TimedOut)
    }
}

impl ControlledWorker {
    /// Creates a worker with default configuration and the given label.
    pub fn new(name: impl Into<String>) -> Self {
        WorkerConfig::builder().name(name).build()
    }

    pub(crate) fn from_config(config: WorkerConfig) -> Self {
        let gate = TimedSemaphore::named(0, format!("{}-gate", config.name));
        Self {
            shared: Arc::new(Shared {
                name: config.name,
                gate,
                current: AtomicI64::new(NO_BREAKPOINT),
                bound: OnceLock::new(),
                started: AtomicBool::new(false),
                fault: Mutex::new(None),
                suspend_timeout: config.suspend_timeout,
                poll_interval: config.poll_interval,
                listeners: config.listeners,
            }),
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// The worker's label.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Begins executing `task` on a new thread bound to this worker.
    ///
    /// The task's `Err` return, if any, is recorded as the worker's fault and
    /// reported by [`run_to_end`](Self::run_to_end). Calling `start` a second
    /// time fails with [`WorkerError::AlreadyStarted`].
    pub fn start<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            return Err(WorkerError::AlreadyStarted {
                worker: self.shared.name.clone(),
            });
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name(self.shared.name.clone())
            .spawn(move || {
                // Bind identity before the task runs anything; self_suspend
                // treats every thread as foreign until this is set.
                let _ = shared.bound.set(thread::current().id());
                match task() {
                    Ok(()) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(worker = %shared.name, "worker task finished");
                        shared.emit(WorkerEvent::Finished {
                            worker: shared.name.clone(),
                            timestamp: Instant::now(),
                        });
                    }
                    Err(err) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(worker = %shared.name, error = %err, "worker task faulted");
                        shared.emit(WorkerEvent::Faulted {
                            worker: shared.name.clone(),
                            timestamp: Instant::now(),
                        });
                        *lock(&shared.fault) = Some(err);
                    }
                }
            })
            .map_err(|source| WorkerError::Spawn {
                worker: self.shared.name.clone(),
                source,
            })?;

        *lock(&self.handle) = Some(handle);
        Ok(())
    }

    /// Suspends the calling thread at `breakpoint`, if the calling thread is
    /// this worker's bound thread.
    ///
    /// For any other thread (or before `start`) this returns `Ok(())`
    /// immediately; that is what makes a dispatcher broadcast safe. On the
    /// bound thread the breakpoint is published for the driver to observe,
    /// then the worker blocks on its gate until resumed.
    ///
    /// A gate timeout means the driver never resumed this worker within the
    /// configured window — a deadlocked scenario. It is fatal to the
    /// worker's path: propagate the error out of the task.
    pub fn self_suspend(&self, breakpoint: BreakpointId) -> Result<()> {
        match self.shared.bound.get() {
            Some(bound) if *bound == thread::current().id() => {}
            _ => return Ok(()),
        }

        self.shared
            .current
            .store(i64::from(breakpoint), Ordering::SeqCst);
        #[cfg(feature = "tracing")]
        tracing::debug!(worker = %self.shared.name, breakpoint, "suspending at breakpoint");
        self.shared.emit(WorkerEvent::BreakpointHit {
            worker: self.shared.name.clone(),
            timestamp: Instant::now(),
            breakpoint,
        });

        self.shared
            .gate
            .acquire_timeout(self.shared.suspend_timeout)
            .map_err(|_| WorkerError::SuspendTimeout {
                worker: self.shared.name.clone(),
                breakpoint,
                timeout: self.shared.suspend_timeout,
            })
    }

    /// Clears the current breakpoint and releases one gate permit.
    ///
    /// If the worker is not currently suspended this pre-arms the gate: the
    /// next suspension passes straight through. Repeated resumes accumulate
    /// permits, one pass-through each. Driver scripts rely on this to let a
    /// worker move past a breakpoint it has not reached yet.
    pub fn resume(&self) {
        self.shared.current.store(NO_BREAKPOINT, Ordering::SeqCst);
        self.shared.gate.release();
        #[cfg(feature = "tracing")]
        tracing::debug!(worker = %self.shared.name, "resume issued");
        self.shared.emit(WorkerEvent::Resumed {
            worker: self.shared.name.clone(),
            timestamp: Instant::now(),
        });
    }

    /// Drives the worker until it parks at `target`.
    ///
    /// If the worker is already parked at `target` this returns at once,
    /// without resuming it. A worker parked at a different breakpoint is
    /// resumed so it can make progress. In either case the current
    /// breakpoint is then polled at the configured interval until it equals
    /// `target` or `timeout` elapses.
    ///
    /// A worker that is merely running toward its next breakpoint is not
    /// resumed; doing so would pre-arm the gate and let it slip past the
    /// very breakpoint the driver wants to observe.
    ///
    /// A timeout is fatal to the scenario: the code under test never reached
    /// the instrumented point the script expected next.
    pub fn run_to_breakpoint(&self, target: BreakpointId, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        if self.current_breakpoint() == Some(target) {
            return Ok(());
        }
        if self.is_suspended() && self.current_breakpoint().is_some() {
            self.resume();
        }

        loop {
            if self.current_breakpoint() == Some(target) {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(WorkerError::BreakpointTimeout {
                    worker: self.shared.name.clone(),
                    breakpoint: target,
                    timeout,
                });
            }
            thread::sleep(self.shared.poll_interval.min(deadline - now));
        }
    }

    /// Resumes the worker unconditionally, then waits up to `timeout` for its
    /// thread to terminate.
    ///
    /// Never fails the caller: a straggling thread is reported as
    /// [`JoinOutcome::TimedOut`] (and logged), and the join handle is kept so
    /// [`is_finished`](Self::is_finished) stays meaningful afterwards.
    pub fn run_to_end(&self, timeout: Duration) -> JoinOutcome {
        self.resume();

        if !self.shared.started.load(Ordering::SeqCst) {
            return JoinOutcome::NotStarted;
        }

        let deadline = Instant::now() + timeout;
        let Some(handle) = lock(&self.handle).take() else {
            // Already joined by an earlier call.
            return match lock(&self.shared.fault).take() {
                Some(err) => JoinOutcome::Faulted(err),
                None => JoinOutcome::Completed,
            };
        };

        while !handle.is_finished() {
            let now = Instant::now();
            if now >= deadline {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    worker = %self.shared.name,
                    ?timeout,
                    "worker did not terminate within the join bound"
                );
                self.shared.emit(WorkerEvent::JoinTimedOut {
                    worker: self.shared.name.clone(),
                    timestamp: Instant::now(),
                    timeout,
                });
                *lock(&self.handle) = Some(handle);
                return JoinOutcome::TimedOut;
            }
            thread::sleep(self.shared.poll_interval.min(deadline - now));
        }

        match handle.join() {
            Ok(()) => match lock(&self.shared.fault).take() {
                Some(err) => JoinOutcome::Faulted(err),
                None => JoinOutcome::Completed,
            },
            Err(payload) => JoinOutcome::Panicked(panic_message(payload.as_ref())),
        }
    }

    /// True iff the gate holds no permits.
    ///
    /// This is the driver's "would a resume be consumed immediately?" check.
    /// Note it is also true for a worker that is running between breakpoints
    /// (or not yet started); a resume in that window pre-arms the gate.
    pub fn is_suspended(&self) -> bool {
        self.shared.gate.permits() == 0
    }

    /// The breakpoint the worker last published, or `None` while running.
    pub fn current_breakpoint(&self) -> Option<BreakpointId> {
        let raw = self.shared.current.load(Ordering::SeqCst);
        if raw < 0 {
            None
        } else {
            Some(raw as BreakpointId)
        }
    }

    /// True once the worker's thread has terminated (or been joined).
    pub fn is_finished(&self) -> bool {
        if !self.shared.started.load(Ordering::SeqCst) {
            return false;
        }
        match lock(&self.handle).as_ref() {
            Some(handle) => handle.is_finished(),
            None => true,
        }
    }

    /// Identity comparison: do two handles control the same worker?
    pub(crate) fn same_worker(&self, other: &ControlledWorker) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl std::fmt::Debug for ControlledWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlledWorker")
            .field("name", &self.shared.name)
            .field("current_breakpoint", &self.current_breakpoint())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
