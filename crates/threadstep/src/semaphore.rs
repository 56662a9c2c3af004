//! Blocking counting semaphore with bounded-time acquisition.

use crate::error::SemaphoreError;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A counting semaphore whose waits can be bounded by a timeout.
///
/// This is the sole low-level primitive in the crate: a worker's gate is a
/// `TimedSemaphore` with zero initial permits, acquired by the worker when it
/// suspends and released by the driver when it resumes.
///
/// Permits accumulate: multiple [`release`](Self::release) calls without an
/// intervening acquire push the count past 1, and every acquire consumes
/// exactly one unit. The count never goes negative.
pub struct TimedSemaphore {
    permits: Mutex<usize>,
    available: Condvar,
    name: Option<String>,
}

impl TimedSemaphore {
    /// Creates a semaphore holding `permits` initial permits.
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
            name: None,
        }
    }

    /// Creates a named semaphore. The name only appears in diagnostics.
    pub fn named(permits: usize, name: impl Into<String>) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
            name: Some(name.into()),
        }
    }

    /// Blocks until a permit is available, then takes exactly one.
    ///
    /// Prefer [`acquire_timeout`](Self::acquire_timeout) anywhere a hung
    /// counterpart would otherwise hang the caller.
    pub fn acquire(&self) {
        let mut permits = self.lock();
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
    }

    /// Blocks until a permit is available or `timeout` elapses.
    ///
    /// On success exactly one permit is consumed. On timeout the count is
    /// left unchanged and [`SemaphoreError::AcquireTimeout`] is returned.
    /// Spurious wakeups re-check the count against an absolute deadline, so
    /// the wait never returns early without a permit.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), SemaphoreError> {
        let deadline = Instant::now() + timeout;
        let mut permits = self.lock();
        while *permits == 0 {
            let now = Instant::now();
            if now >= deadline {
                return Err(SemaphoreError::AcquireTimeout {
                    semaphore: self.display_name().to_string(),
                    timeout,
                });
            }
            let (guard, _) = self
                .available
                .wait_timeout(permits, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            permits = guard;
        }
        *permits -= 1;
        Ok(())
    }

    /// Returns one permit and wakes a waiter if any exist.
    ///
    /// Never blocks, never fails.
    pub fn release(&self) {
        let mut permits = self.lock();
        *permits += 1;
        self.available.notify_one();
    }

    /// Snapshot of the current permit count.
    ///
    /// For liveness and diagnostic checks only; the value can be stale by the
    /// time the caller acts on it.
    pub fn permits(&self) -> usize {
        *self.lock()
    }

    /// Diagnostic name, or a generic fallback.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("semaphore")
    }

    // The guarded state is a bare counter; a panic elsewhere cannot leave it
    // half-updated, so poison is recovered rather than propagated.
    fn lock(&self) -> std::sync::MutexGuard<'_, usize> {
        self.permits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TimedSemaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedSemaphore")
            .field("name", &self.name)
            .field("permits", &self.permits())
            .finish()
    }
}
