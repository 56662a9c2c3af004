//! Events emitted by controlled workers.

use crate::BreakpointId;
use std::time::{Duration, Instant};
use threadstep_core::events::CoordinationEvent;

/// Observable worker activity.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// The worker reached a breakpoint on its own thread and is about to
    /// block on its gate.
    BreakpointHit {
        /// Worker label.
        worker: String,
        /// When the breakpoint was reached.
        timestamp: Instant,
        /// The breakpoint id.
        breakpoint: BreakpointId,
    },
    /// The driver issued a resume (which may pre-arm the gate if the worker
    /// was not suspended).
    Resumed {
        /// Worker label.
        worker: String,
        /// When the resume was issued.
        timestamp: Instant,
    },
    /// The worker's task returned successfully.
    Finished {
        /// Worker label.
        worker: String,
        /// When completion was observed.
        timestamp: Instant,
    },
    /// The worker's task returned an error, which was recorded as its fault.
    Faulted {
        /// Worker label.
        worker: String,
        /// When the fault was recorded.
        timestamp: Instant,
    },
    /// A bounded join in `run_to_end` gave up before the thread terminated.
    JoinTimedOut {
        /// Worker label.
        worker: String,
        /// When the join gave up.
        timestamp: Instant,
        /// The bound that elapsed.
        timeout: Duration,
    },
}

impl CoordinationEvent for WorkerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WorkerEvent::BreakpointHit { .. } => "breakpoint_hit",
            WorkerEvent::Resumed { .. } => "resumed",
            WorkerEvent::Finished { .. } => "finished",
            WorkerEvent::Faulted { .. } => "faulted",
            WorkerEvent::JoinTimedOut { .. } => "join_timed_out",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            WorkerEvent::BreakpointHit { timestamp, .. }
            | WorkerEvent::Resumed { timestamp, .. }
            | WorkerEvent::Finished { timestamp, .. }
            | WorkerEvent::Faulted { timestamp, .. }
            | WorkerEvent::JoinTimedOut { timestamp, .. } => *timestamp,
        }
    }

    fn worker_name(&self) -> &str {
        match self {
            WorkerEvent::BreakpointHit { worker, .. }
            | WorkerEvent::Resumed { worker, .. }
            | WorkerEvent::Finished { worker, .. }
            | WorkerEvent::Faulted { worker, .. }
            | WorkerEvent::JoinTimedOut { worker, .. } => worker,
        }
    }
}
