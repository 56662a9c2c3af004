//! Listener system for coordination events.
//!
//! Workers emit an event whenever something a test might want to observe
//! happens: a breakpoint is hit, a resume is issued, a bounded join gives up.
//! Observers register through [`EventListeners`]; the worker never knows who
//! is listening.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// An event emitted by the coordination mechanism.
pub trait CoordinationEvent: Send + Sync + fmt::Debug {
    /// Short machine-readable tag, e.g. `"breakpoint_hit"`.
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn timestamp(&self) -> Instant;

    /// Label of the worker the event concerns.
    fn worker_name(&self) -> &str;
}

/// An observer of coordination events.
pub trait EventListener<E: CoordinationEvent>: Send + Sync {
    /// Called once per emitted event.
    fn on_event(&self, event: &E);
}

/// A set of listeners sharing one event type.
///
/// Cloning is cheap; listeners are reference-counted.
#[derive(Clone)]
pub struct EventListeners<E: CoordinationEvent> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: CoordinationEvent> EventListeners<E> {
    /// An empty listener set.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Delivers `event` to every listener.
    ///
    /// A panicking listener is isolated so the remaining listeners still see
    /// the event; worker threads must not be taken down by an observer.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener.on_event(event);
            }));
        }
    }

    /// True if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: CoordinationEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter turning a closure into an [`EventListener`].
pub struct FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    f: F,
    _marker: std::marker::PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    /// Wraps `f` as a listener.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: CoordinationEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.f)(event)
    }
}
