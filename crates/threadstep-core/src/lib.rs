//! Core types shared across the threadstep crates.
//!
//! This crate carries the two concerns every part of the coordination
//! mechanism needs:
//!
//! - [`events`] — a small listener system used to observe worker activity
//!   (breakpoint hits, resumes, join timeouts) without coupling observers to
//!   the worker implementation.
//! - [`CoordinationError`] — a unified error type driver scripts can convert
//!   the per-crate errors into, so a test scenario can use `?` throughout
//!   without writing `From` boilerplate per error.

pub mod error;
pub mod events;

pub use error::CoordinationError;
pub use events::{CoordinationEvent, EventListener, EventListeners, FnListener};
