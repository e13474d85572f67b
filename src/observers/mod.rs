//! Lifecycle events and the handlers that observe them.
//!
//! This module groups the event **data model**, the handler forms, and the
//! dispatch machinery used at each phase transition of the retry loop.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] phase classification and borrowed snapshot
//! - [`Observer`], [`Handler`] suspending trait and the closure/observer duality
//! - `HandlerSet` ordered sequential dispatch per phase
//! - default `tracing` wiring under the target `"reattempt"`
//!
//! ## Quick reference
//! - **Emitters**: the async drivers in `retry` and the blocking drivers in
//!   `blocking`, at the success / backoff / give-up transitions.
//! - **Consumers**: closures registered via `on_*`, observers registered via
//!   `observe_*`, and the default logging sink.

mod event;
mod log;
mod observer;
mod set;

pub use event::{Event, EventKind};
pub use observer::{Handler, Observer};

pub(crate) use log::LogConfig;
pub(crate) use set::HandlerSet;
