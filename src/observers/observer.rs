//! # Observer: user-facing lifecycle handlers.
//!
//! The [`Observer`] trait is the extension point for handlers that need to
//! suspend (metrics export, async channels, …). Ordinary closures are the
//! common case and are registered directly on the policy builder; both forms
//! are held as [`Handler`] values and invoked in registration order.
//!
//! In a cooperative context each suspending observer is awaited in sequence
//! before the next phase proceeds. In a blocking context suspending
//! observers cannot run at all; the blocking finalizer rejects them at
//! decoration time (see [`ConfigError`](crate::ConfigError)).
//!
//! A handler that panics propagates the panic out of the whole invocation,
//! aborting the retry loop; the engine never catches it.
//!
//! # Example: suspending observer
//! ```rust
//! use async_trait::async_trait;
//! use reattempt::{Event, EventKind, Observer};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Observer<u32, std::io::Error> for Metrics {
//!     async fn on_event(&self, event: &Event<'_, u32, std::io::Error>) {
//!         if event.kind == EventKind::Backoff {
//!             // push to a metrics pipeline...
//!         }
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use super::event::Event;

/// # Trait for suspending lifecycle handlers.
///
/// Implementations receive every [`Event`] of the phase list they were
/// registered on. Typical use cases:
/// - forwarding to metrics systems;
/// - alerting pipelines;
/// - structured logging with async sinks.
#[async_trait]
pub trait Observer<T, E>: Send + Sync {
    /// Called for every emitted [`Event`] of the registered phase.
    async fn on_event(&self, event: &Event<'_, T, E>);
}

/// One registered handler: an ordinary closure or a suspending observer.
pub enum Handler<T, E> {
    /// Ordinary (non-suspending) callable; valid in both execution modes.
    Call(Arc<dyn Fn(&Event<'_, T, E>) + Send + Sync>),
    /// Suspending observer; cooperative mode only.
    Suspend(Arc<dyn Observer<T, E>>),
}

impl<T, E> Handler<T, E> {
    /// Wraps an ordinary closure.
    pub fn call<F>(f: F) -> Self
    where
        F: Fn(&Event<'_, T, E>) + Send + Sync + 'static,
    {
        Handler::Call(Arc::new(f))
    }

    /// Wraps a suspending observer.
    pub fn suspend<O>(observer: O) -> Self
    where
        O: Observer<T, E> + 'static,
    {
        Handler::Suspend(Arc::new(observer))
    }

    /// True for handlers that need a cooperative context.
    pub(crate) fn is_suspending(&self) -> bool {
        matches!(self, Handler::Suspend(_))
    }
}

impl<T, E> Clone for Handler<T, E> {
    fn clone(&self) -> Self {
        match self {
            Handler::Call(f) => Handler::Call(Arc::clone(f)),
            Handler::Suspend(o) => Handler::Suspend(Arc::clone(o)),
        }
    }
}

impl<T, E> std::fmt::Debug for Handler<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Call(_) => f.write_str("Handler::Call(..)"),
            Handler::Suspend(_) => f.write_str("Handler::Suspend(..)"),
        }
    }
}
