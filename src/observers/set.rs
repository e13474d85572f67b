//! # HandlerSet: ordered dispatch over one phase's handlers.
//!
//! Each policy keeps one [`HandlerSet`] per phase (`on_success`,
//! `on_backoff`, `on_giveup`). Dispatch is **sequential and in registration
//! order**: every handler sees the same borrowed [`Event`], and a suspending
//! handler is awaited to completion before the next handler runs.
//!
//! Unlike a fan-out bus there are no queues and no isolation here: a
//! panicking handler propagates and aborts the invocation, by contract.

use super::event::Event;
use super::observer::Handler;

pub(crate) struct HandlerSet<T, E> {
    list: Vec<Handler<T, E>>,
}

impl<T, E> HandlerSet<T, E> {
    pub fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub fn push(&mut self, handler: Handler<T, E>) {
        self.list.push(handler);
    }

    /// True when any registered handler needs a cooperative context.
    pub fn has_suspending(&self) -> bool {
        self.list.iter().any(Handler::is_suspending)
    }

    /// Dispatches in registration order, awaiting suspending handlers.
    pub async fn notify(&self, event: &Event<'_, T, E>) {
        for handler in &self.list {
            match handler {
                Handler::Call(f) => f(event),
                Handler::Suspend(o) => o.on_event(event).await,
            }
        }
    }

    /// Dispatches in registration order in a blocking context.
    ///
    /// Suspending handlers are rejected when the blocking variant is
    /// constructed, so only ordinary callables can be present here.
    pub fn notify_blocking(&self, event: &Event<'_, T, E>) {
        for handler in &self.list {
            if let Handler::Call(f) = handler {
                f(event);
            }
        }
    }
}

impl<T, E> Clone for HandlerSet<T, E> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

impl<T, E> Default for HandlerSet<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::event::EventKind;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct Recorder {
        log: Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    }

    #[async_trait]
    impl crate::Observer<u32, &'static str> for Recorder {
        async fn on_event(&self, _event: &Event<'_, u32, &'static str>) {
            self.log.lock().unwrap().push(self.tag);
        }
    }

    fn event() -> Event<'static, u32, &'static str> {
        Event::new("t", EventKind::Backoff, 1, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_dispatch_preserves_registration_order() {
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let mut set: HandlerSet<u32, &'static str> = HandlerSet::new();

        let l = Arc::clone(&log);
        set.push(Handler::call(move |_| l.lock().unwrap().push("first")));
        set.push(Handler::suspend(Recorder {
            log: Arc::clone(&log),
            tag: "second",
        }));
        let l = Arc::clone(&log);
        set.push(Handler::call(move |_| l.lock().unwrap().push("third")));

        set.notify(&event()).await;
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_has_suspending_detection() {
        let mut set: HandlerSet<u32, &'static str> = HandlerSet::new();
        set.push(Handler::call(|_| {}));
        assert!(!set.has_suspending());
        set.push(Handler::suspend(Recorder {
            log: Arc::new(Mutex::new(Vec::new())),
            tag: "x",
        }));
        assert!(set.has_suspending());
    }

    #[test]
    fn test_blocking_dispatch_runs_ordinary_handlers() {
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let mut set: HandlerSet<u32, &'static str> = HandlerSet::new();
        let l = Arc::clone(&log);
        set.push(Handler::call(move |_| l.lock().unwrap().push("ran")));
        set.notify_blocking(&event());
        assert_eq!(*log.lock().unwrap(), vec!["ran"]);
    }
}
