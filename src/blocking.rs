//! # Blocking execution drivers.
//!
//! The blocking variants run the same state machine as the cooperative
//! drivers in [`crate::RetryOnError`] / [`crate::RetryOnValue`], with two
//! differences:
//!
//! - waits use [`std::thread::sleep`] and block the calling thread;
//! - suspending observers cannot run here, so the `.blocking()` finalizer
//!   rejects them at decoration time with
//!   [`ConfigError::SuspendingObserver`](crate::ConfigError).
//!
//! Everything else — classification, give-up evaluation order, limit
//! projection, jitter, event ordering, logging — is byte-for-byte shared
//! through the common loop core, so both modes stay in lockstep by
//! construction.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use reattempt::{RetryOnError, WaitSchedule};
//!
//! # #[derive(Debug, thiserror::Error)]
//! # #[error("transient")]
//! # struct Transient;
//! # fn flaky() -> Result<u32, Transient> { Ok(7) }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let retry = RetryOnError::new(WaitSchedule::expo())
//!     .max_tries(5u32)
//!     .blocking()?;
//!
//! let value = retry.call(|| flaky())?;
//! assert_eq!(value, 7);
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::fmt::Display;

use crate::engine::Next;
use crate::error::RetryError;
use crate::observers::{Event, EventKind};
use crate::retry::Core;
use crate::trigger::Cause;

impl<T, E> Core<T, E>
where
    E: Display,
{
    /// The thread-blocking retry loop. Mirrors `drive` transition for
    /// transition; only the suspension primitive differs.
    fn drive_blocking<F>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut engine = self.engine();
        loop {
            engine.begin_attempt();
            let outcome = op();

            match engine.decide(outcome) {
                Next::Done(value) => {
                    let event =
                        Event::new(&self.name, EventKind::Success, engine.tries(), engine.elapsed())
                            .with_value(&value);
                    self.on_success.notify_blocking(&event);
                    return Ok(value);
                }
                Next::Fatal(error) => {
                    return Err(RetryError::Permanent {
                        tries: engine.tries(),
                        error,
                    });
                }
                Next::GiveUp(cause) => {
                    let tries = engine.tries();
                    let elapsed = engine.elapsed();
                    let event = Event::new(&self.name, EventKind::GiveUp, tries, elapsed);
                    match cause {
                        Cause::Error(error) => {
                            self.log.giveup(&self.name, tries, elapsed, Some(&error));
                            self.on_giveup.notify_blocking(&event.with_error(&error));
                            return Err(RetryError::GiveUp {
                                tries,
                                elapsed,
                                error,
                            });
                        }
                        Cause::Value(value) => {
                            self.log.giveup(&self.name, tries, elapsed, None);
                            self.on_giveup.notify_blocking(&event.with_value(&value));
                            return Ok(value);
                        }
                    }
                }
                Next::Backoff { wait, cause } => {
                    let tries = engine.tries();
                    let event = Event::new(&self.name, EventKind::Backoff, tries, engine.elapsed())
                        .with_wait(wait);
                    match &cause {
                        Cause::Error(error) => {
                            self.log.backoff(&self.name, tries, wait, Some(error));
                            self.on_backoff.notify_blocking(&event.with_error(error));
                        }
                        Cause::Value(value) => {
                            self.log.backoff(&self.name, tries, wait, None);
                            self.on_backoff.notify_blocking(&event.with_value(value));
                        }
                    }
                    std::thread::sleep(wait);
                }
            }
        }
    }
}

/// Blocking counterpart of [`crate::RetryOnError`].
///
/// Built via [`RetryOnError::blocking`](crate::RetryOnError::blocking),
/// which validates the configuration for a blocking context first.
pub struct RetryOnError<T, E> {
    core: Core<T, E>,
}

impl<T, E> RetryOnError<T, E> {
    pub(crate) fn from_core(core: Core<T, E>) -> Self {
        Self { core }
    }
}

impl<T, E> RetryOnError<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + Display + 'static,
{
    /// Invokes `op` on the calling thread until it succeeds, a give-up
    /// condition fires, or a budget is exhausted. Waits block the thread.
    pub fn call<F>(&self, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.core.drive_blocking(op)
    }
}

impl<T, E> Clone for RetryOnError<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

/// Blocking counterpart of [`crate::RetryOnValue`].
pub struct RetryOnValue<T> {
    core: Core<T, Infallible>,
}

impl<T> RetryOnValue<T> {
    pub(crate) fn from_core(core: Core<T, Infallible>) -> Self {
        Self { core }
    }
}

impl<T> RetryOnValue<T>
where
    T: Send + Sync + 'static,
{
    /// Invokes `op` on the calling thread until its value stops satisfying
    /// the retry predicate or a budget is exhausted; a give-up returns the
    /// last pending value.
    pub fn call<F>(&self, mut op: F) -> T
    where
        F: FnMut() -> T,
    {
        match self.core.drive_blocking(|| Ok(op())) {
            Ok(value) => value,
            Err(err) => match err.into_inner() {},
        }
    }
}

impl<T> Clone for RetryOnValue<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{Jitter, WaitSchedule};
    use crate::RetryOnError as AsyncRetryOnError;
    use crate::RetryOnValue as AsyncRetryOnValue;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_blocking_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let backoffs = Arc::new(AtomicU32::new(0));
        let b = Arc::clone(&backoffs);

        let retry = AsyncRetryOnError::new(WaitSchedule::constant(Duration::from_millis(1)))
            .max_tries(5u32)
            .jitter(Jitter::None)
            .logging(false)
            .on_backoff(move |_| {
                b.fetch_add(1, Ordering::SeqCst);
            })
            .blocking()
            .unwrap();

        let c = Arc::clone(&calls);
        let out = retry.call(move || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err("transient")
            } else {
                Ok("ok")
            }
        });
        assert_eq!(out.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(backoffs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_blocking_gives_up_with_last_error() {
        let retry: RetryOnError<u32, &str> =
            AsyncRetryOnError::new(WaitSchedule::constant(Duration::from_millis(1)))
                .max_tries(3u32)
                .jitter(Jitter::None)
                .logging(false)
                .blocking()
                .unwrap();

        let out = retry.call(|| Err("still down"));
        match out {
            Err(RetryError::GiveUp { tries: 3, error, .. }) => assert_eq!(error, "still down"),
            other => panic!("expected give-up, got {other:?}"),
        }
    }

    #[test]
    fn test_blocking_value_mode_polls_until_ready() {
        let calls = Arc::new(AtomicU32::new(0));
        let retry = AsyncRetryOnValue::new(
            WaitSchedule::constant(Duration::from_millis(1)),
            |v: &Option<u32>| v.is_none(),
        )
        .jitter(Jitter::None)
        .logging(false)
        .blocking()
        .unwrap();

        let c = Arc::clone(&calls);
        let out = retry.call(move || {
            let n = c.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                None
            } else {
                Some(9)
            }
        });
        assert_eq!(out, Some(9));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_suspending_observer_rejected_at_decoration_time() {
        struct Noop;

        #[async_trait]
        impl crate::Observer<u32, &'static str> for Noop {
            async fn on_event(&self, _event: &Event<'_, u32, &'static str>) {}
        }

        let result = AsyncRetryOnError::<u32, &'static str>::new(WaitSchedule::expo())
            .observe_backoff(Noop)
            .blocking();
        match result {
            Err(err) => assert_eq!(err.as_label(), "config_suspending_observer"),
            Ok(_) => panic!("suspending observer must be rejected"),
        }
    }

    #[test]
    fn test_blocking_permanent_error_propagates() {
        let retry: RetryOnError<u32, &str> = AsyncRetryOnError::new(WaitSchedule::expo())
            .retry_if(|e: &&str| *e == "transient")
            .logging(false)
            .blocking()
            .unwrap();

        let out = retry.call(|| Err("denied"));
        assert!(matches!(
            out,
            Err(RetryError::Permanent {
                tries: 1,
                error: "denied"
            })
        ));
    }
}
