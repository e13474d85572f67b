//! # Retry policies and the cooperative execution driver.
//!
//! Two policy kinds mirror the two trigger modes, selected at construction
//! time:
//!
//! - [`RetryOnError`] — re-invoke while the operation returns a **matching
//!   error**; a non-matching error propagates immediately.
//! - [`RetryOnValue`] — re-invoke while the operation's **returned value**
//!   satisfies a predicate (polling for eventual state).
//!
//! A policy is immutable once built. Every invocation gets its own loop
//! state and a fresh wait sequence, so concurrent invocations of the same
//! policy are fully independent.
//!
//! ## Event flow
//! For each invocation, the driver emits:
//! ```text
//! [attempt] → success        → on_success (terminal)
//!           → fatal error    → (no events, terminal)
//!           → retryable      → give-up?   → on_giveup (terminal)
//!                            → backoff    → on_backoff → [sleep] → next attempt
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use reattempt::{Jitter, RetryOnError, WaitSchedule};
//!
//! # #[derive(Debug, thiserror::Error)]
//! # #[error("transient")]
//! # struct Transient;
//! # async fn flaky() -> Result<u32, Transient> { Ok(7) }
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let retry = RetryOnError::new(WaitSchedule::expo_with(
//!         Duration::from_millis(100),
//!         2.0,
//!         Some(Duration::from_secs(10)),
//!     ))
//!     .max_tries(5u32)
//!     .jitter(Jitter::Full)
//!     .name("fetch");
//!
//! let value = retry.run(|| flaky()).await?;
//! assert_eq!(value, 7);
//! # Ok(())
//! # }
//! ```

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{Engine, Next, Sleeper, TokioSleeper, WaitSource};
use crate::error::{ConfigError, RetryError};
use crate::observers::{Event, EventKind, Handler, HandlerSet, LogConfig, Observer};
use crate::policies::{Jitter, Limits, WaitSchedule};
use crate::resolve::Resolvable;
use crate::trigger::{Cause, Classifier};

/// Configuration shared by both policy kinds and both execution drivers.
pub(crate) struct Core<T, E> {
    pub name: Arc<str>,
    pub wait: WaitSource<T, E>,
    pub jitter: Jitter,
    pub limits: Limits,
    pub classifier: Classifier<T, E>,
    pub on_success: HandlerSet<T, E>,
    pub on_backoff: HandlerSet<T, E>,
    pub on_giveup: HandlerSet<T, E>,
    pub log: LogConfig,
    pub sleeper: Arc<dyn Sleeper>,
}

impl<T, E> Core<T, E> {
    fn new(wait: WaitSource<T, E>, classifier: Classifier<T, E>) -> Self {
        Self {
            name: Arc::from("retry"),
            wait,
            jitter: Jitter::default(),
            limits: Limits::default(),
            classifier,
            on_success: HandlerSet::new(),
            on_backoff: HandlerSet::new(),
            on_giveup: HandlerSet::new(),
            log: LogConfig::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub(crate) fn engine(&self) -> Engine<T, E> {
        Engine::new(
            self.classifier.clone(),
            &self.wait,
            self.jitter.clone(),
            self.limits.resolve(),
        )
    }

    /// Rejects configurations a blocking context cannot honor.
    pub(crate) fn check_blocking(&self) -> Result<(), ConfigError> {
        for (phase, set) in [
            ("on_success", &self.on_success),
            ("on_backoff", &self.on_backoff),
            ("on_giveup", &self.on_giveup),
        ] {
            if set.has_suspending() {
                return Err(ConfigError::SuspendingObserver { phase });
            }
        }
        Ok(())
    }
}

impl<T, E> Clone for Core<T, E> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            wait: self.wait.clone(),
            jitter: self.jitter.clone(),
            limits: self.limits.clone(),
            classifier: self.classifier.clone(),
            on_success: self.on_success.clone(),
            on_backoff: self.on_backoff.clone(),
            on_giveup: self.on_giveup.clone(),
            log: self.log.clone(),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<T, E> Core<T, E>
where
    E: Display,
{
    /// The cooperative retry loop, shared by both policy kinds.
    ///
    /// Value-triggered policies wrap their infallible operations into
    /// `Result<T, Infallible>` and unwrap the impossible error afterwards.
    pub(crate) async fn drive<F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut engine = self.engine();
        loop {
            engine.begin_attempt();
            let outcome = op().await;

            match engine.decide(outcome) {
                Next::Done(value) => {
                    let event =
                        Event::new(&self.name, EventKind::Success, engine.tries(), engine.elapsed())
                            .with_value(&value);
                    self.on_success.notify(&event).await;
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
                            self.on_giveup.notify(&event.with_error(&error)).await;
                            return Err(RetryError::GiveUp {
                                tries,
                                elapsed,
                                error,
                            });
                        }
                        Cause::Value(value) => {
                            self.log.giveup(&self.name, tries, elapsed, None);
                            self.on_giveup.notify(&event.with_value(&value)).await;
                            // Value-triggered give-up returns the last
                            // pending value; this mode never fails.
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
                            self.on_backoff.notify(&event.with_error(error)).await;
                        }
                        Cause::Value(value) => {
                            self.log.backoff(&self.name, tries, wait, None);
                            self.on_backoff.notify(&event.with_value(value)).await;
                        }
                    }
                    self.sleeper.sleep(wait).await;
                }
            }
        }
    }
}

/// Retry while the wrapped operation returns a **matching error**.
///
/// By default every error matches; narrow the set with
/// [`retry_if`](Self::retry_if) and short-circuit with
/// [`giveup_if`](Self::giveup_if). A non-matching error is surfaced
/// immediately as [`RetryError::Permanent`] without firing any handlers.
pub struct RetryOnError<T, E> {
    core: Core<T, E>,
}

impl<T, E> RetryOnError<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Policy pulling waits from `schedule` (a fresh sequence per invocation).
    pub fn new(schedule: WaitSchedule) -> Self {
        Self {
            core: Core::new(
                WaitSource::Schedule(schedule),
                Classifier::OnError {
                    matches: Arc::new(|_| true),
                    giveup: None,
                },
            ),
        }
    }

    /// Runtime-directed policy: the wait is derived from the most recent
    /// triggering error instead of a sequence (e.g. a `Retry-After` value
    /// carried by the error). Consider pairing with [`Jitter::None`].
    pub fn runtime<W>(extract: W) -> Self
    where
        W: Fn(&E) -> Duration + Send + Sync + 'static,
    {
        Self {
            core: Core::new(
                WaitSource::Runtime(Arc::new(move |cause| match cause {
                    Cause::Error(e) => extract(e),
                    // Error-triggered loops never produce value causes.
                    Cause::Value(_) => Duration::ZERO,
                })),
                Classifier::OnError {
                    matches: Arc::new(|_| true),
                    giveup: None,
                },
            ),
        }
    }

    /// Restricts the retryable error set. Errors rejected by `matches`
    /// propagate immediately.
    pub fn retry_if<F>(mut self, matches: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        if let Classifier::OnError { matches: m, .. } = &mut self.core.classifier {
            *m = Arc::new(matches);
        }
        self
    }

    /// Stops retrying as soon as `giveup` returns true for a matching error,
    /// regardless of remaining try/time budget.
    pub fn giveup_if<F>(mut self, giveup: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        if let Classifier::OnError { giveup: g, .. } = &mut self.core.classifier {
            *g = Some(Arc::new(giveup));
        }
        self
    }

    /// Maximum number of attempts (literal or per-invocation supplier).
    pub fn max_tries(mut self, max_tries: impl Into<Resolvable<u32>>) -> Self {
        self.core.limits.max_tries = Some(max_tries.into());
        self
    }

    /// Maximum elapsed time since the first attempt (literal or supplier).
    /// Evaluated between attempts only; it cannot interrupt an attempt.
    pub fn max_time(mut self, max_time: impl Into<Resolvable<Duration>>) -> Self {
        self.core.limits.max_time = Some(max_time.into());
        self
    }

    /// Jitter applied to each raw wait. Defaults to [`Jitter::Full`].
    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.core.jitter = jitter;
        self
    }

    /// Target identity reported in events and logs.
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.core.name = name.into();
        self
    }

    /// Enables or disables the default `tracing` wiring (enabled by default).
    pub fn logging(mut self, enabled: bool) -> Self {
        self.core.log.enabled = enabled;
        self
    }

    /// Severity of backoff log records (default `INFO`).
    pub fn backoff_log_level(mut self, level: tracing::Level) -> Self {
        self.core.log.backoff_level = level;
        self
    }

    /// Severity of give-up log records (default `ERROR`).
    pub fn giveup_log_level(mut self, level: tracing::Level) -> Self {
        self.core.log.giveup_level = level;
        self
    }

    /// Appends an ordinary handler to the success phase.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<'_, T, E>) + Send + Sync + 'static,
    {
        self.core.on_success.push(Handler::call(f));
        self
    }

    /// Appends an ordinary handler to the backoff phase.
    pub fn on_backoff<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<'_, T, E>) + Send + Sync + 'static,
    {
        self.core.on_backoff.push(Handler::call(f));
        self
    }

    /// Appends an ordinary handler to the give-up phase.
    pub fn on_giveup<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<'_, T, E>) + Send + Sync + 'static,
    {
        self.core.on_giveup.push(Handler::call(f));
        self
    }

    /// Appends a suspending observer to the success phase.
    pub fn observe_success<O>(mut self, observer: O) -> Self
    where
        O: Observer<T, E> + 'static,
    {
        self.core.on_success.push(Handler::suspend(observer));
        self
    }

    /// Appends a suspending observer to the backoff phase.
    pub fn observe_backoff<O>(mut self, observer: O) -> Self
    where
        O: Observer<T, E> + 'static,
    {
        self.core.on_backoff.push(Handler::suspend(observer));
        self
    }

    /// Appends a suspending observer to the give-up phase.
    pub fn observe_giveup<O>(mut self, observer: O) -> Self
    where
        O: Observer<T, E> + 'static,
    {
        self.core.on_giveup.push(Handler::suspend(observer));
        self
    }

    /// Substitutes the suspension point used for waits.
    pub fn sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.core.sleeper = Arc::new(sleeper);
        self
    }

    /// Finalizes for a blocking context.
    ///
    /// Fails at decoration time when a suspending observer was registered;
    /// a blocking loop has no way to await it.
    pub fn blocking(self) -> Result<crate::blocking::RetryOnError<T, E>, ConfigError> {
        self.core.check_blocking()?;
        Ok(crate::blocking::RetryOnError::from_core(self.core))
    }
}

impl<T, E> RetryOnError<T, E>
where
    T: Send + Sync + 'static,
    E: Send + Sync + Display + 'static,
{
    /// Invokes `op` until it succeeds, a give-up condition fires, or a
    /// budget is exhausted. Each invocation is independent: fresh loop
    /// state, fresh wait sequence.
    ///
    /// Cancellation is dropping the returned future (for instance losing a
    /// `tokio::select!` race); dropping during a wait unwinds without firing
    /// further handlers.
    pub async fn run<F, Fut>(&self, op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.core.drive(op).await
    }
}

impl<T, E> Clone for RetryOnError<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

/// Retry while the wrapped operation's **returned value** satisfies a
/// predicate — polling for externally generated state.
///
/// This mode never fails: when a give-up condition fires, the last pending
/// value is returned as-is.
pub struct RetryOnValue<T> {
    core: Core<T, Infallible>,
}

impl<T> RetryOnValue<T>
where
    T: Send + Sync + 'static,
{
    /// Policy pulling waits from `schedule`, retrying while `retry_when`
    /// holds for the returned value.
    pub fn new<P>(schedule: WaitSchedule, retry_when: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            core: Core::new(
                WaitSource::Schedule(schedule),
                Classifier::OnValue {
                    retry_when: Arc::new(retry_when),
                },
            ),
        }
    }

    /// Runtime-directed polling: the wait is derived from the most recent
    /// pending value (e.g. a `Retry-After` response header). Consider
    /// pairing with [`Jitter::None`].
    pub fn runtime<W, P>(extract: W, retry_when: P) -> Self
    where
        W: Fn(&T) -> Duration + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            core: Core::new(
                WaitSource::Runtime(Arc::new(move |cause| match cause {
                    Cause::Value(v) => extract(v),
                    Cause::Error(e) => match *e {},
                })),
                Classifier::OnValue {
                    retry_when: Arc::new(retry_when),
                },
            ),
        }
    }

    /// Maximum number of attempts (literal or per-invocation supplier).
    pub fn max_tries(mut self, max_tries: impl Into<Resolvable<u32>>) -> Self {
        self.core.limits.max_tries = Some(max_tries.into());
        self
    }

    /// Maximum elapsed time since the first attempt (literal or supplier).
    pub fn max_time(mut self, max_time: impl Into<Resolvable<Duration>>) -> Self {
        self.core.limits.max_time = Some(max_time.into());
        self
    }

    /// Jitter applied to each raw wait. Defaults to [`Jitter::Full`].
    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.core.jitter = jitter;
        self
    }

    /// Target identity reported in events and logs.
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.core.name = name.into();
        self
    }

    /// Enables or disables the default `tracing` wiring (enabled by default).
    pub fn logging(mut self, enabled: bool) -> Self {
        self.core.log.enabled = enabled;
        self
    }

    /// Severity of backoff log records (default `INFO`).
    pub fn backoff_log_level(mut self, level: tracing::Level) -> Self {
        self.core.log.backoff_level = level;
        self
    }

    /// Severity of give-up log records (default `ERROR`).
    pub fn giveup_log_level(mut self, level: tracing::Level) -> Self {
        self.core.log.giveup_level = level;
        self
    }

    /// Appends an ordinary handler to the success phase.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<'_, T, Infallible>) + Send + Sync + 'static,
    {
        self.core.on_success.push(Handler::call(f));
        self
    }

    /// Appends an ordinary handler to the backoff phase.
    pub fn on_backoff<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<'_, T, Infallible>) + Send + Sync + 'static,
    {
        self.core.on_backoff.push(Handler::call(f));
        self
    }

    /// Appends an ordinary handler to the give-up phase.
    pub fn on_giveup<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<'_, T, Infallible>) + Send + Sync + 'static,
    {
        self.core.on_giveup.push(Handler::call(f));
        self
    }

    /// Appends a suspending observer to the success phase.
    pub fn observe_success<O>(mut self, observer: O) -> Self
    where
        O: Observer<T, Infallible> + 'static,
    {
        self.core.on_success.push(Handler::suspend(observer));
        self
    }

    /// Appends a suspending observer to the backoff phase.
    pub fn observe_backoff<O>(mut self, observer: O) -> Self
    where
        O: Observer<T, Infallible> + 'static,
    {
        self.core.on_backoff.push(Handler::suspend(observer));
        self
    }

    /// Appends a suspending observer to the give-up phase.
    pub fn observe_giveup<O>(mut self, observer: O) -> Self
    where
        O: Observer<T, Infallible> + 'static,
    {
        self.core.on_giveup.push(Handler::suspend(observer));
        self
    }

    /// Substitutes the suspension point used for waits.
    pub fn sleeper<S>(mut self, sleeper: S) -> Self
    where
        S: Sleeper + 'static,
    {
        self.core.sleeper = Arc::new(sleeper);
        self
    }

    /// Finalizes for a blocking context; fails at decoration time when a
    /// suspending observer was registered.
    pub fn blocking(self) -> Result<crate::blocking::RetryOnValue<T>, ConfigError> {
        self.core.check_blocking()?;
        Ok(crate::blocking::RetryOnValue::from_core(self.core))
    }

    /// Invokes `op` until its value stops satisfying the retry predicate or
    /// a budget is exhausted; a give-up returns the last pending value.
    pub async fn run<F, Fut>(&self, mut op: F) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        match self.core.drive(|| infallible(op())).await {
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

async fn infallible<T>(fut: impl Future<Output = T>) -> Result<T, Infallible> {
    Ok(fut.await)
}
