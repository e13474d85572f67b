//! # The retry-loop state machine.
//!
//! [`Engine`] is the per-invocation loop state: try count, start timestamp,
//! the freshly instantiated wait sequence, and the resolved limits. It is
//! **pure** — it never sleeps, never invokes the wrapped operation, and never
//! dispatches events. The execution drivers own those effects and ask the
//! engine what to do next:
//!
//! ```text
//! driver loop {
//!   ├─► engine.begin_attempt()         (tries += 1, start timestamp on first)
//!   ├─► outcome = invoke wrapped op    (driver: sync call or await)
//!   └─► match engine.decide(outcome) {
//!         Done(v)              → fire on_success, return v
//!         Fatal(e)             → return error, no events
//!         GiveUp(cause)        → fire on_giveup, surface cause
//!         Backoff{wait, cause} → fire on_backoff, sleep(wait), loop
//!       }
//! }
//! ```
//!
//! Keeping the machine pure is what lets the blocking and cooperative
//! drivers share every transition rule, and what makes the transitions
//! testable without timers.
//!
//! ## Rules
//! - Attempts run **sequentially** within one invocation.
//! - The try counter increments before each attempt and never resets.
//! - The wait sequence is owned by this invocation alone; the cursor
//!   advances exactly once per backoff.
//! - Give-up evaluation order: give-up predicate, then try budget (no wait
//!   is computed when it alone stops the loop), then the time budget against
//!   the projected elapsed-after-wait.
//! - A sequence that runs out of values while still under budget is an
//!   immediate give-up, consistent with limit exhaustion.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::policies::{BoxWaitSeq, Jitter, ResolvedLimits, WaitSchedule};
use crate::trigger::{Attempt, Cause, Classifier};

/// How waits are produced: a sequence pulled per backoff, or an extractor
/// applied to the most recent triggering value (runtime-directed).
pub(crate) enum WaitSource<T, E> {
    Schedule(WaitSchedule),
    Runtime(Arc<dyn Fn(&Cause<T, E>) -> Duration + Send + Sync>),
}

impl<T, E> Clone for WaitSource<T, E> {
    fn clone(&self) -> Self {
        match self {
            WaitSource::Schedule(s) => WaitSource::Schedule(s.clone()),
            WaitSource::Runtime(f) => WaitSource::Runtime(Arc::clone(f)),
        }
    }
}

/// Per-invocation instantiation of a [`WaitSource`].
enum WaitState<T, E> {
    Seq(BoxWaitSeq),
    Runtime(Arc<dyn Fn(&Cause<T, E>) -> Duration + Send + Sync>),
}

/// Instruction for the driver after one classified attempt.
pub(crate) enum Next<T, E> {
    /// Terminal success; fire `on_success` and return the value.
    Done(T),
    /// Non-matching error; return immediately, no events.
    Fatal(E),
    /// Terminal give-up; fire `on_giveup` and surface the cause.
    GiveUp(Cause<T, E>),
    /// Fire `on_backoff`, sleep `wait`, then loop.
    Backoff { wait: Duration, cause: Cause<T, E> },
}

/// Mutable state scoped to one invocation of a wrapped operation.
pub(crate) struct Engine<T, E> {
    classifier: Classifier<T, E>,
    wait: WaitState<T, E>,
    jitter: Jitter,
    limits: ResolvedLimits,
    tries: u32,
    started: Option<Instant>,
}

impl<T, E> Engine<T, E> {
    pub fn new(
        classifier: Classifier<T, E>,
        wait: &WaitSource<T, E>,
        jitter: Jitter,
        limits: ResolvedLimits,
    ) -> Self {
        let wait = match wait {
            WaitSource::Schedule(s) => WaitState::Seq(s.sequence()),
            WaitSource::Runtime(f) => WaitState::Runtime(Arc::clone(f)),
        };
        Self {
            classifier,
            wait,
            jitter,
            limits,
            tries: 0,
            started: None,
        }
    }

    /// Increments the try counter and records the start timestamp on the
    /// first attempt. Returns the attempt number (1-based).
    pub fn begin_attempt(&mut self) -> u32 {
        self.started.get_or_insert_with(Instant::now);
        self.tries += 1;
        self.tries
    }

    /// Attempts made so far.
    pub fn tries(&self) -> u32 {
        self.tries
    }

    /// Time since the first attempt of this invocation.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Classifies an attempt outcome and evaluates give-up, limits, the next
    /// wait, and jitter, in that order.
    pub fn decide(&mut self, outcome: Result<T, E>) -> Next<T, E> {
        let cause = match self.classifier.classify(outcome) {
            Attempt::Resolved(v) => return Next::Done(v),
            Attempt::Fatal(e) => return Next::Fatal(e),
            Attempt::Retryable(cause) => cause,
        };

        if self.classifier.wants_giveup(&cause) {
            return Next::GiveUp(cause);
        }
        if self.limits.tries_exhausted(self.tries) {
            return Next::GiveUp(cause);
        }

        let raw = match &mut self.wait {
            WaitState::Seq(seq) => match seq.next() {
                Some(raw) => raw,
                None => return Next::GiveUp(cause),
            },
            WaitState::Runtime(extract) => extract(&cause),
        };

        let wait = self.jitter.apply(raw);
        if self.limits.time_exhausted(self.elapsed(), wait) {
            return Next::GiveUp(cause);
        }
        Next::Backoff { wait, cause }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::Limits;
    use crate::resolve::Resolvable;

    type E = &'static str;

    fn retry_all() -> Classifier<u32, E> {
        Classifier::OnError {
            matches: Arc::new(|_| true),
            giveup: None,
        }
    }

    fn engine(
        classifier: Classifier<u32, E>,
        wait: WaitSource<u32, E>,
        max_tries: Option<u32>,
        max_time: Option<Duration>,
    ) -> Engine<u32, E> {
        let limits = Limits {
            max_tries: max_tries.map(Resolvable::Literal),
            max_time: max_time.map(Resolvable::Literal),
        };
        Engine::new(classifier, &wait, Jitter::None, limits.resolve())
    }

    fn constant(ms: u64) -> WaitSource<u32, E> {
        WaitSource::Schedule(WaitSchedule::constant(Duration::from_millis(ms)))
    }

    #[test]
    fn test_success_is_terminal() {
        let mut eng = engine(retry_all(), constant(1), None, None);
        eng.begin_attempt();
        assert!(matches!(eng.decide(Ok(42)), Next::Done(42)));
    }

    #[test]
    fn test_non_matching_error_is_fatal() {
        let classifier = Classifier::OnError {
            matches: Arc::new(|e: &E| *e != "denied"),
            giveup: None,
        };
        let mut eng = engine(classifier, constant(1), None, None);
        eng.begin_attempt();
        assert!(matches!(eng.decide(Err("denied")), Next::Fatal("denied")));
    }

    #[test]
    fn test_retryable_schedules_backoff_with_sequence_value() {
        let mut eng = engine(retry_all(), constant(25), Some(5), None);
        eng.begin_attempt();
        match eng.decide(Err("boom")) {
            Next::Backoff { wait, .. } => assert_eq!(wait, Duration::from_millis(25)),
            _ => panic!("expected backoff"),
        }
    }

    #[test]
    fn test_try_budget_stops_without_pulling_a_wait() {
        // A sequence that panics when pulled proves the tie-break: the try
        // limit must be evaluated first.
        let wait = WaitSource::Schedule(WaitSchedule::from_fn(|| {
            std::iter::from_fn(|| -> Option<Duration> { panic!("wait pulled past budget") })
        }));
        let mut eng = engine(retry_all(), wait, Some(1), None);
        eng.begin_attempt();
        assert!(matches!(eng.decide(Err("boom")), Next::GiveUp(_)));
    }

    #[test]
    fn test_projected_time_budget_stops_before_sleeping() {
        let mut eng = engine(
            retry_all(),
            constant(10_000),
            None,
            Some(Duration::from_secs(1)),
        );
        eng.begin_attempt();
        // 10s wait projected against a 1s budget.
        assert!(matches!(eng.decide(Err("boom")), Next::GiveUp(_)));
    }

    #[test]
    fn test_giveup_predicate_short_circuits_budgets() {
        let classifier = Classifier::OnError {
            matches: Arc::new(|_| true),
            giveup: Some(Arc::new(|e: &E| *e == "quota")),
        };
        let mut eng = engine(classifier, constant(1), Some(100), None);
        eng.begin_attempt();
        assert!(matches!(eng.decide(Err("quota")), Next::GiveUp(_)));
    }

    #[test]
    fn test_sequence_exhaustion_is_giveup() {
        let wait = WaitSource::Schedule(WaitSchedule::from_fn(|| {
            std::iter::once(Duration::from_millis(1))
        }));
        let mut eng = engine(retry_all(), wait, None, None);

        eng.begin_attempt();
        assert!(matches!(eng.decide(Err("a")), Next::Backoff { .. }));
        eng.begin_attempt();
        assert!(matches!(eng.decide(Err("b")), Next::GiveUp(_)));
    }

    #[test]
    fn test_runtime_wait_extracts_from_trigger() {
        let wait: WaitSource<u32, E> = WaitSource::Runtime(Arc::new(|cause| match cause {
            Cause::Error(e) => Duration::from_secs(e.len() as u64),
            Cause::Value(_) => Duration::ZERO,
        }));
        let mut eng = engine(retry_all(), wait, None, None);
        eng.begin_attempt();
        match eng.decide(Err("four")) {
            Next::Backoff { wait, .. } => assert_eq!(wait, Duration::from_secs(4)),
            _ => panic!("expected backoff"),
        }
    }

    #[test]
    fn test_tries_increment_monotonically() {
        let mut eng = engine(retry_all(), constant(1), None, None);
        assert_eq!(eng.tries(), 0);
        assert_eq!(eng.begin_attempt(), 1);
        assert_eq!(eng.begin_attempt(), 2);
        assert_eq!(eng.tries(), 2);
    }

    #[test]
    fn test_pending_value_retries_until_predicate_clears() {
        let classifier: Classifier<u32, std::convert::Infallible> = Classifier::OnValue {
            retry_when: Arc::new(|v: &u32| *v == 0),
        };
        let limits = Limits::default();
        let wait = WaitSource::Schedule(WaitSchedule::constant(Duration::from_millis(1)));
        let mut eng = Engine::new(classifier, &wait, Jitter::None, limits.resolve());

        eng.begin_attempt();
        assert!(matches!(
            eng.decide(Ok(0)),
            Next::Backoff {
                cause: Cause::Value(0),
                ..
            }
        ));
        eng.begin_attempt();
        assert!(matches!(eng.decide(Ok(9)), Next::Done(9)));
    }
}
