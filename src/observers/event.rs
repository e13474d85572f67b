//! # Lifecycle events passed to observers.
//!
//! The [`EventKind`] enum classifies the three phase transitions that fire
//! handlers; the [`Event`] struct is the snapshot handed to every handler of
//! that phase, in registration order.
//!
//! Events are **informational only**: handlers never feed back into limit or
//! loop decisions. The snapshot borrows from the in-flight invocation, so it
//! carries typed references to the triggering error or value rather than
//! stringified copies.
//!
//! Field population by phase:
//! - `Success`: `tries`, `elapsed`, `value` (the final value)
//! - `Backoff`: `tries`, `elapsed`, `wait`, and the triggering `error` or `value`
//! - `GiveUp`:  `tries`, `elapsed`, and the triggering `error` or `value`

use std::time::Duration;

/// Phase transition that fires observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The wrapped operation produced its final value.
    ///
    /// Sets:
    /// - `tries`: attempts made, including the successful one
    /// - `elapsed`: time since the first attempt
    /// - `value`: the final value
    Success,

    /// A retry was scheduled; fired before the wait is slept.
    ///
    /// Sets:
    /// - `tries`: attempts made so far
    /// - `elapsed`: time since the first attempt
    /// - `wait`: the jittered wait about to be applied
    /// - `error` / `value`: the triggering error or pending value
    Backoff,

    /// Retrying stopped before success (limit, give-up predicate, or
    /// generator exhaustion).
    ///
    /// Sets:
    /// - `tries`: attempts made in total
    /// - `elapsed`: time since the first attempt
    /// - `error` / `value`: the last triggering error or pending value
    GiveUp,
}

/// Snapshot passed to observers at a phase transition.
#[derive(Debug)]
pub struct Event<'a, T, E> {
    /// Identity of the wrapped operation (the policy name).
    pub target: &'a str,
    /// Phase classification.
    pub kind: EventKind,
    /// Attempts made so far (1-based after the first attempt).
    pub tries: u32,
    /// Time since the first attempt of this invocation.
    pub elapsed: Duration,
    /// Jittered wait about to be applied (backoff phase only).
    pub wait: Option<Duration>,
    /// Triggering error, when the phase was caused by one.
    pub error: Option<&'a E>,
    /// Triggering pending value, or the final value on success.
    pub value: Option<&'a T>,
}

impl<'a, T, E> Event<'a, T, E> {
    pub(crate) fn new(target: &'a str, kind: EventKind, tries: u32, elapsed: Duration) -> Self {
        Self {
            target,
            kind,
            tries,
            elapsed,
            wait: None,
            error: None,
            value: None,
        }
    }

    pub(crate) fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = Some(wait);
        self
    }

    pub(crate) fn with_error(mut self, error: &'a E) -> Self {
        self.error = Some(error);
        self
    }

    pub(crate) fn with_value(mut self, value: &'a T) -> Self {
        self.value = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_populate_phase_fields() {
        let err = "boom";
        let ev: Event<'_, u32, &str> =
            Event::new("demo", EventKind::Backoff, 2, Duration::from_millis(30))
                .with_wait(Duration::from_millis(10))
                .with_error(&err);

        assert_eq!(ev.target, "demo");
        assert_eq!(ev.kind, EventKind::Backoff);
        assert_eq!(ev.tries, 2);
        assert_eq!(ev.wait, Some(Duration::from_millis(10)));
        assert_eq!(ev.error, Some(&"boom"));
        assert!(ev.value.is_none());
    }
}
