//! # Trigger classification: is this attempt outcome retryable?
//!
//! [`Classifier`] has two variants, selected when the policy is constructed
//! (no runtime type inspection):
//!
//! - **error-triggered**: an `Err` is retryable iff the configured match
//!   predicate accepts it; any other `Err` is fatal and propagates
//!   immediately without firing handlers;
//! - **value-triggered**: a returned value is retryable iff the configured
//!   predicate returns true for it; otherwise it is the final success value.
//!
//! The give-up override (error mode only) is evaluated against the
//! triggering value after an attempt is classified retryable; when it returns
//! true the loop stops at once, regardless of remaining budget.

use std::sync::Arc;

/// Shared predicate over a borrowed value.
pub(crate) type Pred<X> = Arc<dyn Fn(&X) -> bool + Send + Sync>;

/// The value that triggered a retry: a matching error or a pending result.
#[derive(Debug)]
pub(crate) enum Cause<T, E> {
    Error(E),
    Value(T),
}

/// Classified outcome of a single attempt.
pub(crate) enum Attempt<T, E> {
    /// Final success value (also covers a pending value that no longer
    /// satisfies the retry trigger).
    Resolved(T),
    /// Non-matching error; propagates immediately, no handlers fire.
    Fatal(E),
    /// Retry is warranted, pending give-up/limit evaluation.
    Retryable(Cause<T, E>),
}

pub(crate) enum Classifier<T, E> {
    /// Retry on matching errors.
    OnError {
        /// Membership test for the configured error set. Defaults to
        /// accepting every error.
        matches: Pred<E>,
        /// Optional short-circuit: stop retrying when true.
        giveup: Option<Pred<E>>,
    },
    /// Retry while the returned value satisfies the predicate.
    OnValue { retry_when: Pred<T> },
}

impl<T, E> Classifier<T, E> {
    pub fn classify(&self, outcome: Result<T, E>) -> Attempt<T, E> {
        match (self, outcome) {
            (Classifier::OnError { matches, .. }, Err(e)) => {
                if matches(&e) {
                    Attempt::Retryable(Cause::Error(e))
                } else {
                    Attempt::Fatal(e)
                }
            }
            (Classifier::OnError { .. }, Ok(v)) => Attempt::Resolved(v),
            (Classifier::OnValue { retry_when }, Ok(v)) => {
                if retry_when(&v) {
                    Attempt::Retryable(Cause::Value(v))
                } else {
                    Attempt::Resolved(v)
                }
            }
            // Value-triggered policies wrap infallible operations; an Err
            // cannot be constructed by their drivers.
            (Classifier::OnValue { .. }, Err(e)) => Attempt::Fatal(e),
        }
    }

    /// Evaluates the give-up override against the triggering value.
    pub fn wants_giveup(&self, cause: &Cause<T, E>) -> bool {
        match (self, cause) {
            (Classifier::OnError { giveup: Some(g), .. }, Cause::Error(e)) => g(e),
            _ => false,
        }
    }
}

impl<T, E> Clone for Classifier<T, E> {
    fn clone(&self) -> Self {
        match self {
            Classifier::OnError { matches, giveup } => Classifier::OnError {
                matches: Arc::clone(matches),
                giveup: giveup.as_ref().map(Arc::clone),
            },
            Classifier::OnValue { retry_when } => Classifier::OnValue {
                retry_when: Arc::clone(retry_when),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_error(
        matches: impl Fn(&&str) -> bool + Send + Sync + 'static,
    ) -> Classifier<u32, &'static str> {
        Classifier::OnError {
            matches: Arc::new(matches),
            giveup: None,
        }
    }

    #[test]
    fn test_matching_error_is_retryable() {
        let c = on_error(|e| e.starts_with("transient"));
        match c.classify(Err("transient: timeout")) {
            Attempt::Retryable(Cause::Error(e)) => assert_eq!(e, "transient: timeout"),
            _ => panic!("expected retryable"),
        }
    }

    #[test]
    fn test_non_matching_error_is_fatal() {
        let c = on_error(|e| e.starts_with("transient"));
        assert!(matches!(c.classify(Err("denied")), Attempt::Fatal("denied")));
    }

    #[test]
    fn test_ok_resolves_in_error_mode() {
        let c = on_error(|_| true);
        assert!(matches!(c.classify(Ok(7)), Attempt::Resolved(7)));
    }

    #[test]
    fn test_value_predicate_marks_pending() {
        let c: Classifier<Option<u32>, std::convert::Infallible> = Classifier::OnValue {
            retry_when: Arc::new(|v: &Option<u32>| v.is_none()),
        };
        assert!(matches!(
            c.classify(Ok(None)),
            Attempt::Retryable(Cause::Value(None))
        ));
        assert!(matches!(c.classify(Ok(Some(3))), Attempt::Resolved(Some(3))));
    }

    #[test]
    fn test_giveup_override_consults_trigger() {
        let c: Classifier<u32, &'static str> = Classifier::OnError {
            matches: Arc::new(|_| true),
            giveup: Some(Arc::new(|e: &&str| *e == "quota")),
        };
        assert!(c.wants_giveup(&Cause::Error("quota")));
        assert!(!c.wants_giveup(&Cause::Error("timeout")));
    }
}
