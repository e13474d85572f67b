//! # Limit evaluation: try and time budgets.
//!
//! [`Limits`] holds the configured budgets, either as literals or as
//! per-invocation suppliers ([`Resolvable`]). The engine resolves them once
//! per invocation into [`ResolvedLimits`] before the loop starts.
//!
//! Evaluation order (tie-break) after an attempt is classified retryable:
//! 1. the try budget — if `max_tries` is reached, stop without computing a wait;
//! 2. the time budget — with the jittered wait in hand, stop if the projected
//!    elapsed time after the wait would exceed `max_time`.
//!
//! An absent budget never forces a stop on that axis.

use std::time::Duration;

use crate::resolve::Resolvable;

/// Configured try/time budgets.
#[derive(Clone, Debug, Default)]
pub(crate) struct Limits {
    /// Maximum number of attempts, at least 1 once resolved.
    pub max_tries: Option<Resolvable<u32>>,
    /// Maximum total elapsed time, measured from the first attempt.
    pub max_time: Option<Resolvable<Duration>>,
}

impl Limits {
    /// Resolves suppliers into concrete values for one invocation.
    ///
    /// A resolved try budget of zero is clamped to one; the loop always makes
    /// the first attempt.
    pub fn resolve(&self) -> ResolvedLimits {
        ResolvedLimits {
            max_tries: self.max_tries.as_ref().map(|r| r.resolve().max(1)),
            max_time: self.max_time.as_ref().map(|r| r.resolve()),
        }
    }
}

/// Budgets fixed for the duration of one invocation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ResolvedLimits {
    pub max_tries: Option<u32>,
    pub max_time: Option<Duration>,
}

impl ResolvedLimits {
    /// True when the try budget forbids another attempt.
    pub fn tries_exhausted(&self, tries: u32) -> bool {
        matches!(self.max_tries, Some(max) if tries >= max)
    }

    /// True when waiting `wait` more would push elapsed time past the budget.
    pub fn time_exhausted(&self, elapsed: Duration, wait: Duration) -> bool {
        matches!(self.max_time, Some(max) if elapsed.saturating_add(wait) > max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_limits_never_stop() {
        let limits = Limits::default().resolve();
        assert!(!limits.tries_exhausted(u32::MAX));
        assert!(!limits.time_exhausted(Duration::from_secs(3600), Duration::MAX));
    }

    #[test]
    fn test_try_budget_reached() {
        let limits = Limits {
            max_tries: Some(3.into()),
            max_time: None,
        }
        .resolve();
        assert!(!limits.tries_exhausted(2));
        assert!(limits.tries_exhausted(3));
        assert!(limits.tries_exhausted(4));
    }

    #[test]
    fn test_zero_tries_clamps_to_one() {
        let limits = Limits {
            max_tries: Some(0.into()),
            max_time: None,
        }
        .resolve();
        assert_eq!(limits.max_tries, Some(1));
    }

    #[test]
    fn test_time_budget_uses_projection() {
        let limits = Limits {
            max_tries: None,
            max_time: Some(Resolvable::Literal(Duration::from_secs(10))),
        }
        .resolve();
        // 6s elapsed + 3s wait fits; + 5s wait does not.
        assert!(!limits.time_exhausted(Duration::from_secs(6), Duration::from_secs(3)));
        assert!(limits.time_exhausted(Duration::from_secs(6), Duration::from_secs(5)));
        // Exactly on the budget is allowed.
        assert!(!limits.time_exhausted(Duration::from_secs(6), Duration::from_secs(4)));
    }

    #[test]
    fn test_supplier_budget_resolves_fresh() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let n = Arc::new(AtomicU32::new(1));
        let shared = Arc::clone(&n);
        let limits = Limits {
            max_tries: Some(Resolvable::supplier(move || {
                shared.load(Ordering::SeqCst)
            })),
            max_time: None,
        };

        assert_eq!(limits.resolve().max_tries, Some(1));
        n.store(7, Ordering::SeqCst);
        assert_eq!(limits.resolve().max_tries, Some(7));
    }
}
