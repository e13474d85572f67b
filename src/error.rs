//! Error types surfaced by the retry engine.
//!
//! This module defines two error enums:
//!
//! - [`RetryError`] — terminal outcomes of an error-triggered invocation.
//! - [`ConfigError`] — policy construction problems caught before any
//!   attempt runs.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.
//!
//! The engine never swallows an error silently: a non-matching error is
//! surfaced immediately as [`RetryError::Permanent`], and an exhausted retry
//! budget as [`RetryError::GiveUp`] carrying the last triggering error.

use std::time::Duration;
use thiserror::Error;

/// # Terminal failure of an error-triggered invocation.
///
/// `Permanent` means the error did not match the retry trigger and was
/// propagated without firing any handlers. `GiveUp` means the error matched,
/// but a give-up predicate, a limit, or generator exhaustion stopped the loop.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The error did not match the retry trigger; propagated immediately.
    #[error("permanent failure after {tries} tries: {error}")]
    Permanent {
        /// Attempts made before the non-matching error, including the failing one.
        tries: u32,
        /// The underlying error.
        error: E,
    },

    /// Retrying stopped before success; the last matching error is attached.
    #[error("gave up after {tries} tries over {elapsed:?}: {error}")]
    GiveUp {
        /// Attempts made in total.
        tries: u32,
        /// Elapsed time since the first attempt.
        elapsed: Duration,
        /// The last triggering error.
        error: E,
    },
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Permanent { .. } => "retry_permanent",
            RetryError::GiveUp { .. } => "retry_gave_up",
        }
    }

    /// Number of attempts made before the invocation failed.
    pub fn tries(&self) -> u32 {
        match self {
            RetryError::Permanent { tries, .. } | RetryError::GiveUp { tries, .. } => *tries,
        }
    }

    /// Recovers the underlying error payload.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use reattempt::RetryError;
    ///
    /// let err: RetryError<&str> = RetryError::GiveUp {
    ///     tries: 3,
    ///     elapsed: Duration::from_millis(20),
    ///     error: "still down",
    /// };
    /// assert_eq!(err.into_inner(), "still down");
    /// ```
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Permanent { error, .. } | RetryError::GiveUp { error, .. } => error,
        }
    }
}

impl<E: std::fmt::Display> RetryError<E> {
    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        match self {
            RetryError::Permanent { tries, error } => {
                format!("permanent after {tries} tries: {error}")
            }
            RetryError::GiveUp {
                tries,
                elapsed,
                error,
            } => format!("gave up after {tries} tries ({elapsed:?}): {error}"),
        }
    }
}

/// # Policy construction errors.
///
/// Raised at decoration time, before any attempt runs.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A suspending observer was registered but the policy is being finalized
    /// for a blocking context, which cannot await it.
    #[error("suspending observer registered for `{phase}` cannot run in a blocking context")]
    SuspendingObserver {
        /// The phase list the observer was registered on.
        phase: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::SuspendingObserver { .. } => "config_suspending_observer",
        }
    }
}
