//! # Wait generators: restartable sources of successive wait durations.
//!
//! A wait generator is any `Iterator<Item = Duration> + Send`. The engine
//! instantiates a **fresh** iterator per invocation via [`WaitSchedule`], so
//! concurrent invocations of the same policy never perturb each other's
//! position in the sequence.
//!
//! Reference strategies:
//! - [`WaitSchedule::expo`] — `first × factor^k`, optionally clamped to a ceiling;
//! - [`WaitSchedule::fibo`] — `1, 1, 2, 3, 5, 8, …` seconds, same clamping;
//! - [`WaitSchedule::constant`] — a fixed value repeated indefinitely;
//! - [`WaitSchedule::decay`] — `first × rate^k` with `rate < 1`, optionally
//!   floored (useful when a resource is expected to recover over time);
//! - [`WaitSchedule::from_fn`] — any caller-supplied factory, including
//!   finite sequences (exhaustion is treated as a give-up by the engine).
//!
//! A sequence yields **raw** waits; jitter is applied downstream by the loop.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use reattempt::WaitSchedule;
//!
//! let waits: Vec<_> = WaitSchedule::expo().sequence().take(4).collect();
//! assert_eq!(waits, vec![
//!     Duration::from_secs(1),
//!     Duration::from_secs(2),
//!     Duration::from_secs(4),
//!     Duration::from_secs(8),
//! ]);
//! ```

use std::sync::Arc;
use std::time::Duration;

/// Boxed wait sequence, one per invocation.
pub type BoxWaitSeq = Box<dyn Iterator<Item = Duration> + Send>;

/// Restartable factory for wait sequences.
///
/// Cloning is cheap (the factory is shared); every call to
/// [`WaitSchedule::sequence`] starts over at the first value.
#[derive(Clone)]
pub struct WaitSchedule {
    factory: Arc<dyn Fn() -> BoxWaitSeq + Send + Sync>,
}

impl WaitSchedule {
    /// Exponential waits with the unparameterized defaults:
    /// `1s, 2s, 4s, 8s, …` (first = 1s, factor = 2, no ceiling).
    pub fn expo() -> Self {
        Self::expo_with(Duration::from_secs(1), 2.0, None)
    }

    /// Exponential waits: `first × factor^k`, `k = 0, 1, 2, …`.
    ///
    /// Once the raw value would exceed `ceiling`, every subsequent value is
    /// clamped to the ceiling.
    pub fn expo_with(first: Duration, factor: f64, ceiling: Option<Duration>) -> Self {
        Self::from_fn(move || Expo {
            current: first.as_secs_f64(),
            factor,
            ceiling: ceiling.map(|c| c.as_secs_f64()),
        })
    }

    /// Fibonacci waits in seconds: `1, 1, 2, 3, 5, 8, 13, …`, no ceiling.
    pub fn fibo() -> Self {
        Self::fibo_with(None)
    }

    /// Fibonacci waits with an optional ceiling (clamps like [`expo_with`](Self::expo_with)).
    pub fn fibo_with(ceiling: Option<Duration>) -> Self {
        Self::from_fn(move || Fibo {
            current: 1,
            next: 1,
            ceiling,
        })
    }

    /// A fixed wait repeated indefinitely.
    pub fn constant(value: Duration) -> Self {
        Self::from_fn(move || std::iter::repeat(value))
    }

    /// Exponentially decaying waits: `first × rate^k` with `rate` in `(0, 1)`,
    /// optionally floored at `floor`.
    pub fn decay(first: Duration, rate: f64, floor: Option<Duration>) -> Self {
        Self::from_fn(move || Decay {
            current: first.as_secs_f64(),
            rate,
            floor: floor.map(|d| d.as_secs_f64()),
        })
    }

    /// Wraps a caller-supplied factory.
    ///
    /// The factory must produce a fresh iterator beginning at its first value
    /// each time it is called. Finite iterators are allowed; running out of
    /// values while the loop is still under its limits counts as a give-up.
    pub fn from_fn<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = Duration> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || Box::new(factory())),
        }
    }

    /// Instantiates a fresh sequence starting at the first value.
    pub fn sequence(&self) -> BoxWaitSeq {
        (self.factory)()
    }
}

impl std::fmt::Debug for WaitSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WaitSchedule(..)")
    }
}

/// Converts a computed f64 of seconds into a `Duration`, clamping anything
/// non-finite, negative, or out of range instead of panicking.
fn secs_to_duration(secs: f64) -> Duration {
    if !secs.is_finite() || secs < 0.0 {
        return Duration::MAX;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

struct Expo {
    current: f64,
    factor: f64,
    ceiling: Option<f64>,
}

impl Iterator for Expo {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let raw = match self.ceiling {
            Some(c) if self.current >= c || !self.current.is_finite() => c,
            _ => self.current,
        };
        self.current *= self.factor;
        Some(secs_to_duration(raw))
    }
}

struct Fibo {
    current: u64,
    next: u64,
    ceiling: Option<Duration>,
}

impl Iterator for Fibo {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let raw = Duration::from_secs(self.current);
        let after = self.current.saturating_add(self.next);
        self.current = self.next;
        self.next = after;
        Some(match self.ceiling {
            Some(c) if raw > c => c,
            _ => raw,
        })
    }
}

struct Decay {
    current: f64,
    rate: f64,
    floor: Option<f64>,
}

impl Iterator for Decay {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let mut raw = self.current;
        if let Some(fl) = self.floor {
            raw = raw.max(fl);
        }
        self.current *= self.rate;
        Some(secs_to_duration(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take_secs(schedule: &WaitSchedule, n: usize) -> Vec<f64> {
        schedule.sequence().take(n).map(|d| d.as_secs_f64()).collect()
    }

    #[test]
    fn test_expo_defaults() {
        assert_eq!(
            take_secs(&WaitSchedule::expo(), 5),
            vec![1.0, 2.0, 4.0, 8.0, 16.0]
        );
    }

    #[test]
    fn test_expo_kth_value_is_first_times_factor_pow() {
        let first = Duration::from_millis(300);
        let factor = 3.0;
        let seq = take_secs(&WaitSchedule::expo_with(first, factor, None), 6);
        for (k, v) in seq.iter().enumerate() {
            let expected = first.as_secs_f64() * factor.powi(k as i32);
            assert!((v - expected).abs() < 1e-9, "k={k}: {v} != {expected}");
        }
    }

    #[test]
    fn test_expo_ceiling_clamps_every_subsequent_value() {
        let seq = take_secs(
            &WaitSchedule::expo_with(Duration::from_secs(1), 2.0, Some(Duration::from_secs(5))),
            6,
        );
        assert_eq!(seq, vec![1.0, 2.0, 4.0, 5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_expo_survives_f64_overflow() {
        let schedule = WaitSchedule::expo_with(Duration::from_secs(1), 10.0, None);
        // 10^400 is not representable; the value must clamp, not panic.
        let v = schedule.sequence().nth(400).unwrap();
        assert_eq!(v, Duration::MAX);
    }

    #[test]
    fn test_fibo_sequence() {
        assert_eq!(
            take_secs(&WaitSchedule::fibo(), 7),
            vec![1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0]
        );
    }

    #[test]
    fn test_fibo_never_exceeds_ceiling() {
        let ceiling = Duration::from_secs(8);
        let schedule = WaitSchedule::fibo_with(Some(ceiling));
        for d in schedule.sequence().take(50) {
            assert!(d <= ceiling, "{d:?} exceeds ceiling");
        }
    }

    #[test]
    fn test_constant_repeats() {
        let seq = take_secs(&WaitSchedule::constant(Duration::from_millis(250)), 4);
        assert_eq!(seq, vec![0.25; 4]);
    }

    #[test]
    fn test_decay_shrinks_and_floors() {
        let seq = take_secs(
            &WaitSchedule::decay(Duration::from_secs(8), 0.5, Some(Duration::from_secs(2))),
            5,
        );
        assert_eq!(seq, vec![8.0, 4.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_sequence_restarts_from_first_value() {
        let schedule = WaitSchedule::expo();
        let a: Vec<_> = schedule.sequence().take(3).collect();
        let b: Vec<_> = schedule.sequence().take(3).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_fn_finite_sequence_ends() {
        let schedule = WaitSchedule::from_fn(|| {
            vec![Duration::from_secs(1), Duration::from_secs(2)].into_iter()
        });
        let mut seq = schedule.sequence();
        assert!(seq.next().is_some());
        assert!(seq.next().is_some());
        assert!(seq.next().is_none());
    }
}
