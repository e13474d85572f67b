//! # Jitter: randomizing transform applied to raw waits.
//!
//! [`Jitter`] spreads out retry timing so that many callers failing at the
//! same moment do not retry in lockstep.
//!
//! - [`Jitter::Full`] — uniformly random in `[0, raw]` (the default)
//! - [`Jitter::Random`] — adds a uniformly random offset of up to one second
//! - [`Jitter::None`] — identity, the raw wait is used exactly
//! - [`Jitter::Custom`] — caller-supplied transform
//!
//! The transform is pure apart from its own randomness source and can never
//! produce a negative wait (`Duration` is unsigned by construction).

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

/// Transform from a raw wait to the actual wait.
#[derive(Clone, Default)]
pub enum Jitter {
    /// Use the raw wait exactly. Deterministic sequences for fixed generators.
    None,
    /// Uniformly random wait in `[0, raw]`.
    #[default]
    Full,
    /// Raw wait plus a uniformly random offset in `[0, 1s)`.
    Random,
    /// Caller-supplied transform of the raw wait.
    Custom(Arc<dyn Fn(Duration) -> Duration + Send + Sync>),
}

impl Jitter {
    /// Wraps a custom transform.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Duration) -> Duration + Send + Sync + 'static,
    {
        Jitter::Custom(Arc::new(f))
    }

    /// Applies the transform to a raw wait.
    pub fn apply(&self, raw: Duration) -> Duration {
        match self {
            Jitter::None => raw,
            Jitter::Full => full_jitter(raw),
            Jitter::Random => random_jitter(raw),
            Jitter::Custom(f) => f(raw),
        }
    }
}

impl std::fmt::Debug for Jitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Jitter::None => f.write_str("None"),
            Jitter::Full => f.write_str("Full"),
            Jitter::Random => f.write_str("Random"),
            Jitter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Uniformly random wait in `[0, raw]`.
fn full_jitter(raw: Duration) -> Duration {
    let ms = raw.as_millis().min(u128::from(u64::MAX)) as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let mut rng = rand::rng();
    Duration::from_millis(rng.random_range(0..=ms))
}

/// Raw wait plus a uniformly random offset in `[0, 1s)`.
///
/// Saturates at `Duration::MAX`: un-ceilinged generators clamp overflowed
/// values there, and the sum must not panic.
fn random_jitter(raw: Duration) -> Duration {
    let mut rng = rand::rng();
    raw.saturating_add(Duration::from_millis(rng.random_range(0..1000)))
}
