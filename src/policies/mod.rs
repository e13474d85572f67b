//! Wait, jitter, and limit policies.
//!
//! This module groups the knobs that control **how long** to wait between
//! attempts and **when** the loop must stop regardless of trigger state.
//!
//! ## Contents
//! - [`WaitSchedule`] restartable wait-time generators (expo / fibo / constant / decay / custom)
//! - [`Jitter`]       randomization applied to each raw wait
//! - `Limits`         try/time budgets, resolved once per invocation
//!
//! ## Quick wiring
//! ```text
//! RetryOnError / RetryOnValue { wait: WaitSchedule, jitter: Jitter, limits: Limits }
//!      └─► engine::Engine uses:
//!           - a fresh WaitSchedule::sequence() per invocation
//!           - jitter.apply(raw) on every pulled wait
//!           - limits to decide give-up (tries first, then projected time)
//! ```

mod jitter;
mod limits;
mod wait;

pub use jitter::Jitter;
pub use wait::{BoxWaitSeq, WaitSchedule};

pub(crate) use limits::{Limits, ResolvedLimits};
