//! # reattempt
//!
//! **Reattempt** is a configurable retry library for Rust.
//!
//! It wraps fallible (or slow-to-converge) operations in a retry loop with
//! pluggable wait schedules, jitter, limits, and lifecycle observers. The
//! crate is designed as a building block: it owns no threads, no global
//! state, and no runtime beyond the timer of the executing context.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      ┌────────────────────┐            ┌────────────────────┐
//!      │   RetryOnError     │            │   RetryOnValue     │
//!      │ (error-triggered)  │            │ (value-triggered)  │
//!      └─────────┬──────────┘            └─────────┬──────────┘
//!                └───────────────┬─────────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Policy core (immutable once built)                             │
//! │  - WaitSchedule / runtime extractor  (raw wait per backoff)     │
//! │  - Jitter                            (Full by default)          │
//! │  - Limits                            (max_tries / max_time,     │
//! │                                       literal or supplier)      │
//! │  - Classifier                        (retry/fatal/give-up)      │
//! │  - HandlerSet × 3                    (success/backoff/give-up)  │
//! │  - LogConfig                         (tracing, target           │
//! │                                       "reattempt")              │
//! └───────────────┬─────────────────────────────────┬───────────────┘
//!                 ▼                                 ▼
//!      ┌────────────────────┐            ┌────────────────────┐
//!      │ cooperative driver │            │  blocking driver   │
//!      │ run() + Sleeper    │            │ call() + thread    │
//!      │ (tokio timer)      │            │ sleep              │
//!      └─────────┬──────────┘            └─────────┬──────────┘
//!                └───────────────┬─────────────────┘
//!                                ▼
//!                    Engine (pure state machine)
//!              begin_attempt() / decide() per attempt
//! ```
//!
//! ### Invocation lifecycle
//! ```text
//! run(op) / call(op)
//!
//! loop {
//!   ├─► tries += 1 (start timestamp on first attempt)
//!   ├─► outcome = invoke op
//!   ├─► classify(outcome)
//!   │       ├─ resolved        ─► fire on_success, return value
//!   │       ├─ fatal error     ─► return RetryError::Permanent, no events
//!   │       └─ retryable cause:
//!   │            ├─ give-up predicate true  ─► give up
//!   │            ├─ try budget exhausted    ─► give up (no wait computed)
//!   │            ├─ wait sequence exhausted ─► give up
//!   │            ├─ projected elapsed+wait
//!   │            │  past time budget        ─► give up
//!   │            └─ otherwise:
//!   │                 ├─ fire on_backoff { wait, trigger }
//!   │                 ├─ sleep(jittered wait)
//!   │                 └─ continue
//!   │
//!   └─ give up ─► fire on_giveup, then:
//!        - error-triggered: return RetryError::GiveUp { last error }
//!        - value-triggered: return the last pending value
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits               |
//! |-------------------|----------------------------------------------------------------------|----------------------------------|
//! | **Policies**      | Wait schedules (expo, fibo, constant, decay, custom) and jitter.     | [`WaitSchedule`], [`Jitter`]     |
//! | **Limits**        | Try/time budgets, literal or resolved per invocation.                | [`Resolvable`]                   |
//! | **Observers**     | Hook into success/backoff/give-up transitions, sync or suspending.   | [`Observer`], [`Event`]          |
//! | **Errors**        | Typed terminal outcomes and decoration-time validation.              | [`RetryError`], [`ConfigError`]  |
//! | **Execution**     | Cooperative (`run`) and blocking (`call`) drivers over one core.     | [`RetryOnError`], [`blocking`]   |
//! | **Time**          | Swappable suspension point for tests and embedders.                  | [`Sleeper`], [`TokioSleeper`]    |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use reattempt::{Jitter, RetryOnError, WaitSchedule};
//!
//! #[derive(Debug, thiserror::Error)]
//! enum ApiError {
//!     #[error("server unavailable")]
//!     Unavailable,
//!     #[error("bad request")]
//!     BadRequest,
//! }
//!
//! async fn fetch_profile() -> Result<String, ApiError> {
//!     // a real client call here
//!     Ok("profile".to_string())
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let retry = RetryOnError::new(WaitSchedule::expo())
//!         .retry_if(|e: &ApiError| matches!(e, ApiError::Unavailable))
//!         .max_tries(5u32)
//!         .max_time(Duration::from_secs(30))
//!         .jitter(Jitter::Full)
//!         .name("fetch_profile");
//!
//!     let profile = retry.run(|| fetch_profile()).await?;
//!     assert_eq!(profile, "profile");
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod observers;
mod policies;
mod resolve;
mod retry;
mod trigger;

pub mod blocking;

// ---- Public re-exports ----

pub use engine::{Sleeper, TokioSleeper};
pub use error::{ConfigError, RetryError};
pub use observers::{Event, EventKind, Handler, Observer};
pub use policies::{BoxWaitSeq, Jitter, WaitSchedule};
pub use resolve::Resolvable;
pub use retry::{RetryOnError, RetryOnValue};
