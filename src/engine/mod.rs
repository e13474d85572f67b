//! The retry-loop core: pure state machine plus the suspend capability.
//!
//! ## Contents
//! - `Engine`, `Next`, `WaitSource` — per-invocation loop state and the
//!   transition rules shared by both execution drivers
//! - [`Sleeper`], [`TokioSleeper`] — the suspension point used by the
//!   cooperative driver
//!
//! The drivers themselves live in `retry` (cooperative) and `blocking`.

mod sleeper;
mod state;

pub use sleeper::{Sleeper, TokioSleeper};

pub(crate) use state::{Engine, Next, WaitSource};
