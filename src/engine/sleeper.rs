//! # Sleeper: the suspend capability of the cooperative driver.
//!
//! Waits in cooperative mode go through the [`Sleeper`] trait instead of a
//! hardcoded timer, so tests (and embedders with their own notion of time)
//! can substitute the suspension point. The default is [`TokioSleeper`].
//!
//! A zero wait still yields the scheduler once, so concurrent work on the
//! same runtime can make progress between back-to-back attempts.

use std::time::Duration;

use async_trait::async_trait;

/// Scheduler-yielding suspension for a computed wait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for `wait`.
    async fn sleep(&self, wait: Duration);
}

/// Default sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, wait: Duration) {
        if wait.is_zero() {
            // Still a suspension point: let other tasks run.
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(wait).await;
        }
    }
}
