//! # Example: retry_on_error
//!
//! Demonstrates the error-triggered policy: a flaky operation fails twice
//! and succeeds on the third attempt, with exponential backoff and full
//! jitter between attempts.
//!
//! ## Flow
//! ```text
//! retry.run(op)
//!   ├─► attempt 1 → Err("boom #1")
//!   ├─► on_backoff { tries=1, wait≈[0,100ms] }
//!   ├─► sleep(wait)
//!   ├─► attempt 2 → Err("boom #2")
//!   ├─► on_backoff { tries=2, wait≈[0,200ms] }
//!   ├─► sleep(wait)
//!   ├─► attempt 3 → Ok("profile")
//!   └─► on_success { tries=3 }
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example retry_on_error
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reattempt::{Jitter, RetryOnError, WaitSchedule};

static CALLS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("server unavailable: {0}")]
    Unavailable(String),
    #[error("bad request")]
    BadRequest,
}

async fn fetch_profile() -> Result<String, ApiError> {
    let attempt = CALLS.fetch_add(1, Ordering::Relaxed) + 1;
    println!("[fetch_profile] attempt {attempt}");

    if attempt <= 2 {
        Err(ApiError::Unavailable(format!("boom #{attempt}")))
    } else {
        Ok("profile".to_string())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Retry only on transient failures; a BadRequest propagates immediately.
    let retry = RetryOnError::new(WaitSchedule::expo_with(
            Duration::from_millis(100),
            2.0,
            Some(Duration::from_secs(2)),
        ))
        .retry_if(|e: &ApiError| matches!(e, ApiError::Unavailable(_)))
        .max_tries(5u32)
        .jitter(Jitter::Full)
        .name("fetch_profile")
        .on_backoff(|e| {
            println!(
                "[observer] backing off {:?} after try {} ({})",
                e.wait.unwrap_or_default(),
                e.tries,
                e.error.map(|err| err.to_string()).unwrap_or_default()
            );
        })
        .on_success(|e| println!("[observer] success after {} tries", e.tries));

    let profile = retry.run(|| fetch_profile()).await?;
    println!("fetched: {profile}");
    Ok(())
}
