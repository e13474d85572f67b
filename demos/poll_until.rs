//! # Example: poll_until
//!
//! Demonstrates the value-triggered policy: poll a job status endpoint
//! until it reports `Done`, with a constant wait between polls and a try
//! budget so an abandoned job cannot spin forever.
//!
//! ## Run
//! ```bash
//! cargo run --example poll_until
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reattempt::{Jitter, RetryOnValue, WaitSchedule};

static POLLS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobStatus {
    Pending,
    Running,
    Done,
}

async fn poll_job() -> JobStatus {
    // A job that finishes on the fourth poll.
    match POLLS.fetch_add(1, Ordering::Relaxed) {
        0 => JobStatus::Pending,
        1 | 2 => JobStatus::Running,
        _ => JobStatus::Done,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let poll = RetryOnValue::new(
            WaitSchedule::constant(Duration::from_millis(200)),
            |status: &JobStatus| *status != JobStatus::Done,
        )
        .max_tries(10u32)
        .jitter(Jitter::None)
        .name("poll_job")
        .on_backoff(|e| {
            println!(
                "[observer] job still {:?} after poll {}, next in {:?}",
                e.value.unwrap(),
                e.tries,
                e.wait.unwrap_or_default()
            );
        });

    let status = poll.run(|| poll_job()).await;
    println!("job finished: {status:?}");
}
