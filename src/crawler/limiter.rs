//! Global request pacing shared by all workers.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Process-wide minimum spacing between request dispatches
///
/// Only the start of each request is throttled; responses may still be in
/// flight concurrently.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a request may be dispatched and records the dispatch
    ///
    /// The sleep happens while the lock is held, so waiting callers are
    /// released one interval apart in lock order.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }
}
