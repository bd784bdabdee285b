//! Minimum spacing between outbound Bot API calls.
//!
//! The limiter is owned by the transport; every outbound call awaits
//! [`RateLimiter::acquire`] first. The pause always runs to completion.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

/// Enforces a fixed minimum interval between calls.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum duration between two calls.
    min_interval: Duration,

    /// When the previous call was let through.
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with the given spacing.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Sleeps out whatever remains of the interval since the previous call,
    /// then records this call.
    ///
    /// Returns how long it waited.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_call.lock().await;

        let wait = remaining(*last, self.min_interval);
        if !wait.is_zero() {
            debug!("Rate limiter: pausing {:?} before next API call", wait);
            tokio::time::sleep(wait).await;
        }

        *last = Some(Instant::now());
        wait
    }
}

fn remaining(last: Option<Instant>, min_interval: Duration) -> Duration {
    last.map_or(Duration::ZERO, |at| min_interval.saturating_sub(at.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_second_call_waits_out_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        let started = Instant::now();

        limiter.acquire().await;
        let waited = limiter.acquire().await;

        assert!(waited > Duration::ZERO);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        limiter.acquire().await;
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }
}
