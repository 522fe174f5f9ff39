//! Minimum-delay limiter for sequential geocoding requests.

use std::time::{Duration, Instant};

pub struct RateLimiter {
    min_delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_delay_ms: u64) -> Self {
        Self {
            min_delay: Duration::from_millis(min_delay_ms),
            last_request: None,
        }
    }

    /// Block until `min_delay` has passed since the previous call.
    /// Returns how long it slept.
    pub fn wait(&mut self) -> Duration {
        let mut slept = Duration::ZERO;
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                slept = self.min_delay - elapsed;
                std::thread::sleep(slept);
            }
        }
        self.last_request = Some(Instant::now());
        slept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_does_not_wait() {
        let mut limiter = RateLimiter::new(5_000);
        assert_eq!(limiter.wait(), Duration::ZERO);
    }

    #[test]
    fn test_zero_delay_never_waits() {
        let mut limiter = RateLimiter::new(0);
        limiter.wait();
        assert_eq!(limiter.wait(), Duration::ZERO);
    }

    #[test]
    fn test_enforces_min_delay() {
        let mut limiter = RateLimiter::new(30);
        let start = Instant::now();
        limiter.wait();
        limiter.wait();
        limiter.wait();
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
