//! Read bandwidth limiting.

use std::time::{Duration, Instant};

/// Fixed-window byte budget.
///
/// Each window admits up to `limit` bytes. A request that does not fit blocks
/// the caller until the next window opens. A request larger than the whole
/// budget is admitted alone into an empty window, so oversized files slow the
/// run down instead of stalling it.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u64,
    window: Duration,
    window_start: Option<Instant>,
    used: u64,
}

impl RateLimiter {
    /// Limiter admitting `limit_bytes_per_second`, or `None` when the limit is 0.
    pub fn per_second(limit_bytes_per_second: u64) -> Option<RateLimiter> {
        (limit_bytes_per_second > 0)
            .then(|| RateLimiter::with_window(limit_bytes_per_second, Duration::from_secs(1)))
    }

    pub fn with_window(limit: u64, window: Duration) -> RateLimiter {
        RateLimiter {
            limit,
            window,
            window_start: None,
            used: 0,
        }
    }

    /// Blocks until `bytes` fit in the current window and charges them.
    ///
    /// Returns the time spent waiting.
    pub fn wait_for_allowance(&mut self, bytes: u64) -> Duration {
        let start = Instant::now();
        loop {
            let now = Instant::now();
            let window_start = match self.window_start {
                Some(window_start) if now.duration_since(window_start) < self.window => {
                    window_start
                }
                _ => {
                    self.window_start = Some(now);
                    self.used = 0;
                    now
                }
            };

            if self.used == 0 || self.used.saturating_add(bytes) <= self.limit {
                self.used = self.used.saturating_add(bytes);
                return start.elapsed();
            }

            let next_window = window_start + self.window;
            std::thread::sleep(next_window.saturating_duration_since(now));
        }
    }
}
