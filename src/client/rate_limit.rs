//! Sliding-window rate limiting
//!
//! The request budget is a process-wide resource: at most N requests may be
//! admitted within any trailing window of length W. Admission is blocking —
//! the single processing task sleeps until a slot frees up — so no fairness
//! policy across waiters is needed.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Default request budget: 60 requests per hour
pub const DEFAULT_MAX_REQUESTS: usize = 60;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(3600);

/// Blocking sliding-window admission gate
///
/// Timestamps come from `tokio::time::Instant`, so tests running under a
/// paused runtime clock (`#[tokio::test(start_paused = true)]`) exercise the
/// waiting logic without real wall-clock delays.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: VecDeque<Instant>,
}

impl RateLimiter {
    /// Creates a limiter admitting `max_requests` per trailing `window`
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            timestamps: VecDeque::with_capacity(max_requests),
        }
    }

    /// Creates a limiter with the default hourly budget
    pub fn hourly() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }

    /// Blocks until one more request may be issued, then records it
    ///
    /// Drops timestamps that have aged out of the window; if the remaining
    /// count is below capacity the request is admitted immediately. Otherwise
    /// sleeps until the oldest timestamp falls out of the window, plus a small
    /// jitter so resumed scrapers do not all wake at once, then re-evaluates.
    pub async fn acquire(&mut self) {
        loop {
            let now = Instant::now();
            while self
                .timestamps
                .front()
                .is_some_and(|&t| now - t >= self.window)
            {
                self.timestamps.pop_front();
            }

            if self.timestamps.len() < self.max_requests {
                self.timestamps.push_back(now);
                return;
            }

            let Some(&oldest) = self.timestamps.front() else {
                continue;
            };

            let jitter = Duration::from_secs_f64(0.5 + fastrand::f64() * 2.5);
            let wait = self
                .window
                .saturating_sub(now - oldest)
                .saturating_add(jitter)
                .max(Duration::from_secs(1));

            tracing::info!(
                "request window full ({}/{}s); sleeping {:.0}s",
                self.max_requests,
                self.window.as_secs(),
                wait.as_secs_f64()
            );
            sleep(wait).await;
        }
    }

    /// Number of admissions currently inside the window (stale entries included
    /// until the next `acquire` prunes them)
    pub fn recorded(&self) -> usize {
        self.timestamps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_capacity_immediately() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert_eq!(Instant::now() - start, Duration::ZERO);
        assert_eq!(limiter.recorded(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocks_when_window_is_full() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));

        limiter.acquire().await;
        limiter.acquire().await;

        let start = Instant::now();
        limiter.acquire().await;
        let waited = Instant::now() - start;

        // Must wait at least until the oldest admission ages out; jitter adds
        // at most a few seconds on top.
        assert!(waited >= Duration::from_secs(60), "waited {:?}", waited);
        assert!(waited < Duration::from_secs(70), "waited {:?}", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_frees_after_window_elapses() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(10));

        limiter.acquire().await;
        sleep(Duration::from_secs(11)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_exceeds_budget_in_any_trailing_window() {
        let window = Duration::from_secs(10);
        let mut limiter = RateLimiter::new(2, window);

        let mut admissions = Vec::new();
        for _ in 0..7 {
            limiter.acquire().await;
            admissions.push(Instant::now());
        }

        // For every admission, count admissions within the trailing window
        // ending at it; the budget must hold at each point.
        for (i, &t) in admissions.iter().enumerate() {
            let in_window = admissions[..=i]
                .iter()
                .filter(|&&earlier| t - earlier < window)
                .count();
            assert!(in_window <= 2, "budget exceeded at admission {}", i);
        }
    }
}
