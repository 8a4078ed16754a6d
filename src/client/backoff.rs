//! Exponential backoff for retried fetches
//!
//! Backoff state is rebuilt per call: each fetch starts from the base delay
//! and grows by a fixed factor after every retried failure, clamped to a
//! ceiling. Jitter is added at sleep time by the fetch client, not here, so
//! the progression itself stays deterministic and testable.

use std::time::Duration;

/// Retry parameters shared by both call shapes of the fetch client
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts before the call fails with `FetchError::Exhausted`
    pub max_attempts: u32,

    /// Initial backoff delay
    pub base_delay: Duration,

    /// Multiplier applied after each retried failure
    pub factor: f64,

    /// Cap on any single wait
    pub wait_ceiling: Duration,

    /// Cap on the stored (growing) delay
    pub growth_ceiling: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            base_delay: Duration::from_secs(10),
            factor: 1.6,
            wait_ceiling: Duration::from_secs(60),
            growth_ceiling: Duration::from_secs(180),
        }
    }
}

impl RetryPolicy {
    /// Starts a fresh backoff sequence under this policy
    pub fn backoff(&self) -> Backoff {
        Backoff {
            current: self.base_delay,
            factor: self.factor,
            wait_ceiling: self.wait_ceiling,
            growth_ceiling: self.growth_ceiling,
        }
    }
}

/// Per-call backoff state
#[derive(Debug)]
pub struct Backoff {
    current: Duration,
    factor: f64,
    wait_ceiling: Duration,
    growth_ceiling: Duration,
}

impl Backoff {
    /// Returns the next wait duration and advances the sequence
    pub fn next_wait(&mut self) -> Duration {
        let wait = self.current.min(self.wait_ceiling);
        self.current = self
            .current
            .mul_f64(self.factor)
            .min(self.growth_ceiling);
        wait
    }
}
