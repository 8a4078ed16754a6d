//! Outbound request layer
//!
//! Everything that talks to the network lives here:
//! - Sliding-window admission control ([`RateLimiter`])
//! - Exponential backoff state ([`backoff::Backoff`], [`RetryPolicy`])
//! - The retrying wiki client ([`WikiClient`]) with its response
//!   classification ([`FetchError`])

mod backoff;
mod fetcher;
mod rate_limit;

pub use backoff::{Backoff, RetryPolicy};
pub use fetcher::{FetchError, WikiClient};
pub use rate_limit::RateLimiter;
