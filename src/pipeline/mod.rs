//! Pipeline stages
//!
//! The players stage drives discover → resume → per-item process with a
//! durable cursor; the careers stage is a full rebuild with no resume model.

pub mod careers;
pub mod players;

/// How a resumable stage ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Reached the end of the work list
    Completed,

    /// Stopped early on a provider-side rate limit; the checkpoint holds the
    /// unprocessed item so a later run picks up exactly there. This is an
    /// expected operating condition, not a failure.
    RateLimited,
}
