//! Careers stage: derived per-player aggregates
//!
//! Full delete-and-rebuild over `player_careers`, so there is no resume
//! cursor: the stage either completes or is safe to re-run from scratch.

use crate::storage::Storage;
use chrono::Utc;

/// Recomputes all career rows from the currently stored stints
pub fn run<S: Storage>(storage: &mut S) -> crate::Result<usize> {
    tracing::info!("rebuilding player_careers");

    let today = Utc::now().date_naive();
    let written = storage.rebuild_careers(today)?;

    tracing::info!("player_careers rebuilt: {written} rows");
    Ok(written)
}
