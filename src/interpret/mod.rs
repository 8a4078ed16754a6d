//! Page interpretation
//!
//! Pure functions from raw page content to structured records. Nothing in
//! this module touches the network or storage, so every heuristic here can be
//! tested against fixture HTML and swapped without disturbing the pipeline.

pub mod dates;
mod discovery;
mod player;

pub use discovery::{article_prefix, discover_player_titles};
pub use player::{parse_player_page, Profile, Stint};

/// Collapses all whitespace runs to single spaces and trims
pub(crate) fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
