use serde::Deserialize;

/// Main configuration structure for rosterline
///
/// All network pacing and storage locations are driven from here; the binary
/// takes no behavioral flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    pub db_path: String,

    /// MediaWiki API endpoint (e.g. "https://liquipedia.net/leagueoflegends/api.php")
    pub mw_api: String,

    /// Base URL for article pages (e.g. "https://liquipedia.net/leagueoflegends")
    pub wiki_base: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_s")]
    pub request_timeout_s: u64,

    /// Polite delay applied after every successful request, in seconds
    #[serde(default = "default_throttle_s")]
    pub throttle_s: f64,

    /// Truncate the discovered work list to this many players (0 = unbounded)
    #[serde(default)]
    pub max_players: usize,

    /// Directory for the durable page cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Wiki page used to discover player titles; a "Category:" title switches
    /// discovery to the paginated category-members API
    #[serde(default = "default_player_index_page")]
    pub player_index_page: String,
}

fn default_request_timeout_s() -> u64 {
    30
}

fn default_throttle_s() -> f64 {
    0.5
}

fn default_cache_dir() -> String {
    ".cache_html".to_string()
}

fn default_player_index_page() -> String {
    "Portal:Players".to_string()
}
