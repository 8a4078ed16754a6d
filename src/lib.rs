//! Rosterline: a checkpointed roster-history scraper
//!
//! This crate ingests player roster history from a MediaWiki-style wiki,
//! deduplicates and stores it in SQLite, then derives per-player career
//! aggregates. Fetching is rate-aware and retried with backoff; progress is
//! checkpointed per work item so an interrupted run resumes where it left off.

pub mod cache;
pub mod client;
pub mod config;
pub mod interpret;
pub mod pipeline;
pub mod storage;

use thiserror::Error;

/// Main error type for rosterline operations
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] client::FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for rosterline operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::ContentCache;
pub use client::{FetchError, RateLimiter, RetryPolicy, WikiClient};
pub use config::Config;
pub use pipeline::StageOutcome;
pub use storage::{SqliteStorage, Storage};
