use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    // Article URLs are built as "{wiki_base}/{title}"
    config.wiki_base = config.wiki_base.trim_end_matches('/').to_string();

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
db_path = "./roster.db"
mw_api = "https://liquipedia.net/leagueoflegends/api.php"
wiki_base = "https://liquipedia.net/leagueoflegends/"
user_agent = "RosterlineBot/0.1 (admin@example.com)"
throttle_s = 1.5
max_players = 10
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.db_path, "./roster.db");
        // Trailing slash is normalized away
        assert_eq!(config.wiki_base, "https://liquipedia.net/leagueoflegends");
        assert_eq!(config.throttle_s, 1.5);
        assert_eq!(config.max_players, 10);
        // Defaults fill in the rest
        assert_eq!(config.request_timeout_s, 30);
        assert_eq!(config.cache_dir, ".cache_html");
        assert_eq!(config.player_index_page, "Portal:Players");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config_content = r#"
db_path = "./roster.db"
mw_api = "https://example.com/api.php"
wiki_base = "https://example.com/wiki"
user_agent = "RosterlineBot/0.1"
some_future_option = true
"#;

        let file = create_temp_config(config_content);
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_missing_required_key() {
        // mw_api is required and has no default
        let config_content = r#"
db_path = "./roster.db"
wiki_base = "https://example.com/wiki"
user_agent = "RosterlineBot/0.1"
"#;

        let file = create_temp_config(config_content);
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
db_path = ""
mw_api = "https://example.com/api.php"
wiki_base = "https://example.com/wiki"
user_agent = "RosterlineBot/0.1"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
