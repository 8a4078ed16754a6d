use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a loaded configuration
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid
/// * `Err(ConfigError::Validation)` - A field is missing or malformed
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.db_path.is_empty() {
        return Err(ConfigError::Validation("db_path must not be empty".into()));
    }

    check_url("mw_api", &config.mw_api)?;
    check_url("wiki_base", &config.wiki_base)?;

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent must not be empty; the wiki requires identification".into(),
        ));
    }

    if config.request_timeout_s == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_s must be greater than 0".into(),
        ));
    }

    if config.throttle_s < 0.0 || !config.throttle_s.is_finite() {
        return Err(ConfigError::Validation(
            "throttle_s must be a non-negative number".into(),
        ));
    }

    if config.cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "cache_dir must not be empty".into(),
        ));
    }

    if config.player_index_page.is_empty() {
        return Err(ConfigError::Validation(
            "player_index_page must not be empty".into(),
        ));
    }

    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{field} is not a valid URL: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{field} must use http or https, got {}",
            parsed.scheme()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            db_path: "./roster.db".to_string(),
            mw_api: "https://liquipedia.net/leagueoflegends/api.php".to_string(),
            wiki_base: "https://liquipedia.net/leagueoflegends".to_string(),
            user_agent: "RosterlineBot/0.1 (admin@example.com)".to_string(),
            request_timeout_s: 30,
            throttle_s: 0.5,
            max_players: 0,
            cache_dir: ".cache_html".to_string(),
            player_index_page: "Portal:Players".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_db_path_rejected() {
        let mut config = valid_config();
        config.db_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_api_url_rejected() {
        let mut config = valid_config();
        config.mw_api = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = valid_config();
        config.wiki_base = "ftp://example.com/wiki".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = valid_config();
        config.user_agent = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.request_timeout_s = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_negative_throttle_rejected() {
        let mut config = valid_config();
        config.throttle_s = -1.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_throttle_allowed() {
        let mut config = valid_config();
        config.throttle_s = 0.0;
        assert!(validate(&config).is_ok());
    }
}
