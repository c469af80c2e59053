use std::path::Path;

use super::{Config, ConfigError};

/// Environment variables that override the `[jira]` credentials
pub const USERNAME_ENV: &str = "JIRA_USERNAME";
pub const PASSWORD_ENV: &str = "JIRA_PASSWORD";

/// Load configuration from file, letting the environment supply credentials
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    })?;

    let mut config = parse(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;

    log::info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    let config = parse(toml_str)?;
    validate(&config)?;
    Ok(config)
}

fn parse(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(username) = lookup(USERNAME_ENV).filter(|v| !v.is_empty()) {
        log::debug!("Using Jira username from {}", USERNAME_ENV);
        config.jira.username = username;
    }
    if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
        log::debug!("Using Jira password from {}", PASSWORD_ENV);
        config.jira.password = password;
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.jira.url.trim();
    if url.is_empty() {
        return Err(ConfigError::ValidationError("jira.url must not be empty".into()));
    }
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => {
            return Err(ConfigError::ValidationError(format!(
                "jira.url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        Err(e) => {
            return Err(ConfigError::ValidationError(format!(
                "jira.url '{}' is not a valid URL: {}",
                url, e
            )));
        }
    }

    if config.jira.username.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "jira.username is required (or set {})",
            USERNAME_ENV
        )));
    }
    if config.jira.password.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "jira.password is required (or set {})",
            PASSWORD_ENV
        )));
    }
    if config.jira.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "jira.timeout_secs must be greater than zero".into(),
        ));
    }

    if config.excel.skip_rows >= config.excel.limit_rows {
        log::warn!(
            "Row range [{}, {}) is empty, no issues will be created",
            config.excel.skip_rows,
            config.excel.limit_rows
        );
    }

    let unmapped = config.field_mapping.unmapped();
    if !unmapped.is_empty() {
        // Rows will fail on these fields at extraction time
        log::warn!("No column mapped for field(s): {}", unmapped.join(", "));
    }

    Ok(())
}
