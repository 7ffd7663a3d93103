//! Configuration loading and resolution
//!
//! Configuration is assembled once at process start and passed explicitly to
//! the components that need it. Resolution priority for every value:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Environment variable naming the database file
pub const ENV_DATABASE: &str = "NEWSDESK_DATABASE";
/// Environment variable carrying the NewsAPI key
pub const ENV_NEWSAPI_KEY: &str = "NEWSDESK_NEWSAPI_KEY";
/// Environment variable carrying the GNews key
pub const ENV_GNEWS_KEY: &str = "NEWSDESK_GNEWS_KEY";

/// Optional TOML configuration file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database: Option<PathBuf>,
    pub newsapi_key: Option<String>,
    pub gnews_key: Option<String>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// NewsAPI API key, if configured
    pub newsapi_key: Option<String>,
    /// GNews API key, if configured
    pub gnews_key: Option<String>,
}

impl Config {
    /// Assemble configuration from CLI argument, environment, and TOML file
    pub fn resolve(cli_database: Option<PathBuf>) -> Result<Self> {
        let toml_config = load_toml_config().unwrap_or_default();

        let database_path = cli_database
            .or_else(|| std::env::var(ENV_DATABASE).ok().map(PathBuf::from))
            .or_else(|| toml_config.database.clone())
            .unwrap_or_else(default_database_path);

        let newsapi_key = std::env::var(ENV_NEWSAPI_KEY)
            .ok()
            .or_else(|| toml_config.newsapi_key.clone());
        let gnews_key = std::env::var(ENV_GNEWS_KEY)
            .ok()
            .or_else(|| toml_config.gnews_key.clone());

        Ok(Self {
            database_path,
            newsapi_key,
            gnews_key,
        })
    }
}

/// Load the optional TOML config file from the platform config directory
fn load_toml_config() -> Result<TomlConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents).map_err(|e| {
        warn!("Ignoring malformed config file {}: {}", path.display(), e);
        Error::Config(format!("Malformed config file {}: {}", path.display(), e))
    })
}

/// Platform config file location (`~/.config/newsdesk/config.toml` on Linux)
fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("newsdesk").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("newsdesk").join("newsdesk.db"))
        .unwrap_or_else(|| PathBuf::from("./newsdesk.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins_over_default() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/override.db"))).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn default_path_is_nonempty() {
        assert!(!default_database_path().as_os_str().is_empty());
    }
}
