//! Application configuration file support.
//!
//! Settings are read from `seelack.toml`, then selected values are overridden
//! from the environment. Every section is optional; missing keys take defaults.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::time::parse_utc_offset;
use crate::models::MatchPolicy;

/// Environment variable that forces a configuration file path.
pub const CONFIG_PATH_ENV: &str = "SEELACK_CONFIG";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub aggregation: AggregationSettings,
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

/// Store bootstrap settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Load the bundled mock data set at startup
    pub seed_on_start: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { seed_on_start: true }
    }
}

/// Aggregation settings as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Reporting offset such as `"+09:00"`
    pub utc_offset: String,
    pub match_policy: MatchPolicy,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            utc_offset: "+00:00".to_string(),
            match_policy: MatchPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Validated aggregation settings used at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    pub offset: FixedOffset,
    pub match_policy: MatchPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(ConfigError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Uses `SEELACK_CONFIG` when set, otherwise searches for `seelack.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file exists. Environment overrides
    /// (`HOST`, `PORT`, `RUST_LOG`) are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::locate() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                log::info!("No seelack.toml found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn locate() -> Option<PathBuf> {
        if let Ok(forced) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(forced));
        }

        let search_paths = [
            PathBuf::from("seelack.toml"),
            PathBuf::from("backend/seelack.toml"),
            PathBuf::from("../seelack.toml"),
        ];
        search_paths.into_iter().find(|p| p.exists())
    }

    /// Override settings from `HOST`, `PORT` and `RUST_LOG`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a port number: {}", port)))?;
        }
        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".to_string()));
        }
        self.aggregation_config()?;
        Ok(())
    }

    /// The `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Resolve the aggregation section into runtime settings.
    pub fn aggregation_config(&self) -> Result<AggregationConfig, ConfigError> {
        let offset = parse_utc_offset(&self.aggregation.utc_offset).map_err(|e| {
            ConfigError::Invalid(format!("aggregation.utc_offset: {}", e))
        })?;
        Ok(AggregationConfig {
            offset,
            match_policy: self.aggregation.match_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.store.seed_on_start);
        assert_eq!(config.aggregation_config().unwrap(), AggregationConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3001
cors_origins = ["http://localhost:3000"]

[store]
seed_on_start = false

[aggregation]
utc_offset = "+09:00"
match_policy = "distinct_users"

[logging]
level = "debug"
"#;

        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert_eq!(config.server.cors_origins.len(), 1);
        assert!(!config.store.seed_on_start);
        assert_eq!(config.logging.level, "debug");

        let aggregation = config.aggregation_config().unwrap();
        assert_eq!(aggregation.offset.local_minus_utc(), 9 * 3600);
        assert_eq!(aggregation.match_policy, MatchPolicy::DistinctUsers);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_offset = "[aggregation]\nutc_offset = \"tokyo\"\n";
        assert!(matches!(
            AppConfig::from_toml_str(bad_offset),
            Err(ConfigError::Invalid(_))
        ));

        let bad_port = "[server]\nport = 0\n";
        assert!(matches!(
            AppConfig::from_toml_str(bad_port),
            Err(ConfigError::Invalid(_))
        ));

        let bad_policy = "[aggregation]\nmatch_policy = \"everyone\"\n";
        assert!(matches!(
            AppConfig::from_toml_str(bad_policy),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = AppConfig::from_file("/nonexistent/seelack.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("seelack.toml"));
    }
}
