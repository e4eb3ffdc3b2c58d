//! Configuration management for HUSH
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::aggregation::FeatureWeights;
use crate::error::{HushError, Result};
use crate::privacy::DEFAULT_NOISE_SCALE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for HUSH
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Snapshot database settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Noise injection settings
    #[serde(default)]
    pub privacy: PrivacyConfig,
    /// Accumulator settings
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:8000`
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "hush.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Differential-privacy simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyConfig {
    /// Scale of the Laplace noise added to each contribution
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,
}

fn default_noise_scale() -> f64 {
    DEFAULT_NOISE_SCALE
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            noise_scale: default_noise_scale(),
        }
    }
}

/// Aggregation configuration
///
/// The accumulator starts from `initial_weights` on every process start;
/// it is not restored from stored snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub initial_weights: FeatureWeights,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(HushError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(HushError::from)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(bind_addr) = std::env::var("HUSH_BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }

        if let Ok(db_path) = std::env::var("HUSH_DB_PATH") {
            self.storage.db_path = db_path;
        }

        if let Ok(scale) = std::env::var("HUSH_NOISE_SCALE") {
            if let Ok(value) = scale.parse() {
                self.privacy.noise_scale = value;
            } else {
                tracing::warn!("Invalid HUSH_NOISE_SCALE: {}", scale);
            }
        }

        if let Ok(json) = std::env::var("HUSH_LOG_JSON") {
            match json.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.logging.json = true,
                "0" | "false" | "no" => self.logging.json = false,
                other => tracing::warn!("Invalid HUSH_LOG_JSON: {}", other),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(db_path) = &cli.db_path {
            self.storage.db_path = db_path.clone();
        }

        if let Some(crate::cli::Commands::Serve {
            bind: Some(bind), ..
        }) = &cli.command
        {
            self.server.bind_addr = bind.clone();
        }

        if cli.json_logs {
            self.logging.json = true;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(HushError::Config("server.bind_addr cannot be empty".to_string()).into());
        }

        if self.storage.db_path.trim().is_empty() {
            return Err(HushError::Config("storage.db_path cannot be empty".to_string()).into());
        }

        if !self.privacy.noise_scale.is_finite() || self.privacy.noise_scale < 0.0 {
            return Err(HushError::Config(format!(
                "privacy.noise_scale must be a finite, non-negative number, got {}",
                self.privacy.noise_scale
            ))
            .into());
        }

        if !self.aggregation.initial_weights.is_finite() {
            return Err(HushError::Config(
                "aggregation.initial_weights must be finite".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use serial_test::serial;

    fn bare_cli() -> Cli {
        Cli {
            config: None,
            verbose: false,
            db_path: None,
            json_logs: false,
            command: None,
        }
    }

    fn clear_env() {
        for key in [
            "HUSH_BIND_ADDR",
            "HUSH_DB_PATH",
            "HUSH_NOISE_SCALE",
            "HUSH_LOG_JSON",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.storage.db_path, "hush.db");
        assert_eq!(config.privacy.noise_scale, 0.1);
        assert_eq!(
            config.aggregation.initial_weights,
            FeatureWeights::new(0.33, 0.33, 0.34)
        );
        assert!(!config.logging.json);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_bind_addr() {
        let mut config = Config::default();
        config.server.bind_addr = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_db_path() {
        let mut config = Config::default();
        config.storage.db_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_negative_noise_scale() {
        let mut config = Config::default();
        config.privacy.noise_scale = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_nan_initial_weight() {
        let mut config = Config::default();
        config.aggregation.initial_weights.voice = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_zero_noise_scale_is_valid() {
        let mut config = Config::default();
        config.privacy.noise_scale = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
server:
  bind_addr: "127.0.0.1:9000"
storage:
  db_path: "/tmp/hush-test.db"
privacy:
  noise_scale: 0.25
aggregation:
  initial_weights:
    text: 0.5
    typing: 0.25
    voice: 0.25
logging:
  json: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.storage.db_path, "/tmp/hush-test.db");
        assert_eq!(config.privacy.noise_scale, 0.25);
        assert_eq!(config.aggregation.initial_weights.text, 0.5);
        assert!(config.logging.json);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("privacy:\n  noise_scale: 0.5\n").unwrap();
        assert_eq!(config.privacy.noise_scale, 0.5);
        assert_eq!(config.server.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.storage.db_path, "hush.db");
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let config = Config::load("/nonexistent/hush/config.yaml", &bare_cli()).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.storage.db_path, "hush.db");
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_is_yaml_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server: [unterminated").unwrap();
        let err = Config::load(path.to_str().unwrap(), &bare_cli()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HushError>(),
            Some(HushError::Yaml(_))
        ));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    #[serial]
    fn test_load_unreadable_path_is_io_error() {
        clear_env();
        // a directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().to_str().unwrap(), &bare_cli()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HushError>(),
            Some(HushError::Io(_))
        ));
    }

    #[test]
    fn test_validation_error_is_config_error() {
        let mut config = Config::default();
        config.storage.db_path = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HushError>(),
            Some(HushError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_env_vars_override_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "storage:\n  db_path: from-file.db\n").unwrap();

        std::env::set_var("HUSH_DB_PATH", "from-env.db");
        std::env::set_var("HUSH_NOISE_SCALE", "0.3");
        std::env::set_var("HUSH_LOG_JSON", "true");
        let config = Config::load(path.to_str().unwrap(), &bare_cli()).unwrap();
        clear_env();

        assert_eq!(config.storage.db_path, "from-env.db");
        assert_eq!(config.privacy.noise_scale, 0.3);
        assert!(config.logging.json);
    }

    #[test]
    #[serial]
    fn test_invalid_env_noise_scale_is_ignored() {
        clear_env();
        std::env::set_var("HUSH_NOISE_SCALE", "lots");
        let config = Config::load("/nonexistent/config.yaml", &bare_cli()).unwrap();
        clear_env();
        assert_eq!(config.privacy.noise_scale, 0.1);
    }

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        clear_env();
        std::env::set_var("HUSH_DB_PATH", "from-env.db");
        std::env::set_var("HUSH_BIND_ADDR", "127.0.0.1:1111");

        let mut cli = bare_cli();
        cli.db_path = Some("from-cli.db".to_string());
        cli.command = Some(Commands::Serve {
            bind: Some("127.0.0.1:2222".to_string()),
        });
        let config = Config::load("/nonexistent/config.yaml", &cli).unwrap();
        clear_env();

        assert_eq!(config.storage.db_path, "from-cli.db");
        assert_eq!(config.server.bind_addr, "127.0.0.1:2222");
    }
}
