//! CLI configuration management.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file, then
//! environment variables (a `.env` file in the working directory counts).

use std::path::PathBuf;

use anyhow::{Context, Result};
use circuitz_core::{GraphConfig, DEFAULT_CLOCK_PERIOD_MS, MIN_CLOCK_PERIOD_MS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Overrides the directory holding `config.json`.
pub const CONFIG_DIR_ENV: &str = "CIRCUITZ_CONFIG_DIR";

const CLOCK_PERIOD_ENV: &str = "CIRCUITZ_CLOCK_PERIOD_MS";
const VERIFY_ENV: &str = "CIRCUITZ_VERIFY";

/// Application-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Period of newly created clocks, in milliseconds.
    pub clock_period_ms: u64,

    /// Check the connection invariant after every graph mutation.
    pub verify_consistency: bool,

    /// Samples printed by `circuitz clock` when `--samples` is omitted.
    pub clock_samples: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_period_ms: DEFAULT_CLOCK_PERIOD_MS,
            verify_consistency: true,
            clock_samples: 8,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = match Self::config_file_path() {
            Some(config_path) if config_path.exists() => {
                let contents = std::fs::read_to_string(&config_path).with_context(|| {
                    format!("Failed to read config from {}", config_path.display())
                })?;
                serde_json::from_str(&contents).with_context(|| {
                    format!("Failed to parse config file {}", config_path.display())
                })?
            }
            _ => Self::default(),
        };

        if let Ok(period) = std::env::var(CLOCK_PERIOD_ENV) {
            config.clock_period_ms = period
                .trim()
                .parse()
                .with_context(|| format!("{CLOCK_PERIOD_ENV} must be a whole number of ms"))?;
        }
        if let Ok(verify) = std::env::var(VERIFY_ENV) {
            config.verify_consistency = parse_flag(&verify)
                .with_context(|| format!("{VERIFY_ENV} must be true or false, got {verify:?}"))?;
        }

        config.clock_period_ms = config.clock_period_ms.max(MIN_CLOCK_PERIOD_MS);
        Ok(config)
    }

    /// Save current configuration to the config file.
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&config_path, contents)
                .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("config.json"));
        }
        ProjectDirs::from("dev", "circuitz", "circuitz")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Graph settings derived from this configuration.
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            verify_consistency: self.verify_consistency,
            ..GraphConfig::default()
        }
        .with_clock_period_ms(self.clock_period_ms)
    }
}

/// Parse a boolean-ish flag value.
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("not a boolean: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag(" on ").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_graph_config_from_cli_config() {
        let config = Config {
            clock_period_ms: 0,
            verify_consistency: false,
            clock_samples: 3,
        };
        let graph = config.graph_config();
        assert_eq!(graph.default_clock_period_ms, MIN_CLOCK_PERIOD_MS);
        assert!(!graph.verify_consistency);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"clock_samples": 2}"#).unwrap();
        assert_eq!(config.clock_samples, 2);
        assert_eq!(config.clock_period_ms, DEFAULT_CLOCK_PERIOD_MS);
    }
}
