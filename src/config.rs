//! Configuration management
//!
//! Loads engine settings from a TOML file, falling back to defaults for any
//! omitted section.

use crate::error::ConfigError;
use crate::simulate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub simulator: SimulatorConfig,
    pub services: ServicesConfig,
}

/// Event store settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of events retained before FIFO eviction
    pub capacity: usize,
}

/// Synthetic traffic settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Seconds between generated events (also the alert evaluation tick)
    pub interval_seconds: u64,
    /// Number of historical events to seed at startup
    pub seed_events: usize,
}

/// Service catalog settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    /// Services always included in health reports
    pub names: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 5,
            seed_events: 100,
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            names: simulate::SERVICES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            simulator: SimulatorConfig::default(),
            services: ServicesConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read,
    /// `ConfigError::TomlError` if it is not valid TOML, or
    /// `ConfigError::ValidationError` if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every configured value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "store.capacity must be at least 1".to_string(),
            ));
        }
        if self.simulator.interval_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "simulator.interval_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.capacity, 1000);
        assert_eq!(config.simulator.interval_seconds, 5);
        assert_eq!(config.simulator.seed_events, 100);
        assert_eq!(config.services.names.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
capacity = 500

[services]
names = ["checkout", "search"]
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.store.capacity, 500);
        assert_eq!(config.services.names, vec!["checkout", "search"]);
        // Omitted section keeps defaults
        assert_eq!(config.simulator.interval_seconds, 5);
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file(Path::new("/nonexistent/pulse.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "store = not toml").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.store.capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.simulator.interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
