//! Charmix configuration
//!
//! Optional TOML file; every section falls back to its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "charmix.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CharmixConfig {
    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub batch: BatchSettings,
}

impl CharmixConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// An explicit path must exist; otherwise use `charmix.toml` if present,
    /// else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(Path::new(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("Log level cannot be empty".to_string()));
        }
        EnvFilter::try_new(&self.logging.level)
            .map_err(|e| ConfigError::Invalid(format!("Bad log level '{}': {}", self.logging.level, e)))?;
        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `spells=debug`
    pub level: String,

    /// Emit logs as JSON lines
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "warn".to_string(), json: false }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON results
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Batch checking settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Check batch entries on the rayon pool
    pub parallel: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { parallel: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: CharmixConfig = toml::from_str("[output]\npretty = false\n").unwrap();
        assert!(!config.output.pretty);
        assert_eq!(config.logging, LoggingSettings::default());
        assert!(config.batch.parallel);
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("charmix.toml");
        let mut config = CharmixConfig::default();
        config.logging.level = "spells=debug".into();
        config.batch.parallel = false;
        config.save(&path).unwrap();
        assert_eq!(CharmixConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = CharmixConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(CharmixConfig::resolve(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn bad_level_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("charmix.toml");
        fs::write(&path, "[logging]\nlevel = \"\"\n").unwrap();
        assert!(matches!(CharmixConfig::load(&path), Err(ConfigError::Invalid(_))));
        fs::write(&path, "[logging]\nlevel = \"spells=notalevel\"\n").unwrap();
        assert!(matches!(CharmixConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("charmix.toml");
        fs::write(&path, "[output\npretty = ").unwrap();
        assert!(matches!(CharmixConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
