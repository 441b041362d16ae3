//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Trend engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendConfig {
    /// Seconds between automatic resets when activation gives no explicit
    /// interval. Zero disables auto-reset by default.
    #[serde(default = "default_reset_interval_secs")]
    pub reset_interval_secs: u64,
    /// Number of entries in the before-reset report.
    #[serde(default = "default_report_size")]
    pub report_size: usize,
    /// Maximum number of chats the registry will create lazily.
    #[serde(default = "default_max_chats")]
    pub max_chats: usize,
    /// Maximum distinct tags tracked per chat.
    #[serde(default = "default_max_tags_per_chat")]
    pub max_tags_per_chat: usize,
}

impl TrendConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: TrendConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// The default auto-reset interval as a [`Duration`].
    pub fn reset_interval(&self) -> Duration {
        Duration::from_secs(self.reset_interval_secs)
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            reset_interval_secs: default_reset_interval_secs(),
            report_size: default_report_size(),
            max_chats: default_max_chats(),
            max_tags_per_chat: default_max_tags_per_chat(),
        }
    }
}

/// 24 hours: the out-of-the-box auto-reset cadence.
fn default_reset_interval_secs() -> u64 {
    86_400
}

fn default_report_size() -> usize {
    10
}

fn default_max_chats() -> usize {
    10_000
}

fn default_max_tags_per_chat() -> usize {
    50_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = TrendConfig::default();
        assert_eq!(config.reset_interval_secs, 86_400);
        assert_eq!(config.reset_interval(), Duration::from_secs(86_400));
        assert_eq!(config.report_size, 10);
        assert_eq!(config.max_chats, 10_000);
        assert_eq!(config.max_tags_per_chat, 50_000);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: TrendConfig = toml::from_str("reset_interval_secs = 120").unwrap();
        assert_eq!(config.reset_interval_secs, 120);
        assert_eq!(config.report_size, 10);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "report_size = 5\nmax_chats = 100").unwrap();
        let config = TrendConfig::load(file.path()).unwrap();
        assert_eq!(config.report_size, 5);
        assert_eq!(config.max_chats, 100);
        assert_eq!(config.reset_interval_secs, 86_400);
    }

    #[test]
    fn load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "report_size = \"many\"").unwrap();
        assert!(matches!(
            TrendConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            TrendConfig::load("/nonexistent/tagwatch.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
