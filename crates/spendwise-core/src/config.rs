//! Suggestion tuning configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendwise/config/suggest.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! `SPENDWISE_SUGGEST_TIMEOUT_SECS` overrides the timeout from either layer.
//! Backend selection itself is environment-driven, see [`crate::ai::AIClient::from_env`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/suggest.toml");

/// Environment variable overriding the backend request timeout
pub const TIMEOUT_ENV_VAR: &str = "SPENDWISE_SUGGEST_TIMEOUT_SECS";

/// Tuning for AI backend calls
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestConfig {
    /// Per-request timeout for backend calls
    pub timeout: Duration,
    /// Sampling temperature sent to the backend
    pub temperature: f32,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            temperature: 0.1,
        }
    }
}

impl SuggestConfig {
    /// Load from the default override location, then apply env overrides
    pub fn load() -> Result<Self> {
        let content = match default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => DEFAULT_CONFIG.to_string(),
        };
        let mut config = parse_config(&content)?;
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load from an explicit path (falls back to embedded defaults if missing)
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = if path.exists() {
            read_config(path)?
        } else {
            DEFAULT_CONFIG.to_string()
        };
        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("config").join("suggest.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Config(format!("Failed to read config: {}", e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    timeout_secs: Option<u64>,
    temperature: Option<f32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<SuggestConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = SuggestConfig::default();
    if let Some(timeout) = raw.timeout_secs {
        if timeout == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }
        config.timeout = Duration::from_secs(timeout);
    }
    if let Some(temperature) = raw.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::Config(format!(
                "temperature must be between 0 and 2, got {}",
                temperature
            )));
        }
        config.temperature = temperature;
    }

    Ok(config)
}

fn apply_env_overrides(config: &mut SuggestConfig) -> Result<()> {
    if let Ok(value) = std::env::var(TIMEOUT_ENV_VAR) {
        let secs: u64 = value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a number of seconds", TIMEOUT_ENV_VAR)))?;
        if secs > 0 {
            config.timeout = Duration::from_secs(secs);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("timeout_secs = 5").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.temperature, SuggestConfig::default().temperature);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            parse_config("timeout_secs = \"soon\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("timeout_secs = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("temperature = 7.5"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suggest.toml");
        fs::write(&path, "timeout_secs = 12\ntemperature = 0.0\n").unwrap();

        let config = SuggestConfig::load_from(&path).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SuggestConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, SuggestConfig::default());
    }
}
