//! Configuration for the stationary drift agent.

use crate::core::detector::DetectorConfig;
use crate::core::drift::GPS_DRIFT_SPEED_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stationary detector tuning
    pub detector: DetectorConfig,

    /// GPS speed above which a fix on a stationary device is drift (m/s)
    pub drift_speed_threshold: f64,

    /// Nominal accelerometer sampling interval requested from the platform
    pub sample_interval_ms: u64,

    /// Directory for session reports
    pub report_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stationary-drift-agent");

        Self {
            detector: DetectorConfig::default(),
            drift_speed_threshold: GPS_DRIFT_SPEED_THRESHOLD,
            sample_interval_ms: 100, // 10 Hz
            report_path: data_dir.join("reports"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration JSON. Missing fields take defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stationary-drift-agent")
            .join("config.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        if !(self.drift_speed_threshold.is_finite() && self.drift_speed_threshold >= 0.0) {
            return Err(ConfigError::Invalid(
                "drift_speed_threshold must be a non-negative number".to_string(),
            ));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "sample_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.detector.history_duration_ms, 2000);
        assert_eq!(config.detector.mean_threshold, 0.3);
        assert_eq!(config.detector.std_threshold, 0.2);
        assert_eq!(config.detector.stationary_duration_ms, 2000);
        assert_eq!(config.detector.min_sample_count, 10);
        assert_eq!(config.drift_speed_threshold, 0.3);
        assert_eq!(config.sample_interval_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            Config::from_json(r#"{"detector":{"min_sample_count":5},"sample_interval_ms":50}"#)
                .unwrap();
        assert_eq!(config.detector.min_sample_count, 5);
        assert_eq!(config.detector.mean_threshold, 0.3);
        assert_eq!(config.sample_interval_ms, 50);
        assert_eq!(config.drift_speed_threshold, 0.3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"drift_speed_threshold":-1.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"detector":{"history_duration_ms":0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_preserves_tuning() {
        let mut config = Config::default();
        config.detector.stationary_duration_ms = 3500;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
