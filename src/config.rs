//! Configuration module
//!
//! Reads the application configuration from a TOML file
//! (`~/.config/turf-booking/config.toml` by default). Every section has
//! sensible defaults so a missing file or a partial file still works.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("turf-booking")
        .join("config.toml")
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    /// Facilities this deployment manages
    #[serde(default = "default_facilities")]
    pub facilities: Vec<FacilityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            engine: EngineSettings::default(),
            facilities: default_facilities(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "turf_booking=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// How long a held slot waits for payment before being released
    #[serde(default = "default_hold_timeout_secs")]
    pub hold_timeout_secs: u64,
    /// Interval of the weather/completion reconciliation sweep
    #[serde(default = "default_reconcile_interval_secs")]
    pub reconcile_interval_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            hold_timeout_secs: default_hold_timeout_secs(),
            reconcile_interval_secs: default_reconcile_interval_secs(),
        }
    }
}

fn default_hold_timeout_secs() -> u64 {
    120
}

fn default_reconcile_interval_secs() -> u64 {
    60
}

/// A bookable facility (a single pitch/turf)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityConfig {
    pub id: String,
    pub name: String,
}

fn default_facilities() -> Vec<FacilityConfig> {
    vec![FacilityConfig {
        id: "main-ground".to_string(),
        name: "Main Cricket Ground".to_string(),
    }]
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.engine.hold_timeout_secs, 120);
        assert_eq!(cfg.engine.reconcile_interval_secs, 60);
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [[facilities]]
            id = "practice-net-1"
            name = "Practice Net 1"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.logging.level, "debug");
        // Unspecified engine section falls back to defaults
        assert_eq!(cfg.engine.hold_timeout_secs, 120);
        assert_eq!(cfg.facilities.len(), 1);
        assert_eq!(cfg.facilities[0].id, "practice-net-1");
    }

    #[test]
    fn empty_toml_uses_default_facility() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.facilities.len(), 1);
        assert_eq!(cfg.facilities[0].id, "main-ground");
    }
}
