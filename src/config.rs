//! Engine settings stored as JSON.
//!
//! Names the behavior file and the dispatch pattern, and carries undo limits,
//! picking precision and log verbosity. Missing fields fall back to defaults so
//! older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_GLOBAL_PATTERN, DEFAULT_JURISDICTION_THRESHOLD, DEFAULT_POINT_PRECISION,
    DEFAULT_UNDO_HISTORY,
};

/// Verbosity handed to the logger by [`init_logging`](crate::init_logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    /// Structural findings in behavior files are warnings
    #[default]
    Warn,
    /// Adds load summaries
    Info,
    /// Adds state changes and dispatcher list changes
    Debug,
    Trace,
}

impl LogLevel {
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Format version written into every configuration file.
pub const CONFIG_VERSION: u32 = 1;

/// Interaction engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub version: u32,

    /// Behavior XML holding the event table and state machine patterns
    #[serde(default)]
    pub behavior_file: Option<PathBuf>,

    /// Pattern that drives the global dispatcher.
    /// An empty name selects the built-in dispatch protocol.
    #[serde(default = "default_global_pattern")]
    pub global_pattern: String,

    /// Undo settings
    #[serde(default)]
    pub undo: UndoSettings,

    /// Minimum jurisdiction score an interactor must exceed to be asked
    #[serde(default = "default_jurisdiction_threshold")]
    pub jurisdiction_threshold: f32,

    /// Picking precision for point set interactors, in world units
    #[serde(default = "default_point_precision")]
    pub point_precision: f64,

    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_global_pattern() -> String {
    DEFAULT_GLOBAL_PATTERN.to_string()
}

fn default_jurisdiction_threshold() -> f32 {
    DEFAULT_JURISDICTION_THRESHOLD
}

fn default_point_precision() -> f64 {
    DEFAULT_POINT_PRECISION
}

/// Undo section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoSettings {
    /// Record state changes and data operations for undo
    #[serde(default = "default_undo_enabled")]
    pub enabled: bool,

    /// Maximum number of operations to keep in history
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_undo_enabled() -> bool {
    true
}

fn default_max_history() -> usize {
    DEFAULT_UNDO_HISTORY
}

impl Default for UndoSettings {
    fn default() -> Self {
        Self {
            enabled: default_undo_enabled(),
            max_history: default_max_history(),
        }
    }
}

impl InteractionConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            behavior_file: None,
            global_pattern: default_global_pattern(),
            undo: UndoSettings::default(),
            jurisdiction_threshold: default_jurisdiction_threshold(),
            point_precision: default_point_precision(),
            log_level: LogLevel::default(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a configuration, rejecting files written by a newer format.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                found: config.version,
                supported: CONFIG_VERSION,
            });
        }
        Ok(config)
    }

    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Write the configuration, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("💾 Interaction settings written to {:?}", path);
        Ok(())
    }

    pub fn default_filename() -> &'static str {
        "mitk-interaction.json"
    }

    /// `<config dir>/mitk/mitk-interaction.json`, or `~/.config/mitk/...` when
    /// the platform has no config directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("mitk").join(Self::default_filename()))
    }

    /// Settings from [`default_path`](Self::default_path), if a readable file
    /// is there. Problems are logged and yield `None`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No interaction settings at {:?}", path);
            return None;
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Interaction settings read from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Ignoring interaction settings {:?}: {}", path, e);
                None
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(path)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors reading or writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration version {found} is newer than the supported version {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("Configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The platform reports neither a config nor a home directory
    #[error("No configuration directory available")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InteractionConfig::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.global_pattern, "global");
        assert_eq!(config.jurisdiction_threshold, 0.0);
        assert_eq!(config.point_precision, 5.0);
        assert!(config.undo.enabled);
        assert_eq!(config.undo.max_history, 100);
    }

    #[test]
    fn test_json_roundtrip_keeps_settings() {
        let mut config = InteractionConfig::new();
        config.global_pattern = String::new();
        config.behavior_file = Some(PathBuf::from("behavior.xml"));
        config.log_level = LogLevel::Debug;

        let json = config.to_json().unwrap();
        let loaded = InteractionConfig::from_json(&json).unwrap();
        assert_eq!(loaded.global_pattern, "");
        assert_eq!(loaded.behavior_file, Some(PathBuf::from("behavior.xml")));
        assert_eq!(loaded.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded = InteractionConfig::from_json(r#"{ "version": 1 }"#).unwrap();
        assert_eq!(loaded.global_pattern, "global");
        assert_eq!(loaded.undo, UndoSettings::default());
        assert_eq!(loaded.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = InteractionConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                found: 99,
                supported: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("mitk-config-test-{}", std::process::id()))
            .join(InteractionConfig::default_filename());
        let mut config = InteractionConfig::new();
        config.point_precision = 2.5;
        config.save(&path).unwrap();

        let loaded = InteractionConfig::load(&path).unwrap();
        assert_eq!(loaded.point_precision, 2.5);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        assert!(matches!(
            InteractionConfig::load(&path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
        assert_eq!(LogLevel::Error.name(), "Error");
    }
}
