//! Configuration and constants for the report pipeline.

use super::error::ConfigError;
use crate::parser::DepthEncoding;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Objects at or below this duration (ms) are filtered from the top objects table
pub const OBJECT_TIME_THRESHOLD_MS: f64 = 0.02;

/// Number of objects kept when nothing passes the threshold
pub const FALLBACK_OBJECT_COUNT: usize = 10;

// Event log timestamps are in microseconds, the report works in milliseconds
pub const TIMESTAMP_SCALE: f64 = 1000.0;

/// Default number of repeated runs to average
pub const DEFAULT_RUNS: usize = 100;

// Node names with these prefixes are runtime noise, not heap objects
pub const IGNORED_NODE_PREFIXES: &[&str] = &[
    "v8-version",
    "v8-platform",
    "new",
    "heap-capacity",
    "heap-available",
    "function",
    "compilation-cache",
    "delete",
];

/// Marker that assigns a back-reference to the current object
pub const BACKREF_DEFINITION_MARKER: &str = "(set obj backref";

/// Node name for explicit back-reference nodes
pub const BACKREF_NODE_NAME: &str = "Backref";

/// Label used for scripts whose details event carried no name
pub const UNKNOWN_SCRIPT_NAME: &str = "Unknown";

pub const DESERIALIZER_SOURCE_ROOT: &str =
    "https://chromium.googlesource.com/v8/v8/+/refs/heads/roll/src/snapshot/deserializer.cc";

// Line anchors in the deserializer source for well-known bytecodes
pub const DESERIALIZER_SOURCE_LINES: &[(&str, &str)] = &[
    ("NewObject", "1081"),
    ("RootArray", "1146"),
    ("ReadOnlyHeapRef", "1120"),
    ("Backref", "1102"),
];

/// User-tunable report settings, loaded from TOML
///
/// Every field has a default so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Minimum object duration (ms) to appear in the top objects table
    pub object_threshold_ms: f64,

    /// Objects kept when none pass the threshold
    pub fallback_objects: usize,

    /// How tree-node depth is encoded in the trace
    pub depth_encoding: DepthEncoding,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            object_threshold_ms: OBJECT_TIME_THRESHOLD_MS,
            fallback_objects: FALLBACK_OBJECT_COUNT,
            depth_encoding: DepthEncoding::default(),
        }
    }
}

impl ReportConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.object_threshold_ms.is_finite() || self.object_threshold_ms < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "object_threshold_ms must be a non-negative number, got {}",
                self.object_threshold_ms
            )));
        }
        if self.fallback_objects == 0 {
            return Err(ConfigError::InvalidValue(
                "fallback_objects must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load report settings from a TOML file
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::InvalidValue` - If a value is out of range
///
/// # Example
/// ```ignore
/// let config = load_config("snapshot-trace.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReportConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading report config from: {}", path.display());
    let contents = fs::read_to_string(path)?;
    ReportConfig::from_toml(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = ReportConfig::from_toml(
            r#"
            object_threshold_ms = 0.5
            depth_encoding = "indentation"
            "#,
        )
        .unwrap();

        assert_eq!(config.object_threshold_ms, 0.5);
        assert_eq!(config.fallback_objects, FALLBACK_OBJECT_COUNT);
        assert_eq!(config.depth_encoding, DepthEncoding::Indentation);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let result = ReportConfig::from_toml("object_threshold_ms = -1.0");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_zero_fallback_rejected() {
        let result = ReportConfig::from_toml("fallback_objects = 0");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        fs::write(&path, "fallback_objects = 3\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.fallback_objects, 3);
    }
}
