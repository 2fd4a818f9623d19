//! Guard configuration
//!
//! Serde-backed settings with JSON persistence. Everything has a default so
//! an empty file (or no file) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::interceptor::types::ServerInfo;

/// Configuration for the protection core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Application identifier stamped into every log record
    #[serde(default)]
    pub app_id: String,
    /// Host metadata stamped into every log record
    #[serde(default)]
    pub server: ServerInfo,
    /// Maximum stack frames captured into log records
    #[serde(default = "default_max_stack_depth")]
    pub max_stack_depth: usize,
}

fn default_max_stack_depth() -> usize {
    16
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            server: ServerInfo::default(),
            max_stack_depth: default_max_stack_depth(),
        }
    }
}

impl GuardConfig {
    /// Load configuration from a JSON file; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GuardConfig::default();
        assert_eq!(config.max_stack_depth, 16);
        assert!(config.app_id.is_empty());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GuardConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.max_stack_depth, 16);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.json");

        let mut config = GuardConfig::default();
        config.app_id = "orders-api".to_string();
        config.max_stack_depth = 4;
        config.save(&path).unwrap();

        let loaded = GuardConfig::load(&path).unwrap();
        assert_eq!(loaded.app_id, "orders-api");
        assert_eq!(loaded.max_stack_depth, 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.json");
        std::fs::write(&path, r#"{"app_id":"x"}"#).unwrap();

        let loaded = GuardConfig::load(&path).unwrap();
        assert_eq!(loaded.app_id, "x");
        assert_eq!(loaded.max_stack_depth, 16);
    }
}
