//! Configuration management for visreg
//!
//! Repository-level settings live in `.visreg/config.toml`. They name the
//! session locations that carry configuration overrides, list the engine
//! messages that are safe to ignore, and can add repository-wide defaults for
//! the diffing engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::{Result, VisregError};

/// Repository-level visreg settings
///
/// Loaded from `.visreg/config.toml` in the repo root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisregSettings {
    /// Key under the session params holding `compareScreenshot` overrides
    #[serde(default = "default_params_key")]
    pub params_key: String,

    /// Session namespace holding `visualConfig.compareScreenshot` overrides
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Engine error fragments treated as success
    #[serde(default = "default_benign_errors")]
    pub benign_errors: Vec<String>,

    /// Repository-wide engine defaults, layered over the built-in defaults
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub compare_screenshot: Map<String, Value>,
}

// Default value providers
fn default_params_key() -> String {
    "skyuxVisualRegressionTestingConfig".to_string()
}

fn default_namespace() -> String {
    "skyE2E".to_string()
}

fn default_benign_errors() -> Vec<String> {
    vec!["saving current image".to_string()]
}

impl VisregSettings {
    /// Load settings from `.visreg/config.toml` or use defaults
    pub fn load_or_default(repo_root: &Path) -> Result<Self> {
        let config_path = repo_root.join(".visreg/config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| VisregError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Write default settings to `.visreg/config.toml`
    pub fn write_default(repo_root: &Path) -> Result<()> {
        let config_dir = repo_root.join(".visreg");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| VisregError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for VisregSettings {
    fn default() -> Self {
        Self {
            params_key: default_params_key(),
            namespace: default_namespace(),
            benign_errors: default_benign_errors(),
            compare_screenshot: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = VisregSettings::default();
        assert_eq!(settings.params_key, "skyuxVisualRegressionTestingConfig");
        assert_eq!(settings.namespace, "skyE2E");
        assert_eq!(settings.benign_errors, vec!["saving current image"]);
        assert!(settings.compare_screenshot.is_empty());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = VisregSettings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings, VisregSettings::default());
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        VisregSettings::write_default(dir.path()).unwrap();
        assert!(dir.path().join(".visreg/config.toml").exists());

        let settings = VisregSettings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings, VisregSettings::default());
    }

    #[test]
    fn test_partial_file() {
        let settings = VisregSettings::from_toml(
            r#"
namespace = "e2e"

[compare_screenshot]
width = 1440
basePath = "visual/baseline"
"#,
        )
        .unwrap();

        assert_eq!(settings.namespace, "e2e");
        assert_eq!(settings.params_key, "skyuxVisualRegressionTestingConfig");
        assert_eq!(settings.compare_screenshot.get("width"), Some(&json!(1440)));
        assert_eq!(
            settings.compare_screenshot.get("basePath"),
            Some(&json!("visual/baseline"))
        );
    }

    #[test]
    fn test_invalid_file() {
        let err = VisregSettings::from_toml("namespace = [").unwrap_err();
        assert!(matches!(err, VisregError::Config(_)));
    }
}
