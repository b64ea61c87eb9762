//! Project configuration (`weave.config.json`).
//!
//! Every field is optional in the file; command-line flags override whatever
//! is loaded here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::binder::VariableBindings;
use crate::error::{Result, WeaveError};
use crate::resolver::DEFAULT_MAX_DEPTH;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "weave.config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// Directory templates are looked up in. Defaults to the input file's directory.
    pub template_dir: Option<PathBuf>,
    /// Maximum template nesting depth.
    pub max_depth: usize,
    /// Default variable bindings, overridden by `--vars` and `--vars-file`.
    pub variables: Map<String, Value>,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            max_depth: DEFAULT_MAX_DEPTH,
            variables: Map::new(),
        }
    }
}

impl WeaveConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WeaveError::ConfigNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| WeaveError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `path` if given, else `weave.config.json` in `dir` if present,
    /// else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if candidate.is_file() {
                    tracing::debug!("using config {}", candidate.display());
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| WeaveError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn bindings(&self) -> VariableBindings {
        VariableBindings::from_map(self.variables.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_object() {
        let config: WeaveConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WeaveConfig::default());
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = WeaveConfig {
            template_dir: Some(PathBuf::from("templates")),
            max_depth: 4,
            ..WeaveConfig::default()
        };
        config.variables.insert("team".into(), Value::from("core"));
        config.save(&path).unwrap();

        let loaded = WeaveConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.bindings().len(), 1);
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WeaveConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, WeaveConfig::default());
    }

    #[test]
    fn test_discover_finds_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"max_depth": 2}"#).unwrap();
        let config = WeaveConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.max_depth, 2);
    }

    #[test]
    fn test_load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = WeaveConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(WeaveError::ConfigNotFound { .. })));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            WeaveConfig::load(&bad),
            Err(WeaveError::ConfigParse { .. })
        ));
    }
}
