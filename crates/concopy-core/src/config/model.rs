use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::DEFAULT_STORE_FILE;
use crate::dispatch::EngineOptions;
use crate::error::{ConcopyError, Result};

/// concopy.toml schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub engine: EngineOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Relative paths resolve against the config file's directory
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_FILE)
}

/// User settings, persisted alongside functions for UI collaborators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, alias = "defaultFormat")]
    pub default_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// Which result field a text-only sink prefers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

impl Config {
    /// Read concopy.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConcopyError::ConfigParseError(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConcopyError::ConfigParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Read concopy.toml, or return defaults if it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Write concopy.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConcopyError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content).map_err(ConcopyError::IoError)?;

        Ok(())
    }

    /// Store file location for a config read from `config_path`
    pub fn store_path(&self, config_path: impl AsRef<Path>) -> PathBuf {
        if self.store.path.is_absolute() {
            return self.store.path.clone();
        }
        match config_path.as_ref().parent() {
            Some(dir) => dir.join(&self.store.path),
            None => self.store.path.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConcopyError::ConfigInvalidValue {
                field: "store.path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::FallbackPolicy;
    use concopy_testkit::temp_dir_in_workspace;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store.path, PathBuf::from("functions.json"));
        assert_eq!(config.engine.fallback, FallbackPolicy::BestEffort);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[store]
path = "data/fns.json"

[settings]
theme = "dark"
default_format = "html"

[engine]
fallback = "reject"
classify_fallback = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.settings.theme, Theme::Dark);
        assert_eq!(config.settings.default_format, OutputFormat::Html);
        assert_eq!(config.engine.fallback, FallbackPolicy::Reject);
        assert!(config.engine.classify_fallback);
    }

    #[test]
    fn test_unknown_enum_value_names_field() {
        let err = toml::from_str::<Config>("[settings]\ntheme = \"neon\"").unwrap_err();
        assert!(err.to_string().contains("theme"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = temp_dir_in_workspace();
        let config = Config::load_or_default(temp.path().join("concopy.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("concopy.toml");
        std::fs::write(&path, "[store\npath = 1").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE_ERROR");
    }

    #[test]
    fn test_empty_store_path_is_invalid() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("concopy.toml");
        std::fs::write(&path, "[store]\npath = \"\"").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConcopyError::ConfigInvalidValue { ref field, .. } if field == "store.path"));
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("concopy.toml");
        let mut config = Config::default();
        config.settings.theme = Theme::Light;
        config.engine.classify_fallback = true;
        config.to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_store_path_resolves_against_config_dir() {
        let config = Config::default();
        assert_eq!(
            config.store_path("/home/u/.config/concopy.toml"),
            PathBuf::from("/home/u/.config/functions.json")
        );
        assert_eq!(config.store_path("concopy.toml"), PathBuf::from("functions.json"));
    }
}
