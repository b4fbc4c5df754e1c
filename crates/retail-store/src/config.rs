//! # Store Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     RETAIL_ROLE_FILE=/tmp/role                                          │
//! │     RETAIL_START_OFFLINE=1                                              │
//! │     RETAIL_SEED_DEMO=false                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/retail-flow/store.toml (Linux)                            │
//! │     ~/Library/Application Support/com.retail.retail-flow/store.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     demo data seeded, online, role file in the platform data dir        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! seed_demo_data = true
//! start_online = true
//! role_file = "/var/lib/retail-flow/retail-flow-role"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// File name of the persisted role.
pub const ROLE_FILE_NAME: &str = "retail-flow-role";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Start from the demo dataset instead of an empty state.
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,

    /// Initial value of the connectivity toggle.
    #[serde(default = "default_true")]
    pub start_online: bool,

    /// Where the last-selected role is kept. `None` means the platform
    /// data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            seed_demo_data: true,
            start_online: true,
            role_file: None,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading store config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    pub fn validate(&self) -> StoreResult<()> {
        if let Some(path) = &self.role_file {
            if path.as_os_str().is_empty() {
                return Err(StoreError::InvalidConfig(
                    "role_file must not be empty".into(),
                ));
            }
        }
        Ok(())
    }

    /// Applies `RETAIL_*` overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("RETAIL_ROLE_FILE") {
            debug!(path = %path, "Overriding role file from environment");
            self.role_file = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("RETAIL_START_OFFLINE") {
            match parse_flag(&value) {
                Some(offline) => self.start_online = !offline,
                None => warn!(value = %value, "Ignoring RETAIL_START_OFFLINE"),
            }
        }

        if let Some(value) = lookup("RETAIL_SEED_DEMO") {
            match parse_flag(&value) {
                Some(seed) => self.seed_demo_data = seed,
                None => warn!(value = %value, "Ignoring RETAIL_SEED_DEMO"),
            }
        }
    }

    /// The configured role file, or `<data dir>/retail-flow-role`.
    pub fn role_file_path(&self) -> Option<PathBuf> {
        self.role_file.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join(ROLE_FILE_NAME))
        })
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("store.toml"))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "retail", "retail-flow")
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.seed_demo_data);
        assert!(config.start_online);
        assert!(config.role_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "start_online = false\n").unwrap();

        let config = StoreConfig::from_file(&path).unwrap();
        assert!(!config.start_online);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(StoreConfig::from_file(&path).unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "start_online = \"maybe\"\n").unwrap();

        let err = StoreConfig::from_file(&path).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.toml");
        let config = StoreConfig {
            seed_demo_data: false,
            start_online: true,
            role_file: Some(dir.path().join("role")),
        };

        config.save(Some(path.clone())).unwrap();
        assert_eq!(StoreConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let mut config = StoreConfig::default();
        config.apply_overrides(env(&[
            ("RETAIL_ROLE_FILE", "/tmp/role"),
            ("RETAIL_START_OFFLINE", "yes"),
            ("RETAIL_SEED_DEMO", "0"),
        ]));

        assert_eq!(config.role_file, Some(PathBuf::from("/tmp/role")));
        assert!(!config.start_online);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_unparsable_override_is_ignored() {
        let mut config = StoreConfig::default();
        config.apply_overrides(env(&[("RETAIL_SEED_DEMO", "sometimes")]));
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_empty_role_file_is_invalid() {
        let config = StoreConfig {
            role_file: Some(PathBuf::new()),
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_explicit_role_file_wins() {
        let config = StoreConfig {
            role_file: Some(PathBuf::from("/srv/role")),
            ..StoreConfig::default()
        };
        assert_eq!(config.role_file_path(), Some(PathBuf::from("/srv/role")));
    }
}
