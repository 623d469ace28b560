//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! choice_delay_ms = 350
//! confirm_delay_ms = 0
//! preference_key = "smoke-check-pack-cost"
//! preference_path = "/home/me/.config/checkin/preferences.json"
//! ```
//!
//! Every field is optional. Without `preference_path` the pack cost is kept
//! in memory only.

use crate::preference::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, PACK_COST_KEY,
};
use crate::scheduler::{DelayPolicy, CHOICE_CONFIRMATION_DELAY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {path:?} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckInConfig {
    /// Pause after a choice tap before the screen changes
    pub choice_delay_ms: u64,
    /// Pause after text confirmation or a button press
    pub confirm_delay_ms: u64,
    /// Key of the pack-cost slot in the preference file
    pub preference_key: String,
    /// Preference file; `None` keeps the preference in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_path: Option<PathBuf>,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            choice_delay_ms: CHOICE_CONFIRMATION_DELAY.as_millis() as u64,
            confirm_delay_ms: 0,
            preference_key: PACK_COST_KEY.to_string(),
            preference_path: None,
        }
    }
}

impl CheckInConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy {
            choice_confirmation: Duration::from_millis(self.choice_delay_ms),
            immediate: Duration::from_millis(self.confirm_delay_ms),
        }
    }

    /// Open the preference store this config describes.
    pub fn open_store(&self) -> Result<Arc<dyn PreferenceStore>, PreferenceError> {
        match &self.preference_path {
            Some(path) => Ok(Arc::new(FilePreferenceStore::open_with_key(
                path,
                self.preference_key.clone(),
            )?)),
            None => Ok(Arc::new(MemoryPreferenceStore::new())),
        }
    }
}
