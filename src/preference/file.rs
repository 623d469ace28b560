//! File-backed preference store.
//!
//! The backing file is a flat JSON object of string keys to string values.
//! The pack cost sits under a single key as a decimal string, e.g.
//! `{"smoke-check-pack-cost": "200"}`. Other keys in the file are preserved
//! on write.

use super::{PackCost, PreferenceError, PreferenceStore, PACK_COST_KEY};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

type Slots = BTreeMap<String, String>;

/// Preference store persisted to a JSON key-value file.
///
/// The file is read once on [`open`](Self::open); later reads are served
/// from memory. Every successful `set` rewrites the file atomically.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    key: String,
    slots: RwLock<Slots>,
}

impl FilePreferenceStore {
    /// Open the store at `path` using the default key.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        Self::open_with_key(path, PACK_COST_KEY)
    }

    /// Open the store at `path`, keeping the pack cost under `key`.
    ///
    /// A missing file means no value has been set yet.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read, is not a JSON object of
    /// strings, or holds a value under `key` that is not a positive decimal.
    pub fn open_with_key(
        path: impl Into<PathBuf>,
        key: impl Into<String>,
    ) -> Result<Self, PreferenceError> {
        let path = path.into();
        let key = key.into();
        let slots = read_slots(&path)?;

        if let Some(raw) = slots.get(&key) {
            parse_slot(&path, raw)?;
        }

        tracing::debug!(path = %path.display(), key = %key, "preference store opened");
        Ok(Self {
            path,
            key,
            slots: RwLock::new(slots),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, slots: &Slots) -> Result<(), PreferenceError> {
        let io = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(slots).map_err(|e| PreferenceError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io)?;
        }

        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json).map_err(io)?;
        fs::rename(&temp, &self.path).map_err(io)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self) -> Option<PackCost> {
        let slots = self.slots.read().unwrap_or_else(|p| p.into_inner());
        slots
            .get(&self.key)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .and_then(|value| PackCost::new(value).ok())
    }

    fn set(&self, value: f64) -> Result<PackCost, PreferenceError> {
        let cost = PackCost::new(value)?;
        let mut slots = self.slots.write().unwrap_or_else(|p| p.into_inner());

        let mut next = slots.clone();
        next.insert(self.key.clone(), cost.to_string());
        self.persist(&next)?;
        *slots = next;

        tracing::info!(pack_cost = %cost, path = %self.path.display(), "pack cost stored");
        Ok(cost)
    }
}

fn read_slots(path: &Path) -> Result<Slots, PreferenceError> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(Slots::new()),
        Ok(content) => serde_json::from_str(&content).map_err(|e| PreferenceError::Format {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Slots::new()),
        Err(source) => Err(PreferenceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_slot(path: &Path, raw: &str) -> Result<PackCost, PreferenceError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| PreferenceError::Format {
            path: path.to_path_buf(),
            message: format!("{raw:?} is not a decimal: {e}"),
        })?;
    PackCost::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_unset() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::open(dir.path().join("prefs.json")).unwrap();

        assert!(store.get().is_none());
    }

    #[test]
    fn value_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        FilePreferenceStore::open(&path).unwrap().set(200.0).unwrap();
        let reopened = FilePreferenceStore::open(&path).unwrap();

        assert_eq!(reopened.get().map(PackCost::value), Some(200.0));
    }

    #[test]
    fn value_is_written_as_decimal_string() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        FilePreferenceStore::open(&path).unwrap().set(12.5).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get(PACK_COST_KEY).map(String::as_str), Some("12.5"));
    }

    #[test]
    fn other_keys_are_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        FilePreferenceStore::open(&path).unwrap().set(90.0).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(raw.get(PACK_COST_KEY).map(String::as_str), Some("90"));
    }

    #[test]
    fn invalid_set_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let store = FilePreferenceStore::open(&path).unwrap();

        assert!(matches!(
            store.set(0.0),
            Err(PreferenceError::InvalidPreference { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FilePreferenceStore::open(&path),
            Err(PreferenceError::Format { .. })
        ));
    }

    #[test]
    fn non_positive_stored_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"smoke-check-pack-cost": "0"}"#).unwrap();

        assert!(FilePreferenceStore::open(&path).is_err());
    }

    #[test]
    fn custom_key_is_honoured() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        let store = FilePreferenceStore::open_with_key(&path, "pack").unwrap();
        store.set(40.0).unwrap();

        assert!(FilePreferenceStore::open(&path).unwrap().get().is_none());
        assert_eq!(
            FilePreferenceStore::open_with_key(&path, "pack")
                .unwrap()
                .get()
                .map(PackCost::value),
            Some(40.0)
        );
    }
}
