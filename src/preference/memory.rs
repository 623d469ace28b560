//! In-process preference store.

use super::{PackCost, PreferenceError, PreferenceStore};
use std::sync::RwLock;

/// Preference store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    value: RwLock<Option<PackCost>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a pack cost.
    pub fn with_value(value: f64) -> Result<Self, PreferenceError> {
        Ok(Self {
            value: RwLock::new(Some(PackCost::new(value)?)),
        })
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self) -> Option<PackCost> {
        *self.value.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set(&self, value: f64) -> Result<PackCost, PreferenceError> {
        let cost = PackCost::new(value)?;
        *self
            .value
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(cost);
        tracing::info!(pack_cost = %cost, "pack cost stored");
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_unset() {
        let store = MemoryPreferenceStore::new();
        assert!(store.get().is_none());
        assert!(!store.is_set());
    }

    #[test]
    fn set_then_get_returns_value() {
        let store = MemoryPreferenceStore::new();
        store.set(200.0).unwrap();

        assert_eq!(store.get().map(PackCost::value), Some(200.0));
    }

    #[test]
    fn rejected_set_keeps_previous_value() {
        let store = MemoryPreferenceStore::with_value(150.0).unwrap();

        assert!(store.set(0.0).is_err());
        assert!(store.set(-10.0).is_err());
        assert_eq!(store.get().map(PackCost::value), Some(150.0));
    }

    #[test]
    fn last_write_wins() {
        let store = MemoryPreferenceStore::new();
        store.set(100.0).unwrap();
        store.set(80.0).unwrap();

        assert_eq!(store.get().map(PackCost::value), Some(80.0));
    }
}
