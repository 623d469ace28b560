//! The pack-cost preference: the one value that outlives a session.
//!
//! A [`PreferenceStore`] is shared by every session of every flow. Reads are
//! synchronous. `set` validates its input even though the session controller
//! has already done so; a store never holds a zero, negative or non-finite
//! cost.

mod error;
mod file;
mod memory;

pub use error::PreferenceError;
pub use file::FilePreferenceStore;
pub use memory::MemoryPreferenceStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which the pack cost is stored.
pub const PACK_COST_KEY: &str = "smoke-check-pack-cost";

/// Cost of one pack. Always strictly positive and finite.
///
/// # Example
///
/// ```rust
/// use checkin_flow::preference::PackCost;
///
/// assert_eq!(PackCost::new(200.0).unwrap().value(), 200.0);
/// assert!(PackCost::new(0.0).is_err());
/// assert!(PackCost::new(-5.0).is_err());
/// assert!(PackCost::new(f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PackCost(f64);

impl PackCost {
    pub fn new(value: f64) -> Result<Self, PreferenceError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(PreferenceError::InvalidPreference { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PackCost {
    type Error = PreferenceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PackCost> for f64 {
    fn from(cost: PackCost) -> Self {
        cost.0
    }
}

impl fmt::Display for PackCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable home of the pack-cost preference.
///
/// Implementations use interior mutability so a single store can be shared
/// behind an `Arc` by the controller and the presentation layer. Writes are
/// last-writer-wins.
pub trait PreferenceStore: Send + Sync {
    /// Current pack cost, if one has ever been set.
    fn get(&self) -> Option<PackCost>;

    /// Store a new pack cost.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::InvalidPreference`] for zero, negative or
    /// non-finite values, leaving the stored value unchanged. File-backed
    /// stores may also fail with I/O errors.
    fn set(&self, value: f64) -> Result<PackCost, PreferenceError>;

    /// Whether a pack cost has been stored.
    fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_cost_rejects_non_positive_values() {
        for bad in [0.0, -0.01, -200.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                PackCost::new(bad),
                Err(PreferenceError::InvalidPreference { .. })
            ));
        }
    }

    #[test]
    fn pack_cost_deserialization_validates() {
        let ok: PackCost = serde_json::from_str("12.5").unwrap();
        assert_eq!(ok.value(), 12.5);

        assert!(serde_json::from_str::<PackCost>("0").is_err());
        assert!(serde_json::from_str::<PackCost>("-3").is_err());
    }

    #[test]
    fn pack_cost_displays_as_plain_decimal() {
        assert_eq!(PackCost::new(200.0).unwrap().to_string(), "200");
        assert_eq!(PackCost::new(12.75).unwrap().to_string(), "12.75");
    }
}
