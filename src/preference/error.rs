//! Preference store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing the pack-cost preference
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Value is not a strictly positive, finite number
    #[error("Invalid pack cost {value}: must be a positive number")]
    InvalidPreference { value: f64 },

    /// Backing file could not be read or written
    #[error("Preference file {path:?} I/O failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file exists but is not a valid key-value document
    #[error("Preference file {path:?} is malformed: {message}")]
    Format { path: PathBuf, message: String },
}
