//! ToggleStore: durable Disabled/Enabled flag per persisted feature.
//!
//! The store is an explicit object handed to the
//! [`SettingsEngine`](super::apply_setting::SettingsEngine) at construction.
//! Production code uses the file-backed store in
//! `infrastructure::storage::toggle_file`; tests can substitute the
//! in-memory store from `infrastructure::storage::memory`.
//!
//! # Contract
//!
//! - `is_disabled` never fails.  A record that cannot be read is treated as
//!   "not disabled", exactly like a record that was never written.
//! - `set_disabled` is a full replace and must never expose a half-written
//!   record to a concurrent reader.
//! - Every write failure is returned as a [`StorageError`]; nothing is
//!   swallowed.

use std::path::PathBuf;

use thiserror::Error;
use tusools_core::{ToggleFeature, ToggleState};

/// Error type for toggle store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The base directory or one of its fixed resources could not be created.
    #[error("could not prepare storage location {path}: {source}")]
    BaseLocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the record for `feature` failed.
    #[error("could not write the {feature} record: {source}")]
    Record {
        feature: ToggleFeature,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// The feature whose record failed, if the error concerns one.
    pub fn feature(&self) -> Option<ToggleFeature> {
        match self {
            StorageError::Record { feature, .. } => Some(*feature),
            StorageError::BaseLocation { .. } => None,
        }
    }
}

/// Durable key -> state mapping for the persisted toggles.
pub trait ToggleStore: Send + Sync {
    /// Creates the base location and its fixed resources if they are absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::BaseLocation`] if anything could not be created.
    /// Callers must surface this: later reads and writes would fail otherwise.
    fn ensure_base_location(&self) -> Result<(), StorageError>;

    /// Returns `true` iff a non-empty record exists for `feature`.
    fn is_disabled(&self, feature: ToggleFeature) -> bool;

    /// Replaces the record for `feature`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Record`] carrying the feature and the I/O cause.
    fn set_disabled(&self, feature: ToggleFeature, disabled: bool) -> Result<(), StorageError>;

    /// Current state of `feature`, derived from [`is_disabled`](Self::is_disabled).
    fn state(&self, feature: ToggleFeature) -> ToggleState {
        ToggleState::from_disabled(self.is_disabled(feature))
    }
}
