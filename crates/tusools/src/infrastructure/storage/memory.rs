//! In-memory toggle store for unit testing.
//!
//! Behaves like the file-backed store (absent record == `Enabled`) without
//! touching the disk.  Set `should_fail` to make every write return a
//! [`StorageError::Record`], to exercise error paths in callers.

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use tusools_core::{ToggleFeature, ToggleState};

use crate::application::toggle_store::{StorageError, ToggleStore};

#[derive(Default)]
pub struct InMemoryToggleStore {
    records: Mutex<HashMap<ToggleFeature, ToggleState>>,
    base_ready: AtomicBool,
    should_fail: AtomicBool,
}

impl InMemoryToggleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, every `set_disabled` call fails.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Whether `ensure_base_location` has been called.
    pub fn base_ready(&self) -> bool {
        self.base_ready.load(Ordering::SeqCst)
    }

    /// Whether a record has ever been written for `feature`.
    pub fn has_record(&self, feature: ToggleFeature) -> bool {
        self.records.lock().expect("lock poisoned").contains_key(&feature)
    }
}

impl ToggleStore for InMemoryToggleStore {
    fn ensure_base_location(&self) -> Result<(), StorageError> {
        self.base_ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_disabled(&self, feature: ToggleFeature) -> bool {
        self.records
            .lock()
            .expect("lock poisoned")
            .get(&feature)
            .is_some_and(|s| s.is_disabled())
    }

    fn set_disabled(&self, feature: ToggleFeature, disabled: bool) -> Result<(), StorageError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StorageError::Record {
                feature,
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected failure"),
            });
        }
        self.records
            .lock()
            .expect("lock poisoned")
            .insert(feature, ToggleState::from_disabled(disabled));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_store_reports_everything_enabled() {
        let store = InMemoryToggleStore::new();
        store.ensure_base_location().unwrap();

        assert!(store.base_ready());
        for feature in ToggleFeature::ALL {
            assert!(!store.is_disabled(feature));
            assert!(!store.has_record(feature));
        }
    }

    #[test]
    fn test_re_enabling_keeps_the_record() {
        // Arrange
        let store = InMemoryToggleStore::new();

        // Act
        store.set_disabled(ToggleFeature::WindowsUpdate, true).unwrap();
        store.set_disabled(ToggleFeature::WindowsUpdate, false).unwrap();

        // Assert
        assert!(!store.is_disabled(ToggleFeature::WindowsUpdate));
        assert!(store.has_record(ToggleFeature::WindowsUpdate));
    }

    #[test]
    fn test_should_fail_rejects_writes_and_keeps_state() {
        // Arrange
        let store = InMemoryToggleStore::new();
        store.set_disabled(ToggleFeature::Defender, true).unwrap();
        store.set_should_fail(true);

        // Act
        let err = store.set_disabled(ToggleFeature::Defender, false).unwrap_err();

        // Assert
        assert_eq!(err.feature(), Some(ToggleFeature::Defender));
        assert!(store.is_disabled(ToggleFeature::Defender));
    }
}
