//! File-backed [`ToggleStore`].
//!
//! Layout of the base directory:
//!
//! ```text
//! <base>/
//!  ├─ telemetry_disabled.dat     one record per persisted toggle,
//!  ├─ update_disabled.dat        created on the first toggle action
//!  ├─ defender_disabled.dat
//!  └─ background/
//!      ├─ note.txt               usage note for the wallpaper feature
//!      └─ back.png               optional, placed there by the user
//! ```
//!
//! A record's byte length is its whole meaning (see
//! [`tusools_core::ToggleRecord`]).  Records are written to a sibling
//! `.tmp` file, flushed to disk, and renamed over the old record, so a
//! reader sees either the previous record or the new one, never a partial
//! write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};
use tusools_core::{ToggleFeature, ToggleRecord, ToggleState};

use crate::application::toggle_store::{StorageError, ToggleStore};

/// Text of `background/note.txt`.
pub const WALLPAPER_NOTE: &str = "Put a .png file of your choice in this folder and name it 'back.png'. This application will make the background the image you put in.";

/// Resolves every path inside the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn background_dir(&self) -> PathBuf {
        self.base_dir.join("background")
    }

    pub fn note_path(&self) -> PathBuf {
        self.background_dir().join("note.txt")
    }

    /// The user-provided wallpaper described by the note.
    pub fn background_image_path(&self) -> PathBuf {
        self.background_dir().join("back.png")
    }

    pub fn record_path(&self, feature: ToggleFeature) -> PathBuf {
        self.base_dir.join(feature.record_file_name())
    }
}

/// Production toggle store: one record file per persisted feature.
pub struct FileToggleStore {
    layout: StorageLayout,
}

impl FileToggleStore {
    pub fn new(layout: StorageLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }
}

impl ToggleStore for FileToggleStore {
    fn ensure_base_location(&self) -> Result<(), StorageError> {
        let background = self.layout.background_dir();
        // create_dir_all also creates the base directory itself
        fs::create_dir_all(&background).map_err(|source| StorageError::BaseLocation {
            path: background.clone(),
            source,
        })?;

        let note = self.layout.note_path();
        if !note.is_file() {
            fs::write(&note, WALLPAPER_NOTE).map_err(|source| StorageError::BaseLocation {
                path: note.clone(),
                source,
            })?;
            info!(path = %note.display(), "wrote wallpaper note");
        }

        debug!(base = %self.layout.base_dir().display(), "storage location ready");
        Ok(())
    }

    fn is_disabled(&self, feature: ToggleFeature) -> bool {
        let path = self.layout.record_path(feature);
        let len = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Some(meta.len()),
            Ok(_) => None,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(%feature, error = %e, "could not stat record, treating as enabled");
                }
                None
            }
        };
        ToggleRecord::from_stored_len(feature, len).state.is_disabled()
    }

    fn set_disabled(&self, feature: ToggleFeature, disabled: bool) -> Result<(), StorageError> {
        let record = ToggleRecord::new(feature, ToggleState::from_disabled(disabled));
        let path = self.layout.record_path(feature);

        write_replacing(&path, record.encode())
            .map_err(|source| StorageError::Record { feature, source })?;

        debug!(%feature, disabled, path = %path.display(), "record written");
        Ok(())
    }
}

/// Distinguishes temp files of concurrent writers within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `bytes` to a temp file next to `path`, then renames it over `path`.
///
/// The temp name carries the pid and a per-process counter, so two writers
/// of the same record never share a temp file.
fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let tmp = PathBuf::from(tmp);

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)?;
        sync_parent(path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Flushes the directory entry created by the rename.
#[cfg(unix)]
fn sync_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) => fs::File::open(dir)?.sync_all(),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_layout() -> StorageLayout {
        StorageLayout::new(std::env::temp_dir().join(format!("tusools_test_{}", Uuid::new_v4())))
    }

    fn cleanup(layout: &StorageLayout) {
        fs::remove_dir_all(layout.base_dir()).ok();
    }

    #[test]
    fn test_ensure_base_location_creates_dirs_and_note() {
        // Arrange
        let layout = temp_layout();
        let store = FileToggleStore::new(layout.clone());

        // Act
        store.ensure_base_location().expect("ensure");

        // Assert
        assert!(layout.base_dir().is_dir());
        assert!(layout.background_dir().is_dir());
        assert_eq!(fs::read_to_string(layout.note_path()).unwrap(), WALLPAPER_NOTE);

        cleanup(&layout);
    }

    #[test]
    fn test_ensure_base_location_keeps_existing_note() {
        // Arrange
        let layout = temp_layout();
        fs::create_dir_all(layout.background_dir()).unwrap();
        fs::write(layout.note_path(), "my own note").unwrap();
        let store = FileToggleStore::new(layout.clone());

        // Act
        store.ensure_base_location().expect("ensure");
        store.ensure_base_location().expect("ensure twice");

        // Assert
        assert_eq!(fs::read_to_string(layout.note_path()).unwrap(), "my own note");

        cleanup(&layout);
    }

    #[test]
    fn test_ensure_base_location_fails_when_base_is_a_file() {
        // Arrange: occupy the base path with a regular file
        let layout = temp_layout();
        fs::write(layout.base_dir(), b"not a directory").unwrap();
        let store = FileToggleStore::new(layout.clone());

        // Act
        let result = store.ensure_base_location();

        // Assert
        assert!(matches!(result, Err(StorageError::BaseLocation { .. })));

        fs::remove_file(layout.base_dir()).ok();
    }

    #[test]
    fn test_fresh_location_reports_all_enabled() {
        let layout = temp_layout();
        let store = FileToggleStore::new(layout.clone());
        store.ensure_base_location().unwrap();

        for feature in ToggleFeature::ALL {
            assert!(!store.is_disabled(feature), "{feature} must start enabled");
        }

        cleanup(&layout);
    }

    #[test]
    fn test_set_disabled_round_trips() {
        // Arrange
        let layout = temp_layout();
        let store = FileToggleStore::new(layout.clone());
        store.ensure_base_location().unwrap();

        for feature in ToggleFeature::ALL {
            // Act / Assert
            store.set_disabled(feature, true).unwrap();
            assert!(store.is_disabled(feature));
            store.set_disabled(feature, false).unwrap();
            assert!(!store.is_disabled(feature));
        }

        cleanup(&layout);
    }

    #[test]
    fn test_enabled_record_is_empty_file_not_removed() {
        // Arrange
        let layout = temp_layout();
        let store = FileToggleStore::new(layout.clone());
        store.ensure_base_location().unwrap();

        // Act
        store.set_disabled(ToggleFeature::WindowsUpdate, true).unwrap();
        let disabled_bytes = fs::read(layout.record_path(ToggleFeature::WindowsUpdate)).unwrap();
        store.set_disabled(ToggleFeature::WindowsUpdate, false).unwrap();

        // Assert
        assert_eq!(disabled_bytes, b"disabled");
        let meta = fs::metadata(layout.record_path(ToggleFeature::WindowsUpdate)).unwrap();
        assert_eq!(meta.len(), 0);

        cleanup(&layout);
    }

    #[test]
    fn test_write_leaves_no_temp_file_behind() {
        let layout = temp_layout();
        let store = FileToggleStore::new(layout.clone());
        store.ensure_base_location().unwrap();

        store.set_disabled(ToggleFeature::Telemetry, true).unwrap();

        let leftovers: Vec<_> = fs::read_dir(layout.base_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        cleanup(&layout);
    }

    #[test]
    fn test_unreadable_record_fails_closed_and_write_reports_feature() {
        // Arrange: a directory where the record file should be
        let layout = temp_layout();
        let store = FileToggleStore::new(layout.clone());
        store.ensure_base_location().unwrap();
        fs::create_dir_all(layout.record_path(ToggleFeature::Telemetry).join("child")).unwrap();

        // Act
        let disabled = store.is_disabled(ToggleFeature::Telemetry);
        let err = store.set_disabled(ToggleFeature::Telemetry, true).unwrap_err();

        // Assert
        assert!(!disabled);
        assert!(matches!(
            err,
            StorageError::Record {
                feature: ToggleFeature::Telemetry,
                ..
            }
        ));
        assert!(!store.is_disabled(ToggleFeature::Telemetry));

        cleanup(&layout);
    }

    #[test]
    fn test_concurrent_writers_of_one_record_all_succeed() {
        // Arrange
        let layout = temp_layout();
        let store = std::sync::Arc::new(FileToggleStore::new(layout.clone()));
        store.ensure_base_location().unwrap();

        // Act
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..20)
                        .map(|_| store.set_disabled(ToggleFeature::WindowsUpdate, i % 2 == 0))
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect();

        // Assert
        for handle in handles {
            handle.join().unwrap().expect("every write must succeed");
        }
        let leftovers = fs::read_dir(layout.base_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        cleanup(&layout);
    }

    #[test]
    fn test_hand_written_record_with_content_reads_disabled() {
        // Arrange: a record left by an earlier version of the tool
        let layout = temp_layout();
        fs::create_dir_all(layout.base_dir()).unwrap();
        fs::write(layout.record_path(ToggleFeature::Defender), "x").unwrap();
        let store = FileToggleStore::new(layout.clone());

        // Assert
        assert!(store.is_disabled(ToggleFeature::Defender));

        cleanup(&layout);
    }

    #[test]
    fn test_set_disabled_without_base_location_returns_record_error() {
        // Arrange: base directory never created
        let layout = temp_layout();
        let store = FileToggleStore::new(layout);

        // Act
        let err = store.set_disabled(ToggleFeature::Telemetry, true).unwrap_err();

        // Assert
        assert_eq!(err.feature(), Some(ToggleFeature::Telemetry));
        assert!(err.to_string().contains("telemetry"));
    }

    #[test]
    fn test_state_survives_a_new_store_instance() {
        // Arrange
        let layout = temp_layout();
        let first = FileToggleStore::new(layout.clone());
        first.ensure_base_location().unwrap();
        first.set_disabled(ToggleFeature::Defender, true).unwrap();
        drop(first);

        // Act: simulate an application restart
        let second = FileToggleStore::new(layout.clone());

        // Assert
        assert!(second.is_disabled(ToggleFeature::Defender));
        assert!(!second.is_disabled(ToggleFeature::Telemetry));

        cleanup(&layout);
    }
}
