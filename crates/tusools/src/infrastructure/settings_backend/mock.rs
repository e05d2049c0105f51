//! Recording settings backend for tests.
//!
//! # Why a fake backend?
//!
//! The real backends edit the registry, change the desktop wallpaper, and
//! can reboot the machine.  None of that is acceptable on a test runner,
//! and none of it can be observed from Rust test code.
//!
//! `RecordingSettingsBackend` replaces every OS call with in-memory
//! bookkeeping.  It keeps a live theme value (so theme toggles can be
//! observed flipping back and forth) and records every call in order.
//!
//! # Failure injection
//!
//! Call [`RecordingSettingsBackend::set_should_fail`] to make every setter
//! return `BackendError::PermissionDenied`.  The flag is atomic, so it can be
//! flipped while the backend is shared behind an `Arc` with an engine.

use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use tusools_core::{ThemeState, ToggleFeature};

use crate::application::apply_setting::{BackendError, SettingsBackend};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SetTheme(ThemeState),
    SetWallpaper(PathBuf),
    SetTerminalOpacityUnit(u8),
    SetFeatureEnabled(ToggleFeature, bool),
    RequestRestart,
}

pub struct RecordingSettingsBackend {
    theme: Mutex<ThemeState>,
    calls: Mutex<Vec<BackendCall>>,
    should_fail: AtomicBool,
    restart_requests: AtomicUsize,
}

impl RecordingSettingsBackend {
    /// Creates a backend whose live theme starts as `theme`.
    pub fn with_theme(theme: ThemeState) -> Self {
        Self {
            theme: Mutex::new(theme),
            calls: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
            restart_requests: AtomicUsize::new(0),
        }
    }

    pub fn new() -> Self {
        Self::with_theme(ThemeState::Light)
    }

    /// When `true`, every setter fails with `PermissionDenied`.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all successful calls, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn restart_requests(&self) -> usize {
        self.restart_requests.load(Ordering::SeqCst)
    }

    fn record(&self, call: BackendCall) -> Result<(), BackendError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(BackendError::PermissionDenied(format!("mock failure: {call:?}")));
        }
        self.calls.lock().expect("lock poisoned").push(call);
        Ok(())
    }
}

impl Default for RecordingSettingsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBackend for RecordingSettingsBackend {
    fn get_theme(&self) -> ThemeState {
        *self.theme.lock().expect("lock poisoned")
    }

    fn set_theme(&self, theme: ThemeState) -> Result<(), BackendError> {
        self.record(BackendCall::SetTheme(theme))?;
        *self.theme.lock().expect("lock poisoned") = theme;
        Ok(())
    }

    fn set_wallpaper(&self, path: &Path) -> Result<(), BackendError> {
        self.record(BackendCall::SetWallpaper(path.to_path_buf()))
    }

    fn set_terminal_opacity_unit(&self, unit: u8) -> Result<(), BackendError> {
        self.record(BackendCall::SetTerminalOpacityUnit(unit))
    }

    fn set_feature_enabled(&self, feature: ToggleFeature, enabled: bool) -> Result<(), BackendError> {
        self.record(BackendCall::SetFeatureEnabled(feature, enabled))
    }

    fn request_restart(&self) {
        // Fire-and-forget: a restart request never reports failure.
        self.restart_requests.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .expect("lock poisoned")
            .push(BackendCall::RequestRestart);
    }
}
