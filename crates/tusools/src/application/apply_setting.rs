//! SettingsEngine: per-feature policy and backend dispatch.
//!
//! Every user action arrives here as a [`SettingsAction`].  The engine
//! decides what the new state should be, asks the [`SettingsBackend`] to make
//! the OS match, and only then records the new state in the
//! [`ToggleStore`].
//!
//! # Success-gated persistence (for beginners)
//!
//! The order of the two side effects matters:
//!
//! ```text
//! read state ──► backend call ──ok──► write store ──► Ok(outcome)
//!                     │
//!                     └──err──► Err(SettingsError::Backend)   (store untouched)
//! ```
//!
//! If the backend refuses (no admin rights, missing registry key), the store
//! still describes what the OS actually looks like.  If the process dies
//! between the backend call and the write, the next `apply` re-reads the
//! store and acts from there; nothing is applied twice behind the user's back.
//!
//! # Per-feature policies
//!
//! | action                    | behaviour                                         |
//! |---------------------------|---------------------------------------------------|
//! | `Toggle(Telemetry)`       | disable once; later calls report already-disabled |
//! | `Toggle(Defender)`        | same as telemetry                                 |
//! | `Toggle(WindowsUpdate)`   | flip Enabled <-> Disabled on every call           |
//! | `Theme`                   | read live theme, set the opposite                 |
//! | `Transparency(percent)`   | validate 20..=80, send the 0..=255 unit           |
//! | `Wallpaper(path)`         | validate image type, set wallpaper                |
//! | `Font(path)`              | validate font type, request an OS restart         |
//!
//! No action retries.  The caller may simply call `apply` again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use tusools_core::{
    validate_font, validate_wallpaper, Feature, ThemeState, ToggleFeature, TogglePolicy,
    ToggleState, TransparencyLevel, ValidationError,
};

use super::toggle_store::{StorageError, ToggleStore};

/// A platform setting could not be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("missing resource: {0}")]
    MissingResource(String),
    #[error("not supported on this platform: {0}")]
    Unsupported(String),
    #[error("platform error: {0}")]
    Platform(String),
}

impl BackendError {
    /// Classifies an I/O error raised while talking to the platform.
    pub fn from_io(context: &str, err: &std::io::Error) -> Self {
        let detail = format!("{context}: {err}");
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => BackendError::PermissionDenied(detail),
            std::io::ErrorKind::NotFound => BackendError::MissingResource(detail),
            _ => BackendError::Platform(detail),
        }
    }
}

/// Platform-specific settings capability.
///
/// Each supported OS provides an implementation in the infrastructure layer;
/// tests use a recording fake or a `mockall` mock.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsBackend: Send + Sync {
    /// Reads the live OS theme.
    fn get_theme(&self) -> ThemeState;

    fn set_theme(&self, theme: ThemeState) -> Result<(), BackendError>;

    fn set_wallpaper(&self, path: &Path) -> Result<(), BackendError>;

    /// Sets the terminal window alpha, `0` transparent to `255` opaque.
    fn set_terminal_opacity_unit(&self, unit: u8) -> Result<(), BackendError>;

    /// Turns the OS control behind a persisted toggle on or off.
    fn set_feature_enabled(&self, feature: ToggleFeature, enabled: bool)
        -> Result<(), BackendError>;

    /// Asks the OS to restart.  Fire-and-forget: completion is not awaited.
    fn request_restart(&self);
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
    Toggle(ToggleFeature),
    Theme,
    /// Raw percentage as entered by the user; validated by the engine.
    Transparency(i64),
    Wallpaper(PathBuf),
    Font(PathBuf),
}

impl SettingsAction {
    pub fn feature(&self) -> Feature {
        match self {
            SettingsAction::Toggle(f) => f.feature(),
            SettingsAction::Theme => Feature::Theme,
            SettingsAction::Transparency(_) => Feature::Transparency,
            SettingsAction::Wallpaper(_) => Feature::Wallpaper,
            SettingsAction::Font(_) => Feature::Font,
        }
    }
}

/// What a successful [`SettingsEngine::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A persisted toggle moved to `state`.
    Toggled {
        feature: ToggleFeature,
        state: ToggleState,
    },
    /// A disable-only toggle was already disabled; nothing was done.
    AlreadyDisabled(ToggleFeature),
    /// The theme is now `ThemeState`.
    ThemeChanged(ThemeState),
    TransparencySet { level: TransparencyLevel, unit: u8 },
    WallpaperChanged(PathBuf),
    RestartRequested,
}

/// Error type for [`SettingsEngine::apply`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{} could not be applied: {source}", .feature.display_name())]
    Backend {
        feature: Feature,
        #[source]
        source: BackendError,
    },

    #[error("invalid input for {}: {source}", .feature.display_name())]
    Validation {
        feature: Feature,
        #[source]
        source: ValidationError,
    },
}

impl SettingsError {
    /// The feature the failed action targeted, when known.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            SettingsError::Storage(e) => e.feature().map(Feature::from),
            SettingsError::Backend { feature, .. } | SettingsError::Validation { feature, .. } => {
                Some(*feature)
            }
        }
    }
}

/// The settings engine use case.
pub struct SettingsEngine {
    store: Arc<dyn ToggleStore>,
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsEngine {
    pub fn new(store: Arc<dyn ToggleStore>, backend: Arc<dyn SettingsBackend>) -> Self {
        Self { store, backend }
    }

    /// Applies one user action.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::Validation`] if the input is outside its domain.
    /// - [`SettingsError::Backend`] if the OS call failed; the store is left
    ///   unchanged.
    /// - [`SettingsError::Storage`] if the OS call succeeded but the new state
    ///   could not be recorded.
    pub fn apply(&self, action: SettingsAction) -> Result<ApplyOutcome, SettingsError> {
        debug!(feature = %action.feature(), "applying setting");
        match action {
            SettingsAction::Toggle(feature) => self.apply_toggle(feature),
            SettingsAction::Theme => self.apply_theme(),
            SettingsAction::Transparency(percent) => self.apply_transparency(percent),
            SettingsAction::Wallpaper(path) => self.apply_wallpaper(path),
            SettingsAction::Font(path) => self.apply_font(path),
        }
    }

    /// Recorded state of a persisted toggle.
    pub fn toggle_state(&self, feature: ToggleFeature) -> ToggleState {
        self.store.state(feature)
    }

    /// Live OS theme.
    pub fn current_theme(&self) -> ThemeState {
        self.backend.get_theme()
    }

    fn apply_toggle(&self, feature: ToggleFeature) -> Result<ApplyOutcome, SettingsError> {
        let current = self.store.state(feature);

        if feature.policy() == TogglePolicy::DisableOnly && current.is_disabled() {
            info!(%feature, "already disabled, nothing to do");
            return Ok(ApplyOutcome::AlreadyDisabled(feature));
        }

        let target = current.toggled();
        self.backend
            .set_feature_enabled(feature, target.is_enabled())
            .map_err(|source| {
                warn!(%feature, error = %source, "backend refused toggle");
                SettingsError::Backend {
                    feature: feature.feature(),
                    source,
                }
            })?;

        self.store.set_disabled(feature, target.is_disabled())?;
        info!(%feature, state = ?target, "toggle applied");
        Ok(ApplyOutcome::Toggled {
            feature,
            state: target,
        })
    }

    fn apply_theme(&self) -> Result<ApplyOutcome, SettingsError> {
        let current = self.backend.get_theme();
        let target = current.opposite();

        self.backend
            .set_theme(target)
            .map_err(|source| backend_error(Feature::Theme, source))?;

        info!(from = current.as_str(), to = target.as_str(), "theme switched");
        Ok(ApplyOutcome::ThemeChanged(target))
    }

    fn apply_transparency(&self, percent: i64) -> Result<ApplyOutcome, SettingsError> {
        let level = TransparencyLevel::new(percent)
            .map_err(|source| validation_error(Feature::Transparency, source))?;
        let unit = level.backend_unit();

        self.backend
            .set_terminal_opacity_unit(unit)
            .map_err(|source| backend_error(Feature::Transparency, source))?;

        info!(percent = level.percent(), unit, "terminal transparency set");
        Ok(ApplyOutcome::TransparencySet { level, unit })
    }

    fn apply_wallpaper(&self, path: PathBuf) -> Result<ApplyOutcome, SettingsError> {
        validate_wallpaper(&path).map_err(|source| validation_error(Feature::Wallpaper, source))?;

        self.backend
            .set_wallpaper(&path)
            .map_err(|source| backend_error(Feature::Wallpaper, source))?;

        info!(path = %path.display(), "wallpaper changed");
        Ok(ApplyOutcome::WallpaperChanged(path))
    }

    fn apply_font(&self, path: PathBuf) -> Result<ApplyOutcome, SettingsError> {
        validate_font(&path).map_err(|source| validation_error(Feature::Font, source))?;

        info!(path = %path.display(), "font change needs a restart, requesting one");
        self.backend.request_restart();
        Ok(ApplyOutcome::RestartRequested)
    }
}

fn backend_error(feature: Feature, source: BackendError) -> SettingsError {
    warn!(%feature, error = %source, "backend call failed");
    SettingsError::Backend { feature, source }
}

fn validation_error(feature: Feature, source: ValidationError) -> SettingsError {
    warn!(%feature, error = %source, "rejected input");
    SettingsError::Validation { feature, source }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
