//! Platform-specific settings backends.
//!
//! Each platform implements [`SettingsBackend`]; the correct one is selected
//! at compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeSettingsBackend`:
//!
//! | Module    | OS      | Mechanism                                                  |
//! |-----------|---------|------------------------------------------------------------|
//! | `windows` | Windows | Registry (`HKCU`/`HKLM`), `SystemParametersInfoW`, `shutdown` |
//! | `linux`   | Linux   | GNOME `gsettings`, `systemctl reboot`                      |
//!
//! On any other target [`UnsupportedSettingsBackend`] is used: every setter
//! returns `BackendError::Unsupported`, so the UI still starts and explains
//! why nothing happens.
//!
//! A [`mock::RecordingSettingsBackend`] is always compiled (not guarded by
//! `#[cfg]`) so tests on any platform can use it.

use std::sync::Arc;

use crate::application::apply_setting::SettingsBackend;
use crate::infrastructure::storage::config::SystemConfig;

pub mod mock;

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
mod registry;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsSettingsBackend as NativeSettingsBackend;

// ── Linux implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxSettingsBackend as NativeSettingsBackend;

// ── Fallback ──────────────────────────────────────────────────────────────────

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub use unsupported::UnsupportedSettingsBackend;

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub use unsupported::UnsupportedSettingsBackend as NativeSettingsBackend;

/// Builds the backend for the platform this binary was compiled for.
pub fn native_backend(system: &SystemConfig) -> Arc<dyn SettingsBackend> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(NativeSettingsBackend::new(system.apply_os_policies))
    }

    #[cfg(not(target_os = "windows"))]
    {
        if system.apply_os_policies {
            tracing::debug!("apply_os_policies has no effect on this platform");
        }
        Arc::new(NativeSettingsBackend::new())
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
mod unsupported {
    use std::path::Path;

    use tusools_core::{ThemeState, ToggleFeature};

    use crate::application::apply_setting::{BackendError, SettingsBackend};

    /// Backend for targets without a native implementation.
    #[derive(Default)]
    pub struct UnsupportedSettingsBackend;

    impl UnsupportedSettingsBackend {
        pub fn new() -> Self {
            Self
        }
    }

    fn unsupported(what: &str) -> BackendError {
        BackendError::Unsupported(format!("{what} on {}", std::env::consts::OS))
    }

    impl SettingsBackend for UnsupportedSettingsBackend {
        fn get_theme(&self) -> ThemeState {
            ThemeState::Light
        }

        fn set_theme(&self, _theme: ThemeState) -> Result<(), BackendError> {
            Err(unsupported("theme switching"))
        }

        fn set_wallpaper(&self, _path: &Path) -> Result<(), BackendError> {
            Err(unsupported("wallpaper changes"))
        }

        fn set_terminal_opacity_unit(&self, _unit: u8) -> Result<(), BackendError> {
            Err(unsupported("terminal transparency"))
        }

        fn set_feature_enabled(
            &self,
            feature: ToggleFeature,
            _enabled: bool,
        ) -> Result<(), BackendError> {
            Err(unsupported(feature.display_name()))
        }

        fn request_restart(&self) {
            tracing::warn!("restart requests are not supported on this platform");
        }
    }
}
