//! Windows settings backend.
//!
//! Per-user settings (theme, console opacity) live under `HKEY_CURRENT_USER`
//! and never need elevation.  The three policy values behind the persisted
//! toggles live under `HKEY_LOCAL_MACHINE\SOFTWARE\Policies` and require the
//! process to run as Administrator; without it they fail with
//! `BackendError::PermissionDenied`.
//!
//! When the backend is built with `apply_os_policies = false` the policy
//! values are left alone and toggles only change the local records.

use std::ffi::c_void;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info, warn};
use tusools_core::{ThemeState, ToggleFeature};
use windows::Win32::System::Registry::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
use windows::Win32::UI::WindowsAndMessaging::{
    SystemParametersInfoW, SPIF_SENDCHANGE, SPIF_UPDATEINIFILE, SPI_SETDESKWALLPAPER,
};

use super::registry::{get_dword, set_dword, wide_os};
use crate::application::apply_setting::{BackendError, SettingsBackend};

const PERSONALIZE_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";
const APPS_LIGHT_VALUE: &str = "AppsUseLightTheme";
const SYSTEM_LIGHT_VALUE: &str = "SystemUsesLightTheme";

const CONSOLE_KEY: &str = r"Console\%SystemRoot%_system32_cmd.exe";
const CONSOLE_ALPHA_VALUE: &str = "WindowAlpha";

/// Registry location and values of the policy behind a persisted toggle.
struct PolicyValue {
    key: &'static str,
    name: &'static str,
    when_enabled: u32,
    when_disabled: u32,
}

fn policy_value(feature: ToggleFeature) -> PolicyValue {
    match feature {
        ToggleFeature::Telemetry => PolicyValue {
            key: r"SOFTWARE\Policies\Microsoft\Windows\DataCollection",
            name: "AllowTelemetry",
            when_enabled: 1,
            when_disabled: 0,
        },
        ToggleFeature::WindowsUpdate => PolicyValue {
            key: r"SOFTWARE\Policies\Microsoft\Windows\WindowsUpdate\AU",
            name: "NoAutoUpdate",
            when_enabled: 0,
            when_disabled: 1,
        },
        ToggleFeature::Defender => PolicyValue {
            key: r"SOFTWARE\Policies\Microsoft\Windows Defender",
            name: "DisableAntiSpyware",
            when_enabled: 0,
            when_disabled: 1,
        },
    }
}

pub struct WindowsSettingsBackend {
    apply_os_policies: bool,
}

impl WindowsSettingsBackend {
    pub fn new(apply_os_policies: bool) -> Self {
        info!(apply_os_policies, "windows settings backend initialised");
        Self { apply_os_policies }
    }
}

impl SettingsBackend for WindowsSettingsBackend {
    fn get_theme(&self) -> ThemeState {
        match get_dword(HKEY_CURRENT_USER, PERSONALIZE_KEY, APPS_LIGHT_VALUE) {
            Ok(0) => ThemeState::Dark,
            Ok(_) => ThemeState::Light,
            Err(e) => {
                debug!(error = %e, "theme value unreadable, assuming light");
                ThemeState::Light
            }
        }
    }

    fn set_theme(&self, theme: ThemeState) -> Result<(), BackendError> {
        let light = u32::from(!theme.is_dark());
        set_dword(HKEY_CURRENT_USER, PERSONALIZE_KEY, APPS_LIGHT_VALUE, light)?;
        set_dword(HKEY_CURRENT_USER, PERSONALIZE_KEY, SYSTEM_LIGHT_VALUE, light)
    }

    fn set_wallpaper(&self, path: &Path) -> Result<(), BackendError> {
        if !path.is_file() {
            return Err(BackendError::MissingResource(format!(
                "wallpaper image '{}'",
                path.display()
            )));
        }
        let mut path_w = wide_os(path.as_os_str());

        // SAFETY: `path_w` is null-terminated and lives across the call.
        unsafe {
            SystemParametersInfoW(
                SPI_SETDESKWALLPAPER,
                0,
                Some(path_w.as_mut_ptr() as *mut c_void),
                SPIF_UPDATEINIFILE | SPIF_SENDCHANGE,
            )
        }
        .map_err(|e| {
            warn!(path = %path.display(), error = %e, "SystemParametersInfoW failed");
            BackendError::Platform(format!("set wallpaper: {e}"))
        })
    }

    fn set_terminal_opacity_unit(&self, unit: u8) -> Result<(), BackendError> {
        set_dword(HKEY_CURRENT_USER, CONSOLE_KEY, CONSOLE_ALPHA_VALUE, u32::from(unit))
    }

    fn set_feature_enabled(&self, feature: ToggleFeature, enabled: bool) -> Result<(), BackendError> {
        if !self.apply_os_policies {
            info!(%feature, enabled, "os policies disabled in config, recording flag only");
            return Ok(());
        }
        let policy = policy_value(feature);
        let value = if enabled {
            policy.when_enabled
        } else {
            policy.when_disabled
        };
        set_dword(HKEY_LOCAL_MACHINE, policy.key, policy.name, value)
    }

    fn request_restart(&self) {
        match Command::new("shutdown").args(["/r", "/t", "0"]).spawn() {
            Ok(_) => info!("restart requested"),
            Err(e) => warn!(error = %e, "could not start shutdown.exe"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_values_disable_differs_from_enable() {
        for feature in ToggleFeature::ALL {
            let policy = policy_value(feature);
            assert_ne!(policy.when_enabled, policy.when_disabled, "{feature}");
            assert!(policy.key.starts_with(r"SOFTWARE\Policies\Microsoft"));
        }
    }

    #[test]
    fn test_flag_only_mode_never_touches_registry() {
        // Arrange
        let backend = WindowsSettingsBackend::new(false);

        // Act / Assert: succeeds even without elevation
        for feature in ToggleFeature::ALL {
            assert!(backend.set_feature_enabled(feature, false).is_ok());
        }
    }

    #[test]
    fn test_missing_wallpaper_file_is_missing_resource() {
        let backend = WindowsSettingsBackend::new(false);

        let err = backend
            .set_wallpaper(Path::new(r"C:\does\not\exist\back.png"))
            .unwrap_err();

        assert!(matches!(err, BackendError::MissingResource(_)));
    }
}
