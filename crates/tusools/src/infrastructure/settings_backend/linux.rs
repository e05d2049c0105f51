//! Linux settings backend for GNOME desktops.
//!
//! Everything goes through the `gsettings` command line tool, so no D-Bus or
//! GLib bindings are linked.  Each call runs one short-lived process and
//! waits for it; a non-zero exit status becomes `BackendError::Platform`
//! carrying the tool's stderr.
//!
//! GNOME has no equivalent of the Windows telemetry, update, and Defender
//! policies, so [`SettingsBackend::set_feature_enabled`] only logs and
//! succeeds.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};
use tusools_core::{ThemeState, ToggleFeature};
use url::Url;

use crate::application::apply_setting::{BackendError, SettingsBackend};

const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";
const PROFILES_LIST_SCHEMA: &str = "org.gnome.Terminal.ProfilesList";
const PROFILE_SCHEMA: &str = "org.gnome.Terminal.Legacy.Profile";
const PROFILE_PATH_PREFIX: &str = "/org/gnome/terminal/legacy/profiles:/:";

#[derive(Default)]
pub struct LinuxSettingsBackend;

impl LinuxSettingsBackend {
    pub fn new() -> Self {
        info!("linux settings backend initialised (gsettings)");
        Self
    }

    /// Relocatable schema path of the default GNOME Terminal profile.
    fn terminal_profile(&self) -> Result<String, BackendError> {
        let raw = gsettings(&["get", PROFILES_LIST_SCHEMA, "default"])?;
        let uuid = unquote(&raw);
        if uuid.is_empty() {
            return Err(BackendError::MissingResource(
                "no default GNOME Terminal profile".into(),
            ));
        }
        Ok(format!("{PROFILE_SCHEMA}:{PROFILE_PATH_PREFIX}{uuid}/"))
    }
}

impl SettingsBackend for LinuxSettingsBackend {
    fn get_theme(&self) -> ThemeState {
        match gsettings(&["get", INTERFACE_SCHEMA, "color-scheme"]) {
            Ok(raw) => parse_color_scheme(&raw),
            Err(e) => {
                debug!(error = %e, "color-scheme unreadable, assuming light");
                ThemeState::Light
            }
        }
    }

    fn set_theme(&self, theme: ThemeState) -> Result<(), BackendError> {
        gsettings(&["set", INTERFACE_SCHEMA, "color-scheme", color_scheme_value(theme)])?;
        Ok(())
    }

    fn set_wallpaper(&self, path: &Path) -> Result<(), BackendError> {
        let absolute = path.canonicalize().map_err(|e| {
            BackendError::from_io(&format!("wallpaper image '{}'", path.display()), &e)
        })?;
        let uri = file_uri(&absolute)?;
        for key in ["picture-uri", "picture-uri-dark"] {
            gsettings(&["set", BACKGROUND_SCHEMA, key, &uri])?;
        }
        Ok(())
    }

    fn set_terminal_opacity_unit(&self, unit: u8) -> Result<(), BackendError> {
        let profile = self.terminal_profile()?;
        let percent = transparency_percent(unit).to_string();
        gsettings(&["set", &profile, "use-transparent-background", "true"])?;
        gsettings(&["set", &profile, "background-transparency-percent", &percent])?;
        Ok(())
    }

    fn set_feature_enabled(&self, feature: ToggleFeature, enabled: bool) -> Result<(), BackendError> {
        info!(%feature, enabled, "no OS control on this platform, recording flag only");
        Ok(())
    }

    fn request_restart(&self) {
        match Command::new("systemctl").arg("reboot").spawn() {
            Ok(_) => info!("restart requested"),
            Err(e) => warn!(error = %e, "could not run systemctl reboot"),
        }
    }
}

/// Runs `gsettings <args>` and returns its trimmed stdout.
fn gsettings(args: &[&str]) -> Result<String, BackendError> {
    debug!(?args, "gsettings");
    let output = Command::new("gsettings")
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| BackendError::from_io("gsettings", &e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        warn!(?args, status = ?output.status.code(), %stderr, "gsettings failed");
        return Err(BackendError::Platform(format!("gsettings {}: {stderr}", args.join(" "))));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

/// Strips the single quotes GVariant puts around strings.
fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('\'')
}

fn parse_color_scheme(raw: &str) -> ThemeState {
    if unquote(raw) == "prefer-dark" {
        ThemeState::Dark
    } else {
        ThemeState::Light
    }
}

fn color_scheme_value(theme: ThemeState) -> &'static str {
    match theme {
        ThemeState::Dark => "prefer-dark",
        ThemeState::Light => "default",
    }
}

/// GNOME Terminal wants transparency (0 opaque), the unit is opacity.
fn transparency_percent(unit: u8) -> u32 {
    100 - (u32::from(unit) * 100 + 127) / 255
}

/// Percent-encoded `file://` URI for an absolute path.
fn file_uri(path: &Path) -> Result<String, BackendError> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| BackendError::Platform(format!("'{}' has no file URI", path.display())))
}
