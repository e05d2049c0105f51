//! Features, toggle states, and the persisted toggle record.
//!
//! # Two kinds of feature
//!
//! Tusools manages seven settings, modelled by [`Feature`].  Only three of
//! them, the [`ToggleFeature`]s, are remembered by the tool itself:
//!
//! ```text
//! Feature
//!  ├─ Telemetry      ─┐
//!  ├─ WindowsUpdate   ├─ ToggleFeature  (state persisted in a record file)
//!  ├─ Defender       ─┘
//!  ├─ Theme               (read live from the OS, never cached)
//!  ├─ Transparency        (owned by the OS setting store)
//!  ├─ Wallpaper           (owned by the OS)
//!  └─ Font                (only triggers a restart request)
//! ```
//!
//! # Record encoding
//!
//! A toggle record is a content-free boolean flag.  Its byte length is the
//! whole encoding:
//!
//! | bytes on disk      | state      |
//! |--------------------|------------|
//! | no record          | `Enabled`  |
//! | 0 bytes            | `Enabled`  |
//! | more than 0 bytes  | `Disabled` |
//!
//! [`ToggleRecord`] makes that state explicit in code while keeping the
//! on-disk format compatible with earlier installs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker written into a record to mean "disabled".
pub const DISABLED_MARKER: &[u8] = b"disabled";

/// Every setting the tool can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Telemetry,
    WindowsUpdate,
    Defender,
    Theme,
    Transparency,
    Wallpaper,
    Font,
}

impl Feature {
    /// Stable machine identifier, also used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Telemetry => "telemetry",
            Feature::WindowsUpdate => "windows_update",
            Feature::Defender => "defender",
            Feature::Theme => "theme",
            Feature::Transparency => "transparency",
            Feature::Wallpaper => "wallpaper",
            Feature::Font => "font",
        }
    }

    /// Human-readable name shown in notifications.
    pub fn display_name(self) -> &'static str {
        match self {
            Feature::Telemetry => "Telemetry",
            Feature::WindowsUpdate => "Windows Update",
            Feature::Defender => "Windows Defender",
            Feature::Theme => "Theme",
            Feature::Transparency => "Terminal transparency",
            Feature::Wallpaper => "Wallpaper",
            Feature::Font => "System font",
        }
    }

    /// Returns the persisted toggle this feature maps to, if any.
    pub fn as_toggle(self) -> Option<ToggleFeature> {
        match self {
            Feature::Telemetry => Some(ToggleFeature::Telemetry),
            Feature::WindowsUpdate => Some(ToggleFeature::WindowsUpdate),
            Feature::Defender => Some(ToggleFeature::Defender),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How repeated actions on a persisted toggle behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePolicy {
    /// Acting disables the feature; there is no re-enable path.
    DisableOnly,
    /// Acting flips the feature between enabled and disabled.
    Toggle,
}

/// The persisted subset of [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleFeature {
    Telemetry,
    WindowsUpdate,
    Defender,
}

impl ToggleFeature {
    /// All persisted toggles, in display order.
    pub const ALL: [ToggleFeature; 3] = [
        ToggleFeature::Telemetry,
        ToggleFeature::WindowsUpdate,
        ToggleFeature::Defender,
    ];

    pub fn policy(self) -> TogglePolicy {
        match self {
            ToggleFeature::Telemetry | ToggleFeature::Defender => TogglePolicy::DisableOnly,
            ToggleFeature::WindowsUpdate => TogglePolicy::Toggle,
        }
    }

    /// File name of the record inside the base directory.
    ///
    /// `update_disabled.dat` predates the `windows_update` identifier and is
    /// kept so that existing installs keep their state.
    pub fn record_file_name(self) -> &'static str {
        match self {
            ToggleFeature::Telemetry => "telemetry_disabled.dat",
            ToggleFeature::WindowsUpdate => "update_disabled.dat",
            ToggleFeature::Defender => "defender_disabled.dat",
        }
    }

    pub fn feature(self) -> Feature {
        match self {
            ToggleFeature::Telemetry => Feature::Telemetry,
            ToggleFeature::WindowsUpdate => Feature::WindowsUpdate,
            ToggleFeature::Defender => Feature::Defender,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.feature().as_str()
    }

    pub fn display_name(self) -> &'static str {
        self.feature().display_name()
    }
}

impl fmt::Display for ToggleFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ToggleFeature> for Feature {
    fn from(value: ToggleFeature) -> Self {
        value.feature()
    }
}

/// On/off state of a persisted toggle.
///
/// The initial state of every toggle is `Enabled`: nothing has been
/// disabled until the user acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleState {
    #[default]
    Enabled,
    Disabled,
}

impl ToggleState {
    /// The only transition: flips the state unconditionally.
    pub fn toggled(self) -> Self {
        match self {
            ToggleState::Enabled => ToggleState::Disabled,
            ToggleState::Disabled => ToggleState::Enabled,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == ToggleState::Enabled
    }

    pub fn is_disabled(self) -> bool {
        self == ToggleState::Disabled
    }

    pub fn from_disabled(disabled: bool) -> Self {
        if disabled {
            ToggleState::Disabled
        } else {
            ToggleState::Enabled
        }
    }
}

/// One persisted toggle: which feature, and its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRecord {
    pub feature: ToggleFeature,
    pub state: ToggleState,
}

impl ToggleRecord {
    pub fn new(feature: ToggleFeature, state: ToggleState) -> Self {
        Self { feature, state }
    }

    /// Bytes to store for this record.
    pub fn encode(&self) -> &'static [u8] {
        match self.state {
            ToggleState::Disabled => DISABLED_MARKER,
            ToggleState::Enabled => &[],
        }
    }

    /// Rebuilds a record from the stored length.
    ///
    /// `None` means the record is missing or could not be statted; both read
    /// as `Enabled`.
    pub fn from_stored_len(feature: ToggleFeature, len: Option<u64>) -> Self {
        let disabled = matches!(len, Some(n) if n > 0);
        Self::new(feature, ToggleState::from_disabled(disabled))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
