//! UI bridge: turns engine results into what a front end displays.
//!
//! The presentation layer (the console shell in `main.rs`, or any GUI wired
//! on top later) never talks to the [`SettingsEngine`] directly.  It calls
//! the functions here, which return plain serialisable DTOs:
//!
//! - [`ButtonLabel`]: the text of a button and whether it can be clicked.
//! - [`Notification`]: one info or error message for the user.
//! - [`CommandResult<T>`]: the same `{ success, data, error }` envelope for
//!   every call, so a front end can always check `result.success` first.
//!
//! # Labels show the next action
//!
//! A button label describes what clicking it will *do*, not what the state
//! *is*.  When the theme is dark the button says "Switch to Light Theme".
//! Disable-only features grey their button out once they are disabled.
//!
//! Deriving labels only reads state, so calling [`get_labels`] any number of
//! times changes nothing.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tusools_core::{Feature, ThemeState, ToggleFeature, ToggleState};

use crate::application::apply_setting::{
    ApplyOutcome, SettingsAction, SettingsEngine, SettingsError,
};
use crate::infrastructure::storage::toggle_file::StorageLayout;

// ── Shared application state ──────────────────────────────────────────────────

/// Everything a front end needs to serve user actions.
pub struct AppState {
    pub engine: SettingsEngine,
    pub layout: StorageLayout,
}

impl AppState {
    pub fn new(engine: SettingsEngine, layout: StorageLayout) -> Arc<Self> {
        Arc::new(Self { engine, layout })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Text and clickability of one button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLabel {
    pub feature: Feature,
    pub text: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A message box's worth of feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.to_owned(),
            message: message.into(),
        }
    }

    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_owned(),
            message: message.into(),
        }
    }
}

/// Reply to [`handle_action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub notification: Notification,
    /// Refreshed label of the button that triggered the action, for buttons
    /// whose text depends on state.
    pub label: Option<ButtonLabel>,
}

/// Unified response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failure that still carries data for the front end to show.
    pub fn err_with(data: T, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            error: Some(msg.into()),
        }
    }
}

// ── Label derivation ──────────────────────────────────────────────────────────

/// Label of a persisted toggle's button in `state`.
pub fn toggle_label(feature: ToggleFeature, state: ToggleState) -> ButtonLabel {
    let (text, enabled) = match (feature, state) {
        (ToggleFeature::Telemetry, ToggleState::Enabled) => ("Turn Off Telemetry", true),
        (ToggleFeature::Telemetry, ToggleState::Disabled) => ("Telemetry Disabled", false),
        (ToggleFeature::WindowsUpdate, ToggleState::Enabled) => ("Disable Windows Update", true),
        (ToggleFeature::WindowsUpdate, ToggleState::Disabled) => ("Enable Windows Update", true),
        (ToggleFeature::Defender, ToggleState::Enabled) => ("Disable Windows Defender", true),
        (ToggleFeature::Defender, ToggleState::Disabled) => ("Windows Defender Disabled", false),
    };
    ButtonLabel {
        feature: feature.feature(),
        text: text.to_owned(),
        enabled,
    }
}

/// Label of the theme button while the OS shows `theme`.
pub fn theme_label(theme: ThemeState) -> ButtonLabel {
    let text = match theme {
        ThemeState::Dark => "Switch to Light Theme",
        ThemeState::Light => "Switch to Dark Theme",
    };
    ButtonLabel {
        feature: Feature::Theme,
        text: text.to_owned(),
        enabled: true,
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Labels of every state-dependent button: the theme first, then the
/// persisted toggles.
pub fn get_labels(state: &AppState) -> CommandResult<Vec<ButtonLabel>> {
    let mut labels = Vec::with_capacity(1 + ToggleFeature::ALL.len());
    labels.push(theme_label(state.engine.current_theme()));
    labels.extend(
        ToggleFeature::ALL
            .iter()
            .map(|&f| toggle_label(f, state.engine.toggle_state(f))),
    );
    CommandResult::ok(labels)
}

/// Wallpaper used when the user does not pick one: `background/back.png`.
pub fn background_wallpaper_path(state: &AppState) -> PathBuf {
    state.layout.background_image_path()
}

/// Applies `action` and describes the result for the user.
///
/// Failures come back with `success == false`, the error text in `error`,
/// and an error notification in `data`.
pub fn handle_action(state: &AppState, action: SettingsAction) -> CommandResult<ActionResponse> {
    let feature = action.feature();
    match state.engine.apply(action) {
        Ok(outcome) => {
            let response = ActionResponse {
                notification: outcome_notification(&outcome),
                label: outcome_label(&outcome),
            };
            debug!(%feature, title = %response.notification.title, "action succeeded");
            CommandResult::ok(response)
        }
        Err(err) => {
            let message = err.to_string();
            let response = ActionResponse {
                notification: error_notification(&err),
                label: current_label(state, feature),
            };
            CommandResult::err_with(response, message)
        }
    }
}

fn current_label(state: &AppState, feature: Feature) -> Option<ButtonLabel> {
    match feature {
        Feature::Theme => Some(theme_label(state.engine.current_theme())),
        other => other
            .as_toggle()
            .map(|f| toggle_label(f, state.engine.toggle_state(f))),
    }
}

fn outcome_label(outcome: &ApplyOutcome) -> Option<ButtonLabel> {
    match outcome {
        ApplyOutcome::Toggled { feature, state } => Some(toggle_label(*feature, *state)),
        ApplyOutcome::AlreadyDisabled(feature) => {
            Some(toggle_label(*feature, ToggleState::Disabled))
        }
        ApplyOutcome::ThemeChanged(theme) => Some(theme_label(*theme)),
        _ => None,
    }
}

fn outcome_notification(outcome: &ApplyOutcome) -> Notification {
    match outcome {
        ApplyOutcome::Toggled {
            feature: ToggleFeature::Telemetry,
            state: ToggleState::Disabled,
        } => Notification::info("Success", "Telemetry has been turned off."),
        ApplyOutcome::Toggled { feature, state } => {
            let verb = if state.is_disabled() { "disabled" } else { "enabled" };
            Notification::info(
                "Success",
                format!("{} has been {verb}.", feature.display_name()),
            )
        }
        ApplyOutcome::AlreadyDisabled(feature) => Notification::info(
            "Nothing to do",
            format!("{} is already disabled.", feature.display_name()),
        ),
        ApplyOutcome::ThemeChanged(theme) => Notification::info(
            "Success",
            format!("Computer has been switched to {} theme.", theme.as_str()),
        ),
        ApplyOutcome::TransparencySet { level, .. } => Notification::info(
            "Success",
            format!("Terminal opacity set to {}%.", level.percent()),
        ),
        ApplyOutcome::WallpaperChanged(path) => Notification::info(
            "Success",
            format!("Wallpaper set to {}.", path.display()),
        ),
        ApplyOutcome::RestartRequested => Notification::info(
            "Restart Required",
            "Changing the system font requires a restart.",
        ),
    }
}

fn error_notification(err: &SettingsError) -> Notification {
    let title = match err {
        SettingsError::Validation { .. } => "Invalid Input",
        SettingsError::Backend { .. } | SettingsError::Storage(_) => "Error",
    };
    Notification::error(title, err.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::toggle_store::ToggleStore;
    use crate::infrastructure::settings_backend::mock::RecordingSettingsBackend;
    use crate::infrastructure::storage::memory::InMemoryToggleStore;

    struct Fixture {
        state: Arc<AppState>,
        store: Arc<InMemoryToggleStore>,
        backend: Arc<RecordingSettingsBackend>,
    }

    fn make_state(theme: ThemeState) -> Fixture {
        let store = Arc::new(InMemoryToggleStore::new());
        let backend = Arc::new(RecordingSettingsBackend::with_theme(theme));
        let engine = SettingsEngine::new(store.clone(), backend.clone());
        let state = AppState::new(engine, StorageLayout::new("/tmp/tusools-ui-test"));
        Fixture {
            state,
            store,
            backend,
        }
    }

    fn label_text(labels: &[ButtonLabel], feature: Feature) -> &str {
        labels
            .iter()
            .find(|l| l.feature == feature)
            .map(|l| l.text.as_str())
            .unwrap()
    }

    #[test]
    fn test_initial_labels_offer_the_disable_actions() {
        // Arrange
        let fx = make_state(ThemeState::Light);

        // Act
        let labels = get_labels(&fx.state).data.unwrap();

        // Assert
        assert_eq!(labels.len(), 4);
        assert_eq!(label_text(&labels, Feature::Theme), "Switch to Dark Theme");
        assert_eq!(label_text(&labels, Feature::Telemetry), "Turn Off Telemetry");
        assert_eq!(label_text(&labels, Feature::WindowsUpdate), "Disable Windows Update");
        assert_eq!(label_text(&labels, Feature::Defender), "Disable Windows Defender");
        assert!(labels.iter().all(|l| l.enabled));
    }

    #[test]
    fn test_get_labels_is_idempotent() {
        // Arrange
        let fx = make_state(ThemeState::Dark);
        fx.store.set_disabled(ToggleFeature::Defender, true).unwrap();

        // Act
        let first = get_labels(&fx.state).data.unwrap();
        let second = get_labels(&fx.state).data.unwrap();

        // Assert
        assert_eq!(first, second);
        assert!(fx.backend.calls().is_empty());
        assert!(!fx.store.has_record(ToggleFeature::Telemetry));
    }

    #[test]
    fn test_disabled_one_way_toggle_greys_out_button() {
        let label = toggle_label(ToggleFeature::Telemetry, ToggleState::Disabled);

        assert_eq!(label.text, "Telemetry Disabled");
        assert!(!label.enabled);
    }

    #[test]
    fn test_handle_windows_update_flips_label() {
        // Arrange
        let fx = make_state(ThemeState::Light);

        // Act
        let first = handle_action(&fx.state, SettingsAction::Toggle(ToggleFeature::WindowsUpdate));
        let second = handle_action(&fx.state, SettingsAction::Toggle(ToggleFeature::WindowsUpdate));

        // Assert
        let first = first.data.unwrap();
        assert_eq!(first.label.unwrap().text, "Enable Windows Update");
        assert_eq!(first.notification.message, "Windows Update has been disabled.");
        let second = second.data.unwrap();
        assert_eq!(second.label.unwrap().text, "Disable Windows Update");
        assert_eq!(second.notification.message, "Windows Update has been enabled.");
    }

    #[test]
    fn test_handle_theme_reports_next_action() {
        // Arrange
        let fx = make_state(ThemeState::Dark);

        // Act
        let result = handle_action(&fx.state, SettingsAction::Theme);

        // Assert
        assert!(result.success);
        let response = result.data.unwrap();
        assert_eq!(response.label.unwrap().text, "Switch to Dark Theme");
        assert_eq!(
            response.notification.message,
            "Computer has been switched to light theme."
        );
    }

    #[test]
    fn test_handle_backend_failure_returns_error_notification() {
        // Arrange
        let fx = make_state(ThemeState::Light);
        fx.backend.set_should_fail(true);

        // Act
        let result = handle_action(&fx.state, SettingsAction::Toggle(ToggleFeature::Defender));

        // Assert
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("Windows Defender"));
        let response = result.data.unwrap();
        assert_eq!(response.notification.level, NotificationLevel::Error);
        assert_eq!(response.label.unwrap().text, "Disable Windows Defender");
    }

    #[test]
    fn test_handle_invalid_transparency_is_invalid_input() {
        let fx = make_state(ThemeState::Light);

        let result = handle_action(&fx.state, SettingsAction::Transparency(90));

        assert!(!result.success);
        let response = result.data.unwrap();
        assert_eq!(response.notification.title, "Invalid Input");
        assert!(response.notification.message.contains("80"));
        assert!(response.label.is_none());
    }

    #[test]
    fn test_handle_font_tells_user_about_restart() {
        let fx = make_state(ThemeState::Light);

        let result = handle_action(&fx.state, SettingsAction::Font(PathBuf::from("Inter.otf")));

        assert_eq!(result.data.unwrap().notification.title, "Restart Required");
        assert_eq!(fx.backend.restart_requests(), 1);
    }

    #[test]
    fn test_background_wallpaper_path_points_into_base_dir() {
        let fx = make_state(ThemeState::Light);

        let path = background_wallpaper_path(&fx.state);

        assert!(path.ends_with("background/back.png"));
    }

    #[test]
    fn test_command_result_err_with_keeps_data_and_sets_success_false() {
        let r = CommandResult::err_with(7, "something went wrong");

        assert!(!r.success);
        assert_eq!(r.data, Some(7));
        assert_eq!(r.error.unwrap(), "something went wrong");
    }

    #[test]
    fn test_command_result_serialises_envelope_shape() {
        let r = CommandResult::ok(theme_label(ThemeState::Dark));

        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["feature"], "theme");
        assert!(json["error"].is_null());
    }
}
