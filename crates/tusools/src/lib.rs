//! tusools library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does tusools do? (for beginners)
//!
//! Tusools flips a handful of system settings from one place: light/dark
//! theme, wallpaper, terminal transparency, and three "important" switches
//! (telemetry, automatic updates, and the security agent).  For those three
//! it also remembers what the user did, so the buttons show the right label
//! after a restart.
//!
//! A single user action flows through the layers like this:
//!
//! ```text
//! console shell (main.rs)
//!  └─ ui_bridge::handle_action()
//!       └─ application::SettingsEngine::apply()
//!            ├─ ToggleStore::state()           -- current recorded state
//!            ├─ SettingsBackend::...()         -- change the OS setting
//!            └─ ToggleStore::set_disabled()    -- only after the OS call succeeded
//! ```

/// Application layer: the settings engine and the traits it depends on.
pub mod application;

/// Infrastructure layer: storage, OS backends, and the UI bridge.
pub mod infrastructure;
