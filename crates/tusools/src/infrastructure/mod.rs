//! Infrastructure layer for tusools.
//!
//! Contains OS-facing adapters: the file-backed toggle store, configuration
//! persistence, the per-platform settings backends, and the UI bridge.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tusools_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`settings_backend`** – OS-specific implementations of
//!   `SettingsBackend`.  The correct one is selected at compile time using
//!   `#[cfg(target_os)]`.  A recording fake is also provided for tests.
//!
//! - **`storage`** – Config file persistence, the file-backed `ToggleStore`
//!   and its in-memory substitute.
//!
//! - **`ui_bridge`** – Turns engine results into button labels and
//!   notifications for whatever front end is showing them.

pub mod settings_backend;
pub mod storage;
pub mod ui_bridge;
