//! Application layer use cases for tusools.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules, in `tusools-core`) and the infrastructure (OS calls,
//! files, UI).
//!
//! Code in this layer:
//!
//! - **Orchestrates** domain objects to fulfil a user goal (e.g., "disable
//!   automatic updates and remember that it is disabled").
//! - **Depends on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Contains no OS calls, no registry access, no file system access**.
//!
//! # Sub-modules
//!
//! - **`toggle_store`** – The [`toggle_store::ToggleStore`] trait: durable
//!   read/write of a persisted feature's Disabled/Enabled flag.
//!
//! - **`apply_setting`** – The [`apply_setting::SettingsEngine`] use case and
//!   the [`apply_setting::SettingsBackend`] trait it drives.  This is where the
//!   per-feature policy lives.

pub mod apply_setting;
pub mod toggle_store;

pub use apply_setting::{
    ApplyOutcome, BackendError, SettingsAction, SettingsBackend, SettingsEngine, SettingsError,
};
pub use toggle_store::{StorageError, ToggleStore};
