//! Storage infrastructure: configuration and toggle record persistence.
//!
//! This module provides thin adapters between the application and the file
//! system:
//!
//! - **`config`** reads and writes the TOML configuration file from the
//!   platform-appropriate directory, with defaults on first run.
//! - **`toggle_file`** is the production `ToggleStore`: one small record file
//!   per persisted feature inside the base directory.
//! - **`memory`** is an in-memory `ToggleStore` used by tests.
//!
//! Keeping storage concerns here, rather than scattered through the
//! application, means the record format can change without touching the
//! settings engine.

pub mod config;
pub mod memory;
pub mod toggle_file;
