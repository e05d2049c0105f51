//! # tusools-core
//!
//! Shared domain types for Tusools, the personalization/settings toggler.
//!
//! This crate has zero dependencies on OS APIs, UI frameworks, or the file
//! system.  Everything here is plain data plus the rules that govern it, so
//! the application crate can test its policy logic without touching the
//! machine it runs on.
//!
//! # What lives here
//!
//! - **`domain::feature`** – The closed set of settings the tool knows about,
//!   the persisted toggle subset, and the on-disk record encoding.
//!
//! - **`domain::theme`** – Light/dark theme values.  The OS owns the theme;
//!   this crate only models it.
//!
//! - **`domain::transparency`** – The validated terminal transparency
//!   percentage and its conversion into the 0..=255 backend unit.
//!
//! - **`domain::files`** – File-type checks for wallpaper images and fonts.
//!
//! - **`domain::validation`** – [`ValidationError`], returned whenever user
//!   input falls outside an allowed domain.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `tusools_core::ToggleFeature` instead of the full module path.
pub use domain::feature::{Feature, ToggleFeature, TogglePolicy, ToggleRecord, ToggleState};
pub use domain::files::{validate_font, validate_wallpaper, FONT_EXTENSIONS, WALLPAPER_EXTENSIONS};
pub use domain::theme::ThemeState;
pub use domain::transparency::TransparencyLevel;
pub use domain::validation::ValidationError;
