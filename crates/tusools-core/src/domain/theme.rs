//! Light/dark theme.
//!
//! The OS is the source of truth for the theme and may change it outside
//! this tool, so a `ThemeState` is always queried fresh and never stored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeState {
    Light,
    Dark,
}

impl ThemeState {
    pub fn opposite(self) -> Self {
        match self {
            ThemeState::Light => ThemeState::Dark,
            ThemeState::Dark => ThemeState::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeState::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeState::Light => "light",
            ThemeState::Dark => "dark",
        }
    }
}
