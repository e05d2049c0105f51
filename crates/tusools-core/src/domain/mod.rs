//! Domain entities: pure data and rules, no I/O.

pub mod feature;
pub mod files;
pub mod theme;
pub mod transparency;
pub mod validation;
