//! Validation errors for user-supplied values.

use thiserror::Error;

/// User input fell outside an allowed domain.
///
/// Values are never silently clamped or coerced; the caller gets this error
/// with the allowed domain attached so it can tell the user what to enter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A number outside an inclusive range.
    #[error("value {value} is outside the allowed range {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },

    /// A file whose extension is not accepted.
    #[error("unsupported file type '{found}'; expected one of: {}", .allowed.join(", "))]
    UnsupportedFileType {
        found: String,
        allowed: &'static [&'static str],
    },
}
