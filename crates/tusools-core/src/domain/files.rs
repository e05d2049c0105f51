//! File-type checks for user-picked wallpapers and fonts.
//!
//! Only the extension is inspected; whether the file exists is a question
//! for the platform backend, since this crate does no file-system access.

use std::path::Path;

use super::validation::ValidationError;

/// Image types accepted as a wallpaper.
pub const WALLPAPER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Font file types accepted for a system font change.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

/// # Errors
///
/// Returns [`ValidationError::UnsupportedFileType`] if `path` is not an image
/// type listed in [`WALLPAPER_EXTENSIONS`].
pub fn validate_wallpaper(path: &Path) -> Result<(), ValidationError> {
    validate_extension(path, WALLPAPER_EXTENSIONS)
}

/// # Errors
///
/// Returns [`ValidationError::UnsupportedFileType`] if `path` is not a font
/// type listed in [`FONT_EXTENSIONS`].
pub fn validate_font(path: &Path) -> Result<(), ValidationError> {
    validate_extension(path, FONT_EXTENSIONS)
}

fn validate_extension(path: &Path, allowed: &'static [&'static str]) -> Result<(), ValidationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if allowed.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFileType {
            found: ext,
            allowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallpaper_accepts_listed_extensions_case_insensitively() {
        assert!(validate_wallpaper(Path::new("C:/pics/back.png")).is_ok());
        assert!(validate_wallpaper(Path::new("/home/u/sunset.JPG")).is_ok());
        assert!(validate_wallpaper(Path::new("old.bmp")).is_ok());
    }

    #[test]
    fn test_wallpaper_rejects_other_types() {
        // Act
        let err = validate_wallpaper(Path::new("notes.txt")).unwrap_err();

        // Assert
        assert_eq!(
            err,
            ValidationError::UnsupportedFileType {
                found: "txt".to_string(),
                allowed: WALLPAPER_EXTENSIONS,
            }
        );
    }

    #[test]
    fn test_path_without_extension_is_rejected() {
        assert!(validate_wallpaper(Path::new("wallpaper")).is_err());
        assert!(validate_font(Path::new("font")).is_err());
    }

    #[test]
    fn test_font_accepts_ttf_and_otf_only() {
        assert!(validate_font(Path::new("Inter.ttf")).is_ok());
        assert!(validate_font(Path::new("Inter.OTF")).is_ok());
        assert!(validate_font(Path::new("Inter.woff2")).is_err());
    }
}
