//! Thin DWORD helpers over the Win32 registry API.

use std::ffi::{c_void, OsStr};
use std::os::windows::ffi::OsStrExt;

use tracing::{debug, warn};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND, ERROR_SUCCESS, WIN32_ERROR,
};
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegGetValueW, RegSetValueExW, HKEY, KEY_SET_VALUE,
    REG_DWORD, REG_OPTION_NON_VOLATILE, RRF_RT_REG_DWORD,
};

use crate::application::apply_setting::BackendError;

/// Null-terminated UTF-16 copy of `s`.
pub(super) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}

/// Null-terminated UTF-16 copy of an OS string, unpaired surrogates included.
pub(super) fn wide_os(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(Some(0)).collect()
}

/// Maps a Win32 status to the backend error taxonomy.
pub(super) fn classify(status: WIN32_ERROR, detail: String) -> BackendError {
    match status {
        ERROR_ACCESS_DENIED => BackendError::PermissionDenied(detail),
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => BackendError::MissingResource(detail),
        other => BackendError::Platform(format!("{detail} (code {:#X})", other.0)),
    }
}

/// Creates `root\path` if needed and writes `name = value` as `REG_DWORD`.
pub(super) fn set_dword(root: HKEY, path: &str, name: &str, value: u32) -> Result<(), BackendError> {
    let path_w = wide(path);
    let name_w = wide(name);
    let mut key = HKEY::default();

    // SAFETY: both strings are null-terminated and outlive the calls; `key`
    // is closed before returning on every path that opened it.
    unsafe {
        let status = RegCreateKeyExW(
            root,
            PCWSTR(path_w.as_ptr()),
            None,
            None,
            REG_OPTION_NON_VOLATILE,
            KEY_SET_VALUE,
            None,
            &mut key,
            None,
        );
        if status != ERROR_SUCCESS {
            warn!(path, code = status.0, "could not open registry key");
            return Err(classify(status, format!("open key '{path}'")));
        }

        let status = RegSetValueExW(
            key,
            PCWSTR(name_w.as_ptr()),
            None,
            REG_DWORD,
            Some(&value.to_le_bytes()),
        );
        let _ = RegCloseKey(key);

        if status != ERROR_SUCCESS {
            warn!(path, name, value, code = status.0, "could not write registry value");
            return Err(classify(status, format!("write '{name}' in '{path}'")));
        }
    }

    debug!(path, name, value, "registry DWORD written");
    Ok(())
}

/// Reads `root\path\name` as a DWORD.
pub(super) fn get_dword(root: HKEY, path: &str, name: &str) -> Result<u32, BackendError> {
    let path_w = wide(path);
    let name_w = wide(name);
    let mut value: u32 = 0;
    let mut size = std::mem::size_of::<u32>() as u32;

    // SAFETY: `value` and `size` are valid for writes of the sizes passed.
    let status = unsafe {
        RegGetValueW(
            root,
            PCWSTR(path_w.as_ptr()),
            PCWSTR(name_w.as_ptr()),
            RRF_RT_REG_DWORD,
            None,
            Some(&mut value as *mut u32 as *mut c_void),
            Some(&mut size),
        )
    };

    if status != ERROR_SUCCESS {
        return Err(classify(status, format!("read '{name}' in '{path}'")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_appends_single_terminator() {
        assert_eq!(wide("ab"), vec![b'a' as u16, b'b' as u16, 0]);
    }

    #[test]
    fn test_wide_os_keeps_unpaired_surrogate() {
        use std::ffi::OsString;
        use std::os::windows::ffi::OsStringExt;

        // Arrange: not valid Unicode, so a lossy conversion would alter it
        let name = OsString::from_wide(&[0x61, 0xD800]);

        // Act
        let encoded = wide_os(&name);

        // Assert
        assert_eq!(encoded, vec![0x61, 0xD800, 0]);
    }

    #[test]
    fn test_set_dword_then_get_dword_under_current_user() {
        use windows::Win32::System::Registry::{RegDeleteKeyW, HKEY_CURRENT_USER};

        // Arrange
        let path = format!(r"Software\Tusools\Test-{}", uuid::Uuid::new_v4());

        // Act
        set_dword(HKEY_CURRENT_USER, &path, "Value", 0xBEEF).unwrap();
        let read = get_dword(HKEY_CURRENT_USER, &path, "Value");
        let missing = get_dword(HKEY_CURRENT_USER, &path, "Absent");

        // Assert
        assert_eq!(read.unwrap(), 0xBEEF);
        assert!(matches!(missing, Err(BackendError::MissingResource(_))));

        let path_w = wide(&path);
        // SAFETY: `path_w` is null-terminated and outlives the call.
        let _ = unsafe { RegDeleteKeyW(HKEY_CURRENT_USER, PCWSTR(path_w.as_ptr())) };
    }

    #[test]
    fn test_classify_maps_known_codes() {
        assert!(matches!(
            classify(ERROR_ACCESS_DENIED, "x".into()),
            BackendError::PermissionDenied(_)
        ));
        assert!(matches!(
            classify(ERROR_PATH_NOT_FOUND, "x".into()),
            BackendError::MissingResource(_)
        ));
        assert!(matches!(classify(WIN32_ERROR(87), "x".into()), BackendError::Platform(_)));
    }
}
