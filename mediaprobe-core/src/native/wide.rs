// mediaprobe-core/src/native/wide.rs
//
// Conversions between Rust strings and the library's NUL-terminated wchar_t
// strings. wchar_t is UTF-16 on Windows and UTF-32 everywhere else.

use std::path::Path;

#[cfg(windows)]
pub type WChar = u16;

#[cfg(not(windows))]
pub type WChar = u32;

/// Encodes `text` as a NUL-terminated wide string.
pub fn to_wide(text: &str) -> Vec<WChar> {
    #[cfg(windows)]
    let mut wide: Vec<WChar> = text.encode_utf16().collect();
    #[cfg(not(windows))]
    let mut wide: Vec<WChar> = text.chars().map(|c| c as WChar).collect();
    wide.push(0);
    wide
}

/// Encodes a filesystem path as a NUL-terminated wide string.
pub fn path_to_wide(path: &Path) -> Vec<WChar> {
    #[cfg(windows)]
    {
        use std::os::windows::ffi::OsStrExt;
        let mut wide: Vec<WChar> = path.as_os_str().encode_wide().collect();
        wide.push(0);
        wide
    }
    #[cfg(not(windows))]
    {
        to_wide(&path.to_string_lossy())
    }
}

/// Copies a NUL-terminated wide string owned by the library.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated wchar_t string that stays
/// valid for the duration of the call.
pub unsafe fn from_wide_ptr(ptr: *const WChar) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0usize;
    // SAFETY: the caller guarantees a NUL terminator within the allocation.
    unsafe {
        while *ptr.add(len) != 0 {
            len += 1;
        }
        from_wide(std::slice::from_raw_parts(ptr, len))
    }
}

fn from_wide(units: &[WChar]) -> String {
    #[cfg(windows)]
    {
        String::from_utf16_lossy(units)
    }
    #[cfg(not(windows))]
    {
        units
            .iter()
            .map(|&unit| char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_unicode() {
        let text = "Dès Noël où un zéphyr haï – bœuf";
        let wide = to_wide(text);
        assert_eq!(wide.last(), Some(&0));
        let back = unsafe { from_wide_ptr(wide.as_ptr()) };
        assert_eq!(back, text);
    }

    #[test]
    fn test_null_pointer_is_empty() {
        assert_eq!(unsafe { from_wide_ptr(std::ptr::null()) }, "");
    }

    #[test]
    fn test_path_to_wide_is_terminated() {
        let wide = path_to_wide(Path::new("accentué.txt"));
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(wide.len(), "accentué.txt".chars().count() + 1);
    }
}
