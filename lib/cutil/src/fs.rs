//! Byte-size helpers and path name helpers.

use std::path::Path;

/// Kilobytes constant (1024 bytes)
pub const KB: u64 = 1024;

/// Megabytes constant (1024 * 1024 bytes)
pub const MB: u64 = KB * 1024;

/// Gigabytes constant (1024 * 1024 * 1024 bytes)
pub const GB: u64 = MB * 1024;

#[inline]
pub fn bytes_to_kb(bytes: u64) -> f64 {
    bytes as f64 / KB as f64
}

#[inline]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / MB as f64
}

#[inline]
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / GB as f64
}

/// Formats a byte count with the largest fitting unit.
///
/// # Examples
///
/// ```
/// use cutil::fs::pretty_bytes_size;
///
/// assert_eq!(pretty_bytes_size(512), "512 B");
/// assert_eq!(pretty_bytes_size(1536), "1.50 KB");
/// assert_eq!(pretty_bytes_size(12 * 1024 * 1024), "12.00 MB");
/// ```
pub fn pretty_bytes_size(bytes: u64) -> String {
    if bytes >= GB {
        format!("{:.2} GB", bytes_to_gb(bytes))
    } else if bytes >= MB {
        format!("{:.2} MB", bytes_to_mb(bytes))
    } else if bytes >= KB {
        format!("{:.2} KB", bytes_to_kb(bytes))
    } else {
        format!("{} B", bytes)
    }
}

/// Returns the last path component, or an empty string.
///
/// # Examples
///
/// ```
/// use cutil::fs::file_name;
///
/// assert_eq!(file_name("/path/to/photo.jpg"), "photo.jpg");
/// assert_eq!(file_name(""), "");
/// ```
pub fn file_name(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
