//! Local time formatting.

use chrono::Local;

/// Formats the current local time with a `strftime`-style format.
///
/// # Examples
///
/// ```
/// use cutil::time::local_now;
///
/// let stamp = local_now("%H:%M:%S");
/// assert_eq!(stamp.len(), 8);
/// ```
pub fn local_now(format: &str) -> String {
    Local::now().format(format).to_string()
}
