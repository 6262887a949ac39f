//! Human-readable byte sizes.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count using binary multiples.
///
/// Always two decimals; sizes past the terabyte range stay in TB.
///
/// # Examples
///
/// ```
/// use gsvpd::store::format_size;
///
/// assert_eq!(format_size(512), "512.00 B");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
