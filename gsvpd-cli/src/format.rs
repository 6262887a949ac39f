//! Summary formatting.

use std::time::Duration;

/// Formats an elapsed time as `"{h}h {m}m {s}s"` with two decimals on the seconds.
///
/// ```text
/// 2.5 s     -> "0h 0m 2.50s"
/// 3725.25 s -> "1h 2m 5.25s"
/// ```
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total - hours * 3600.0 - minutes * 60.0;
    format!("{}h {}m {:.2}s", hours as u64, minutes as u64, seconds)
}
