//! Human-readable resource figures.

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Formats a byte count with the largest unit it strictly exceeds.
///
/// Thresholds are exclusive: exactly 1024 bytes stays in bytes and
/// exactly 1 GiB is still shown in megabytes.
///
/// ```
/// use appctl_api::units::to_human;
///
/// assert_eq!(to_human(1_610_612_736), "1.5GB");
/// assert_eq!(to_human(2048), "  2KB");
/// assert_eq!(to_human(1024), "1024B");
/// ```
#[must_use]
pub fn to_human(bytes: u64) -> String {
    if bytes > GB {
        format!("{:.1}GB", bytes as f64 / GB as f64)
    } else if bytes > MB {
        format!("{:3}MB", bytes / MB)
    } else if bytes > KB {
        format!("{:3}KB", bytes / KB)
    } else {
        format!("{bytes:3}B")
    }
}

/// Truncated percentage of `used` over `limit`, `0` without a limit.
#[must_use]
pub fn usage_percent(used: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    (used as f64 / limit as f64 * 100.0) as u64
}
